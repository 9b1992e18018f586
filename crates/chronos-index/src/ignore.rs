//! Ignore rules.
//!
//! Two kinds of rulesets feed one predicate:
//! - absolute rulesets (`.git/info/exclude`, the global ignore file), each
//!   applying to the whole worktree;
//! - scoped rulesets, one per directory holding a tracked `.gitignore`.
//!
//! Scoped rulesets are consulted from the path's parent directory up to the
//! root and the first one with a matching rule decides. Only then are the
//! absolute rulesets consulted, in order. Within one ruleset the last
//! matching rule wins. Patterns are matched against the whole
//! worktree-relative path and `*` may cross `/`. Matching is
//! case-insensitive only when asked for (`core.ignorecase`).

use std::collections::HashMap;

use bstr::{BStr, BString, ByteSlice};
use chronos_utils::glob::{glob_match, GlobFlags};

use crate::{IndexError, Result};

/// One line of an ignore file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pub pattern: BString,
    /// `true` for `!pattern`: a match means "not ignored".
    pub negated: bool,
}

impl IgnoreRule {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &[u8]) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(b"#") {
            return None;
        }
        match line.strip_prefix(b"!") {
            Some(rest) => Some(Self {
                pattern: BString::from(rest),
                negated: true,
            }),
            None => Some(Self {
                pattern: BString::from(line),
                negated: false,
            }),
        }
    }

    /// The verdict this rule gives for `path`, or `None` if it does not match.
    fn verdict(&self, path: &[u8], flags: GlobFlags) -> Option<bool> {
        glob_match(&self.pattern, path, flags).then_some(!self.negated)
    }
}

/// Parse the text of an ignore file.
pub fn parse_rules(text: &[u8]) -> Vec<IgnoreRule> {
    text.lines().filter_map(IgnoreRule::parse).collect()
}

/// Verdict of the last matching rule in `rules`.
fn check_ruleset(rules: &[IgnoreRule], path: &[u8], flags: GlobFlags) -> Option<bool> {
    rules.iter().rev().find_map(|rule| rule.verdict(path, flags))
}

/// The merged ignore predicate for one worktree.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    absolute: Vec<Vec<IgnoreRule>>,
    scoped: HashMap<Vec<u8>, Vec<IgnoreRule>>,
    flags: GlobFlags,
}

impl IgnoreRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ruleset that applies everywhere.
    pub fn add_absolute(&mut self, text: &[u8]) {
        self.absolute.push(parse_rules(text));
    }

    /// Set the ruleset of the `.gitignore` in `dir` (`""` for the root).
    pub fn add_scoped(&mut self, dir: impl Into<Vec<u8>>, text: &[u8]) {
        self.scoped.insert(dir.into(), parse_rules(text));
    }

    /// Match patterns without regard to ASCII case.
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        self.flags.set(GlobFlags::CASEFOLD, ignore_case);
    }

    pub fn is_empty(&self) -> bool {
        self.absolute.iter().all(Vec::is_empty) && self.scoped.values().all(Vec::is_empty)
    }

    /// Whether `path` (relative to the worktree root) is ignored.
    pub fn is_ignored(&self, path: &BStr) -> Result<bool> {
        if path.starts_with(b"/") || path.get(1..3) == Some(b":/".as_slice()) {
            return Err(IndexError::AbsolutePath(path.to_string()));
        }

        let mut dir = parent(path);
        loop {
            if let Some(verdict) = self
                .scoped
                .get(dir)
                .and_then(|rules| check_ruleset(rules, path, self.flags))
            {
                return Ok(verdict);
            }
            if dir.is_empty() {
                break;
            }
            dir = parent(dir);
        }

        Ok(self
            .absolute
            .iter()
            .find_map(|rules| check_ruleset(rules, path, self.flags))
            .unwrap_or(false))
    }
}

/// `a/b/c` -> `a/b`, `a` -> ``.
fn parent(path: &[u8]) -> &[u8] {
    match path.rfind_byte(b'/') {
        Some(pos) => &path[..pos],
        None => b"",
    }
}
