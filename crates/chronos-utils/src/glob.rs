//! Shell-style glob matching for ignore rules.
//!
//! Supports `*`, `?`, bracket expressions (`[abc]`, `[a-z]`, `[!x]`, `[^x]`)
//! and backslash escapes. Wildcards also match `/`, so `*.log` matches
//! `logs/debug.log`.

bitflags::bitflags! {
    /// Flags controlling glob behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GlobFlags: u32 {
        /// Case-insensitive matching.
        const CASEFOLD = 0x01;
    }
}

fn fold(c: u8, flags: GlobFlags) -> u8 {
    if flags.contains(GlobFlags::CASEFOLD) {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

fn chars_eq(p: u8, t: u8, flags: GlobFlags) -> bool {
    fold(p, flags) == fold(t, flags)
}

fn in_range(lo: u8, hi: u8, c: u8, flags: GlobFlags) -> bool {
    if (lo..=hi).contains(&c) {
        return true;
    }
    flags.contains(GlobFlags::CASEFOLD)
        && ((lo..=hi).contains(&c.to_ascii_lowercase())
            || (lo..=hi).contains(&c.to_ascii_uppercase()))
}

/// Evaluate the bracket expression at the start of `p` against `c`.
///
/// Returns whether it matched and how many pattern bytes it spans, or `None`
/// when the expression is unterminated (the '[' is then a literal).
fn match_bracket(p: &[u8], c: u8, flags: GlobFlags) -> Option<(bool, usize)> {
    let mut i = 1;
    let negated = matches!(p.get(i), Some(b'!') | Some(b'^'));
    if negated {
        i += 1;
    }
    let mut matched = false;
    let mut first = true;
    loop {
        let ch = *p.get(i)?;
        if ch == b']' && !first {
            return Some((matched != negated, i + 1));
        }
        first = false;
        let (lo, next) = if ch == b'\\' {
            (*p.get(i + 1)?, i + 2)
        } else {
            (ch, i + 1)
        };
        i = next;
        if p.get(i) == Some(&b'-') && p.get(i + 1).is_some_and(|&b| b != b']') {
            let (hi, next) = if p[i + 1] == b'\\' {
                (*p.get(i + 2)?, i + 3)
            } else {
                (p[i + 1], i + 2)
            };
            i = next;
            matched |= in_range(lo, hi, c, flags);
        } else {
            matched |= chars_eq(lo, c, flags);
        }
    }
}

/// Match `text` against `pattern` in full.
pub fn glob_match(pattern: &[u8], text: &[u8], flags: GlobFlags) -> bool {
    let (mut pi, mut ti) = (0, 0);
    // Pattern position after the last '*' and the text position it resumes from.
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        let c = text[ti];
        let next = match pattern.get(pi) {
            Some(b'*') => {
                while pattern.get(pi) == Some(&b'*') {
                    pi += 1;
                }
                backtrack = Some((pi, ti));
                continue;
            }
            Some(b'?') => Some(pi + 1),
            Some(b'[') => match match_bracket(&pattern[pi..], c, flags) {
                Some((true, len)) => Some(pi + len),
                Some(_) => None,
                None => chars_eq(b'[', c, flags).then_some(pi + 1),
            },
            Some(b'\\') if pi + 1 < pattern.len() => {
                chars_eq(pattern[pi + 1], c, flags).then_some(pi + 2)
            }
            Some(&p) => chars_eq(p, c, flags).then_some(pi + 1),
            None => None,
        };

        match (next, backtrack) {
            (Some(n), _) => {
                pi = n;
                ti += 1;
            }
            (None, Some((star_pi, star_ti))) => {
                pi = star_pi;
                ti = star_ti + 1;
                backtrack = Some((star_pi, ti));
            }
            _ => return false,
        }
    }

    while pattern.get(pi) == Some(&b'*') {
        pi += 1;
    }
    pi == pattern.len()
}
