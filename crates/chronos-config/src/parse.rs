//! Config file parser for git's INI-like format.

use bstr::{BString, ByteVec};

use crate::error::ConfigError;
use crate::{ConfigEntry, ConfigKey, ConfigScope};

/// UTF-8 BOM bytes.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    filename: &'a str,
}

/// Parse config text into entries, in file order.
///
/// Sections are `[name]` or `[name "subsection"]`. Lines are `key = value`
/// or a bare `key`. `#` and `;` start comments, also after a value. Values
/// may be double-quoted, use `\n \t \b \\ \"` escapes and continue onto the
/// next line with a trailing backslash. Unquoted surrounding whitespace is
/// dropped and inner runs of whitespace are kept.
pub fn parse_config(
    input: &[u8],
    filename: &str,
    scope: ConfigScope,
) -> Result<Vec<ConfigEntry>, ConfigError> {
    let mut p = Parser {
        input,
        pos: if input.starts_with(UTF8_BOM) { UTF8_BOM.len() } else { 0 },
        line: 1,
        filename,
    };
    let mut entries = Vec::new();
    let mut section: Option<(BString, Option<BString>)> = None;

    while p.pos < p.input.len() {
        p.skip_blanks();
        match p.peek() {
            None => break,
            Some(b'\n') => {
                p.pos += 1;
                p.line += 1;
            }
            Some(b'\r') => p.pos += 1,
            Some(b'#') | Some(b';') => p.skip_to_next_line(),
            Some(b'[') => {
                section = Some(p.section_header()?);
                p.finish_line()?;
            }
            Some(_) => {
                let line = p.line;
                let Some((name, sub)) = section.clone() else {
                    return Err(p.error("key outside of any section"));
                };
                let (key, value) = p.key_value()?;
                entries.push(ConfigEntry {
                    key: ConfigKey {
                        section: name,
                        subsection: sub,
                        name: key,
                    },
                    value,
                    scope,
                    line_number: Some(line),
                });
            }
        }
    }
    Ok(entries)
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Parse {
            file: self.filename.to_string(),
            line: self.line,
            message: message.into(),
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.pos += 1;
        }
    }

    fn skip_to_next_line(&mut self) {
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                break;
            }
        }
    }

    /// After a header only whitespace or a comment may follow.
    fn finish_line(&mut self) -> Result<(), ConfigError> {
        self.skip_blanks();
        match self.peek() {
            None => Ok(()),
            Some(b'\n') | Some(b'\r') | Some(b'#') | Some(b';') => {
                self.skip_to_next_line();
                Ok(())
            }
            Some(c) => Err(self.error(format!(
                "unexpected character after section header: {:?}",
                c as char
            ))),
        }
    }

    fn section_header(&mut self) -> Result<(BString, Option<BString>), ConfigError> {
        self.pos += 1; // '['
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'-' || c == b'.') {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("empty section name"));
        }
        let name = BString::from(self.input[start..self.pos].to_ascii_lowercase());

        self.skip_blanks();
        let subsection = if self.peek() == Some(b'"') {
            self.pos += 1;
            let mut sub = BString::default();
            loop {
                match self.peek() {
                    None | Some(b'\n') => return Err(self.error("unterminated subsection")),
                    Some(b'"') => {
                        self.pos += 1;
                        break;
                    }
                    Some(b'\\') => {
                        self.pos += 1;
                        match self.peek() {
                            None | Some(b'\n') => {
                                return Err(self.error("unterminated escape in subsection"))
                            }
                            Some(c) => sub.push_byte(c),
                        }
                        self.pos += 1;
                    }
                    Some(c) => {
                        sub.push_byte(c);
                        self.pos += 1;
                    }
                }
            }
            Some(sub)
        } else {
            None
        };

        if self.peek() != Some(b']') {
            return Err(self.error("expected ']' to close section header"));
        }
        self.pos += 1;
        Ok((name, subsection))
    }

    fn key_value(&mut self) -> Result<(BString, Option<BString>), ConfigError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'-') {
            self.pos += 1;
        }
        if self.pos == start || !self.input[start].is_ascii_alphabetic() {
            return Err(self.error("invalid key name"));
        }
        let key = BString::from(self.input[start..self.pos].to_ascii_lowercase());

        self.skip_blanks();
        match self.peek() {
            None | Some(b'\n') | Some(b'\r') | Some(b'#') | Some(b';') => {
                self.skip_to_next_line();
                return Ok((key, None));
            }
            Some(b'=') => self.pos += 1,
            Some(c) => return Err(self.error(format!("expected '=' after key, got {:?}", c as char))),
        }
        self.skip_blanks();
        let value = self.value()?;
        Ok((key, Some(value)))
    }

    fn value(&mut self) -> Result<BString, ConfigError> {
        let mut value = BString::default();
        let mut in_quote = false;
        // Length of `value` up to the last byte that must be kept.
        let mut keep = 0;

        loop {
            let Some(c) = self.peek() else {
                if in_quote {
                    return Err(self.error("unterminated quote"));
                }
                break;
            };
            self.pos += 1;
            match c {
                b'\n' => {
                    if in_quote {
                        return Err(self.error("newline inside quoted value"));
                    }
                    self.line += 1;
                    break;
                }
                b'\r' if !in_quote => {}
                b'#' | b';' if !in_quote => {
                    self.skip_to_next_line();
                    break;
                }
                b'"' => in_quote = !in_quote,
                b'\\' => {
                    let Some(esc) = self.peek() else {
                        return Err(self.error("backslash at end of file"));
                    };
                    self.pos += 1;
                    match esc {
                        b'\n' => self.line += 1,
                        b'\r' if self.peek() == Some(b'\n') => {
                            self.pos += 1;
                            self.line += 1;
                        }
                        b'n' => value.push_byte(b'\n'),
                        b't' => value.push_byte(b'\t'),
                        b'b' => value.push_byte(0x08),
                        b'\\' | b'"' => value.push_byte(esc),
                        other => {
                            return Err(self.error(format!(
                                "invalid escape sequence: \\{}",
                                other as char
                            )))
                        }
                    }
                    keep = value.len();
                }
                b' ' | b'\t' if !in_quote => value.push_byte(c),
                _ => {
                    value.push_byte(c);
                    keep = value.len();
                }
            }
            if in_quote {
                keep = value.len();
            }
        }

        value.truncate(keep);
        Ok(value)
    }
}
