//! Typed value conversion.

use bstr::{BStr, ByteSlice};

use crate::error::ConfigError;

/// Parse a boolean config value.
///
/// - no value (bare key): true
/// - empty string: false
/// - `true`/`yes`/`on` and `false`/`no`/`off`, case-insensitive
/// - integers: zero is false, anything else true
pub fn parse_bool(value: Option<&BStr>) -> Result<bool, ConfigError> {
    let Some(v) = value else {
        return Ok(true);
    };
    let s = v.to_str_lossy();
    let s = s.trim();
    if s.is_empty() {
        return Ok(false);
    }
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => s
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| ConfigError::InvalidBool(s.to_string())),
    }
}

/// Parse an integer config value with an optional `k`/`m`/`g` suffix
/// (powers of 1024).
pub fn parse_int(value: &BStr) -> Result<i64, ConfigError> {
    let s = value.to_str_lossy();
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidInt("empty value".into()));
    }

    let (digits, multiplier): (&str, i64) = match s.as_bytes().last() {
        Some(b'k' | b'K') if s.len() > 1 => (&s[..s.len() - 1], 1 << 10),
        Some(b'm' | b'M') if s.len() > 1 => (&s[..s.len() - 1], 1 << 20),
        Some(b'g' | b'G') if s.len() > 1 => (&s[..s.len() - 1], 1 << 30),
        _ => (s, 1),
    };
    let base: i64 = digits
        .parse()
        .map_err(|_| ConfigError::InvalidInt(s.to_string()))?;
    base.checked_mul(multiplier)
        .ok_or_else(|| ConfigError::InvalidInt(format!("overflow: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools() {
        assert!(parse_bool(None).unwrap());
        assert!(!parse_bool(Some(BStr::new(""))).unwrap());
        assert!(parse_bool(Some(BStr::new("Yes"))).unwrap());
        assert!(!parse_bool(Some(BStr::new("off"))).unwrap());
        assert!(parse_bool(Some(BStr::new("2"))).unwrap());
        assert!(!parse_bool(Some(BStr::new("0"))).unwrap());
        assert!(parse_bool(Some(BStr::new("maybe"))).is_err());
    }

    #[test]
    fn ints() {
        assert_eq!(parse_int(BStr::new("0")).unwrap(), 0);
        assert_eq!(parse_int(BStr::new("-3")).unwrap(), -3);
        assert_eq!(parse_int(BStr::new("2k")).unwrap(), 2048);
        assert_eq!(parse_int(BStr::new("1M")).unwrap(), 1 << 20);
        assert!(parse_int(BStr::new("k")).is_err());
        assert!(parse_int(BStr::new("")).is_err());
        assert!(parse_int(BStr::new("99999999999g")).is_err());
    }
}
