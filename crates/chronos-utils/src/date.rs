use bstr::{BStr, BString, ByteSlice, ByteVec};
use chrono::{FixedOffset, Local, TimeZone};

use crate::error::UtilError;
use crate::Result;

/// A point in time as recorded in commit and tag headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Offset from UTC in minutes (e.g. -300 for UTC-05:00).
    pub tz_offset: i32,
}

/// `-0130` is stored in headers as the decimal number -130; convert it to minutes.
fn hhmm_to_minutes(hhmm: i32) -> i32 {
    let sign = if hhmm < 0 { -1 } else { 1 };
    let abs = hhmm.abs();
    sign * ((abs / 100) * 60 + abs % 100)
}

fn minutes_to_hhmm(minutes: i32) -> i32 {
    let sign = if minutes < 0 { -1 } else { 1 };
    let abs = minutes.abs();
    sign * ((abs / 60) * 100 + abs % 60)
}

impl Timestamp {
    pub fn new(seconds: i64, tz_offset_minutes: i32) -> Self {
        Self {
            seconds,
            tz_offset: tz_offset_minutes,
        }
    }

    /// The current time in the local timezone.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            seconds: now.timestamp(),
            tz_offset: now.offset().local_minus_utc() / 60,
        }
    }

    /// Parse `"<seconds> <±HHMM>"`; a missing offset means UTC.
    pub fn parse_raw(input: &str) -> Result<Self> {
        let mut parts = input.split_whitespace();
        let secs = parts
            .next()
            .ok_or_else(|| UtilError::DateParse("empty timestamp".into()))?;
        let seconds: i64 = secs
            .parse()
            .map_err(|_| UtilError::DateParse(format!("invalid timestamp: '{}'", secs)))?;
        let tz_offset = match parts.next() {
            Some(tz) => {
                let hhmm: i32 = tz
                    .parse()
                    .map_err(|_| UtilError::DateParse(format!("invalid timezone: '{}'", tz)))?;
                hhmm_to_minutes(hhmm)
            }
            None => 0,
        };
        if parts.next().is_some() {
            return Err(UtilError::DateParse(format!("trailing data in '{}'", input)));
        }
        Ok(Self { seconds, tz_offset })
    }

    /// The offset as written in headers: `+0000`, `-0530`.
    pub fn format_offset(&self) -> String {
        format!("{:+05}", minutes_to_hhmm(self.tz_offset))
    }

    /// `"<seconds> <±HHMM>"`.
    pub fn to_raw(&self) -> String {
        format!("{} {}", self.seconds, self.format_offset())
    }

    /// `YYYY-MM-DD HH:MM:SS ±HHMM` in the recorded offset.
    pub fn format_iso(&self) -> String {
        let offset = FixedOffset::east_opt(self.tz_offset * 60)
            .or_else(|| FixedOffset::east_opt(0));
        match offset.and_then(|o| o.timestamp_opt(self.seconds, 0).single()) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            None => self.to_raw(),
        }
    }
}

/// An author, committer or tagger line: `Name <email> <seconds> <±HHMM>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: BString,
    pub email: BString,
    pub when: Timestamp,
}

impl Signature {
    /// Combine a configured `"Name <email>"` identity with a timestamp.
    pub fn from_identity(identity: &str, when: Timestamp) -> Result<Self> {
        let (name, email) = split_identity(identity.as_bytes())
            .ok_or_else(|| UtilError::Identity(identity.to_string()))?;
        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            when,
        })
    }

    /// Parse a header value such as `"Jane <jane@example.com> 1234567890 +0000"`.
    pub fn parse(input: &BStr) -> Result<Self> {
        let input = input.as_bytes();
        let gt = input
            .iter()
            .rposition(|&b| b == b'>')
            .ok_or_else(|| UtilError::DateParse("missing '>' in signature".into()))?;
        let (name, email) = split_identity(&input[..=gt])
            .ok_or_else(|| UtilError::Identity(input.to_str_lossy().into_owned()))?;
        let date = input[gt + 1..].trim().to_str().map_err(|_| {
            UtilError::DateParse("non-UTF-8 date in signature".into())
        })?;
        Ok(Self {
            name: BString::from(name),
            email: BString::from(email),
            when: Timestamp::parse_raw(date)?,
        })
    }

    /// The `Name <email>` part without the timestamp.
    pub fn identity(&self) -> BString {
        let mut out = BString::from(self.name.as_bytes());
        out.push_str(b" <");
        out.push_str(&self.email);
        out.push_str(b">");
        out
    }

    /// Canonical header form.
    pub fn to_bytes(&self) -> BString {
        let mut out = self.identity();
        out.push_str(b" ");
        out.push_str(self.when.to_raw().as_bytes());
        out
    }
}

fn split_identity(input: &[u8]) -> Option<(&[u8], &[u8])> {
    let input = input.trim();
    if input.last() != Some(&b'>') {
        return None;
    }
    let lt = input.iter().rposition(|&b| b == b'<')?;
    let name = input[..lt].trim();
    let email = &input[lt + 1..input.len() - 1];
    Some((name, email))
}
