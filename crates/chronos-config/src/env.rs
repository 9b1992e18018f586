//! Environment variable overrides for the author identity.

use bstr::BString;
use chronos_utils::date::Timestamp;

use crate::error::ConfigError;
use crate::{ConfigEntry, ConfigKey, ConfigScope};

pub const AUTHOR_NAME: &str = "CHRONOS_AUTHOR_NAME";
pub const AUTHOR_EMAIL: &str = "CHRONOS_AUTHOR_EMAIL";
/// `<unix seconds> <+HHMM>`
pub const AUTHOR_DATE: &str = "CHRONOS_AUTHOR_DATE";

/// `user.name` / `user.email` entries for whichever variables are set.
pub fn load_env_overrides() -> Vec<ConfigEntry> {
    overrides_from(|var| std::env::var(var).ok())
}

fn overrides_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigEntry> {
    [(AUTHOR_NAME, "user.name"), (AUTHOR_EMAIL, "user.email")]
        .into_iter()
        .filter_map(|(var, key)| {
            let value = lookup(var)?;
            Some(ConfigEntry {
                key: ConfigKey::parse(key).ok()?,
                value: Some(BString::from(value)),
                scope: ConfigScope::Env,
                line_number: None,
            })
        })
        .collect()
}

/// The pinned author date, if `CHRONOS_AUTHOR_DATE` is set.
pub fn author_date() -> Result<Option<Timestamp>, ConfigError> {
    match std::env::var(AUTHOR_DATE) {
        Ok(raw) => Ok(Some(Timestamp::parse_raw(raw.trim())?)),
        Err(_) => Ok(None),
    }
}
