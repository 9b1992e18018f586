//! Config files read from disk in precedence order.

use std::fs;

use chronos_config::{ConfigFile, ConfigKey, ConfigScope, ConfigSet};

#[test]
fn repository_config_overrides_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("gitconfig");
    let local = dir.path().join("config");
    fs::write(&global, "[user]\n\tname = Global User\n\temail = global@example.com\n").unwrap();
    fs::write(&local, "[user]\n\temail = repo@example.com\n").unwrap();

    let mut set = ConfigSet::new();
    set.add_path(&global, ConfigScope::Global).unwrap();
    set.add_path(&local, ConfigScope::Local).unwrap();

    assert_eq!(
        set.user_identity().unwrap().as_deref(),
        Some("Global User <repo@example.com>")
    );
}

#[test]
fn written_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".git").join("config");

    let mut file = ConfigFile::new(ConfigScope::Local);
    file.set(&ConfigKey::parse("core.repositoryformatversion").unwrap(), "0");
    file.set(&ConfigKey::parse("core.bare").unwrap(), "false");
    file.write_to(&path).unwrap();

    let mut set = ConfigSet::new();
    set.add_path(&path, ConfigScope::Local).unwrap();
    assert_eq!(set.get_int("core.repositoryformatversion").unwrap(), Some(0));
    assert_eq!(set.get_bool("core.bare").unwrap(), Some(false));
}

#[test]
fn parse_errors_carry_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    fs::write(&path, "[core]\n\tok = 1\n\t= broken\n").unwrap();

    let err = ConfigSet::new().add_path(&path, ConfigScope::Local).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains(":3:"), "{msg}");
}
