use std::fs;
use std::path::{Path, PathBuf};

use chronos_config::{ConfigFile, ConfigKey, ConfigScope};
use chronos_ref::{FileRefStore, RefName};
use tracing::debug;

use crate::{RepoError, Result, DOT_DIR};

const DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const EXCLUDE: &str = "# Patterns listed here are ignored in every working tree of this repository.\n\
                       # Lines that start with '#' are comments.\n";

/// Create the metadata directory under `path`.
///
/// Creates:
/// - HEAD (pointing at `refs/heads/master`)
/// - config
/// - description
/// - branches/
/// - objects/
/// - refs/heads/
/// - refs/tags/
/// - info/exclude
///
/// `path` is created if missing. An existing non-empty metadata directory is
/// never touched.
pub(crate) fn init_repository(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let path = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };

    let git_dir = path.join(DOT_DIR);
    if path.exists() {
        if !path.is_dir() {
            return Err(RepoError::NotADirectory(path));
        }
        if git_dir.exists() {
            if !git_dir.is_dir() {
                return Err(RepoError::NotADirectory(git_dir));
            }
            if fs::read_dir(&git_dir)?.next().is_some() {
                return Err(RepoError::AlreadyExists(git_dir));
            }
        }
    } else {
        fs::create_dir_all(&path)?;
    }

    for dir in ["branches", "objects", "refs/heads", "refs/tags", "info"] {
        fs::create_dir_all(git_dir.join(dir))?;
    }

    FileRefStore::new(&git_dir).write_symbolic_ref(&RefName::head(), &RefName::branch("master")?)?;
    fs::write(git_dir.join("description"), DESCRIPTION)?;
    fs::write(git_dir.join("info").join("exclude"), EXCLUDE)?;
    default_config().write_to(&git_dir.join("config"))?;

    let work_tree = fs::canonicalize(&path)?;
    let git_dir = work_tree.join(DOT_DIR);
    debug!(git_dir = %git_dir.display(), "initialized repository");
    Ok((work_tree, git_dir))
}

fn default_config() -> ConfigFile {
    let mut config = ConfigFile::new(ConfigScope::Local);
    for (key, value) in [
        ("core.repositoryformatversion", "0"),
        ("core.filemode", "false"),
        ("core.bare", "false"),
    ] {
        if let Ok(key) = ConfigKey::parse(key) {
            config.set(&key, value);
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let (work_tree, git_dir) = init_repository(&dir.path().join("repo")).unwrap();

        assert!(work_tree.is_dir());
        for sub in ["branches", "objects", "refs/heads", "refs/tags"] {
            assert!(git_dir.join(sub).is_dir(), "{sub} missing");
        }
        assert_eq!(
            fs::read_to_string(git_dir.join("HEAD")).unwrap(),
            "ref: refs/heads/master\n"
        );
        assert!(git_dir.join("description").is_file());
    }

    #[test]
    fn config_has_core_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (_, git_dir) = init_repository(dir.path()).unwrap();

        let config = ConfigFile::load(&git_dir.join("config"), ConfigScope::Local).unwrap();
        let get = |k: &str| {
            config
                .get(&ConfigKey::parse(k).unwrap())
                .flatten()
                .map(|v| v.to_string())
        };
        assert_eq!(get("core.repositoryformatversion").as_deref(), Some("0"));
        assert_eq!(get("core.filemode").as_deref(), Some("false"));
        assert_eq!(get("core.bare").as_deref(), Some("false"));
    }

    #[test]
    fn refuses_non_empty_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        init_repository(dir.path()).unwrap();
        assert!(matches!(
            init_repository(dir.path()),
            Err(RepoError::AlreadyExists(_))
        ));
    }

    #[test]
    fn accepts_empty_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        assert!(init_repository(dir.path()).is_ok());
    }

    #[test]
    fn refuses_file_target() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            init_repository(&file),
            Err(RepoError::NotADirectory(_))
        ));
    }
}
