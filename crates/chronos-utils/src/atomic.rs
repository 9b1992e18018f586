use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::UtilError;
use crate::Result;

/// A file that replaces its target wholesale when committed.
///
/// Bytes are written to a temporary file next to the target and renamed over
/// it on [`commit`](AtomicFile::commit). Dropping without committing leaves
/// the target untouched and removes the temporary file. There is no lock
/// protocol: two writers racing on the same target end with last-rename-wins.
pub struct AtomicFile {
    target: PathBuf,
    inner: ::tempfile::NamedTempFile,
}

impl AtomicFile {
    /// Start replacing `target`. Missing parent directories are created.
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let dir = target.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;
        let inner = ::tempfile::NamedTempFile::new_in(dir)?;
        Ok(Self { target, inner })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush and rename over the target.
    pub fn commit(mut self) -> Result<()> {
        self.inner.flush()?;
        let target = self.target;
        self.inner
            .persist(&target)
            .map_err(|e| UtilError::Replace {
                path: target.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Replace `target` with `data` in one rename.
pub fn write_atomic(target: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let mut file = AtomicFile::create(target)?;
    file.write_all(data)?;
    file.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_replaces_target() {
        let dir = ::tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        fs::write(&target, b"old").unwrap();

        let mut f = AtomicFile::create(&target).unwrap();
        f.write_all(b"new contents").unwrap();
        f.commit().unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new contents");
    }

    #[test]
    fn drop_leaves_target_untouched() {
        let dir = ::tempfile::tempdir().unwrap();
        let target = dir.path().join("HEAD");
        fs::write(&target, b"ref: refs/heads/master\n").unwrap();

        {
            let mut f = AtomicFile::create(&target).unwrap();
            f.write_all(b"garbage").unwrap();
        }

        assert_eq!(fs::read(&target).unwrap(), b"ref: refs/heads/master\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_parents() {
        let dir = ::tempfile::tempdir().unwrap();
        let target = dir.path().join("refs").join("tags").join("v1");
        write_atomic(&target, b"abc\n").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"abc\n");
    }
}
