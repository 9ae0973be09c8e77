use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Temporary sibling of the destination, removed on drop unless persisted.
struct StagedFile {
    path: PathBuf,
    file: Option<File>,
}

impl StagedFile {
    fn create(dest: &Path) -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = dest.with_extension(format!("tmp.{nanos:016x}"));
        // create_new refuses to follow a pre-planted file or symlink
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("Failed to create temporary file '{}'", path.display()))?;
        Ok(Self {
            path,
            file: Some(file),
        })
    }

    fn write_synced(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            anyhow::bail!("temporary file '{}' already closed", self.path.display());
        };
        file.write_all(bytes)
            .with_context(|| format!("Failed to write '{}'", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync '{}' to disk", self.path.display()))
    }

    fn persist(mut self, dest: &Path) -> Result<()> {
        self.file.take();

        // Windows refuses to rename over an existing file.
        #[cfg(windows)]
        if dest.exists() {
            std::fs::remove_file(dest)
                .with_context(|| format!("Failed to remove existing '{}'", dest.display()))?;
        }

        std::fs::rename(&self.path, dest).with_context(|| {
            format!(
                "Failed to rename '{}' to '{}'",
                self.path.display(),
                dest.display()
            )
        })?;
        self.path = PathBuf::new();
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.file.take();
        if !self.path.as_os_str().is_empty() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Replaces `dest` with `bytes` via a synced temporary file and a rename.
///
/// Readers of `dest` see either the old contents or the new ones. On any
/// failure the temporary file is removed and `dest` is untouched.
pub fn replace_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    let mut staged = StagedFile::create(dest)?;
    staged.write_synced(bytes)?;
    staged.persist(dest)
}
