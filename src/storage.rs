//! File-backed storage port: one file per key under the state directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use timeline::TimelineError;
use timeline::settings::StoragePort;

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        let safe = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect::<String>();
        self.dir.join(safe)
    }
}

impl StoragePort for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), TimelineError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| TimelineError::Storage(e.to_string()))?;
        std::fs::write(self.path(key), value).map_err(|e| TimelineError::Storage(e.to_string()))
    }

    fn remove(&mut self, key: &str) -> Result<(), TimelineError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TimelineError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
