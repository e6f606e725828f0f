//! Persistence of generated guides.
//!
//! Each guide is written under its own file name so that concurrent requests never overwrite
//! or read each other's output:
//!
//! ```text
//! <output_dir>/
//! └── guia_circulacao_interna-<32 hex uuid>.pdf
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::constants::OUTPUT_FILE_STEM;
use crate::{GuideError, GuideResult};

/// Writes guide files into one directory.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a request identifier.
    pub fn file_name(request_id: &Uuid) -> String {
        format!("{OUTPUT_FILE_STEM}-{}.pdf", request_id.simple())
    }

    /// Writes `bytes` under a fresh request identifier and returns the path.
    ///
    /// # Errors
    ///
    /// Returns `GuideError::OutputDirCreation` if the directory cannot be created, or
    /// `GuideError::OutputWrite` if the file cannot be written.
    pub fn write(&self, bytes: &[u8]) -> GuideResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(GuideError::OutputDirCreation)?;
        let path = self.dir.join(Self::file_name(&Uuid::new_v4()));
        fs::write(&path, bytes).map_err(GuideError::OutputWrite)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_uses_simple_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            OutputStore::file_name(&id),
            "guia_circulacao_interna-550e8400e29b41d4a716446655440000.pdf"
        );
    }

    #[test]
    fn test_write_creates_directory_and_unique_files() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let store = OutputStore::new(tmp.path().join("static"));

        let first = store.write(b"%PDF-first").unwrap();
        let second = store.write(b"%PDF-second").unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read(&first).unwrap(), b"%PDF-first");
        assert_eq!(fs::read(&second).unwrap(), b"%PDF-second");
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_fails_when_dir_is_a_file() {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let blocker = tmp.path().join("static");
        fs::write(&blocker, "x").unwrap();

        let store = OutputStore::new(&blocker);
        assert!(matches!(
            store.write(b"%PDF"),
            Err(GuideError::OutputDirCreation(_))
        ));
    }
}
