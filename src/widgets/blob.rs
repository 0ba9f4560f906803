//! Scoped handles for generated artifacts.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Generated bytes held in a temporary file until saved or dropped.
///
/// Dropping the handle deletes the temporary file. Widgets keep at most one
/// blob per output, so replacing it releases the previous one.
#[derive(Debug)]
pub struct Blob {
    file_name: String,
    len: u64,
    temp: NamedTempFile,
}

impl Blob {
    /// Write `bytes` to a fresh temporary file.
    pub fn new(file_name: impl Into<String>, bytes: &[u8]) -> io::Result<Self> {
        let file_name = file_name.into();
        let mut temp = NamedTempFile::new()?;
        temp.write_all(bytes)?;
        temp.flush()?;
        debug!(file = %file_name, bytes = bytes.len(), "Created artifact");
        Ok(Self {
            file_name,
            len: bytes.len() as u64,
            temp,
        })
    }

    /// Name used when saving.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Location of the temporary file.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(self.temp.path())
    }

    /// Copy the artifact into `dir` under its file name.
    pub fn save_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let dest = dir.join(&self.file_name);
        fs::copy(self.temp.path(), &dest)?;
        info!(path = %dest.display(), bytes = self.len, "Saved artifact");
        Ok(dest)
    }
}

impl Drop for Blob {
    fn drop(&mut self) {
        debug!(file = %self.file_name, "Released artifact");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blob_holds_bytes() {
        let blob = Blob::new("out.bin", b"hello").unwrap();
        assert_eq!(blob.file_name(), "out.bin");
        assert_eq!(blob.len(), 5);
        assert!(!blob.is_empty());
        assert_eq!(blob.read().unwrap(), b"hello");
    }

    #[test]
    fn test_drop_deletes_temp_file() {
        let blob = Blob::new("out.bin", b"data").unwrap();
        let path = blob.path().to_path_buf();
        assert!(path.exists());
        drop(blob);
        assert!(!path.exists());
    }

    #[test]
    fn test_replacing_releases_previous() {
        let mut slot = Some(Blob::new("a.bin", b"a").unwrap());
        let old_path = slot.as_ref().unwrap().path().to_path_buf();
        slot = Some(Blob::new("b.bin", b"b").unwrap());
        assert!(!old_path.exists());
        assert_eq!(slot.unwrap().file_name(), "b.bin");
    }

    #[test]
    fn test_save_to_creates_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("out");
        let blob = Blob::new("report.txt", b"saved").unwrap();

        let dest = blob.save_to(&dir).unwrap();
        assert_eq!(dest, dir.join("report.txt"));
        assert_eq!(fs::read(&dest).unwrap(), b"saved");
        // The temp file is still owned by the blob.
        assert!(blob.path().exists());
    }
}
