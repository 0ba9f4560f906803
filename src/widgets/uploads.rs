//! Ordered list of files a widget has been given.

use std::path::{Path, PathBuf};

use super::input::{expand_files, format_kb};
use super::WidgetError;

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl Upload {
    pub fn from_path(path: PathBuf) -> Result<Self, WidgetError> {
        let size = std::fs::metadata(&path)
            .map_err(|source| WidgetError::Read {
                path: path.clone(),
                source,
            })?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, path, size })
    }

    pub async fn read(&self) -> Result<Vec<u8>, WidgetError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| WidgetError::Read {
                path: self.path.clone(),
                source,
            })
    }
}

/// Files in upload order.
#[derive(Debug, Default)]
pub struct UploadQueue {
    files: Vec<Upload>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every file matching `pattern` that `accept` allows.
    ///
    /// Returns the number of files added. Files the filter rejects are
    /// skipped silently, like a file picker's type filter.
    pub fn add(&mut self, pattern: &str, accept: fn(&Path) -> bool) -> Result<usize, WidgetError> {
        let mut added = 0;
        for path in expand_files(pattern)? {
            if !accept(&path) {
                tracing::debug!(path = %path.display(), "Skipping file of unsupported type");
                continue;
            }
            self.files.push(Upload::from_path(path)?);
            added += 1;
        }
        Ok(added)
    }

    /// Remove by 1-based position.
    pub fn remove(&mut self, position: usize) -> Result<Upload, WidgetError> {
        if position == 0 || position > self.files.len() {
            return Err(WidgetError::Invalid(format!(
                "No file at position {} ({} queued)",
                position,
                self.files.len()
            )));
        }
        Ok(self.files.remove(position - 1))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upload> {
        self.files.iter()
    }

    /// Numbered listing for panels.
    pub fn lines(&self) -> Vec<String> {
        if self.files.is_empty() {
            return vec!["(no files)".to_string()];
        }
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}. {} ({})", i + 1, f.name, format_kb(f.size)))
            .collect()
    }
}

/// Lower-cased extension of `path`.
pub fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn accept_any(_: &Path) -> bool {
    true
}

pub fn accept_pdf(path: &Path) -> bool {
    extension(path) == "pdf"
}

pub fn accept_image(path: &Path) -> bool {
    matches!(
        extension(path).as_str(),
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tif" | "tiff"
    )
}
