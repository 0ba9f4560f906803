//! Package files into a ZIP archive.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use async_trait::async_trait;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::input::{parse_or, split_command, timestamped_name};
use super::uploads::accept_any;
use super::{Blob, UploadQueue, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const ZIP_FAILED: &str = "Error creating ZIP archive.";

/// Build a Deflate archive with one entry per `(name, bytes)`.
///
/// Entries keep input order. A repeated name keeps its first position but
/// takes the later contents.
pub fn pack(files: &[(String, Vec<u8>)]) -> zip::result::ZipResult<Vec<u8>> {
    let mut entries: Vec<(&str, &[u8])> = Vec::with_capacity(files.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (name, bytes) in files {
        match positions.get(name.as_str()) {
            Some(&i) => entries[i].1 = bytes.as_slice(),
            None => {
                positions.insert(name.as_str(), entries.len());
                entries.push((name.as_str(), bytes.as_slice()));
            }
        }
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

const USAGE: &[(&str, &str)] = &[
    ("add <file|glob>", "Queue files"),
    ("remove <n>", "Remove the n-th file"),
    ("clear", "Remove all files"),
    ("zip", "Create the archive in the output directory"),
    ("list", "Show queued files"),
];

pub struct ZipCreatorWidget {
    files: UploadQueue,
    archive: Option<Blob>,
}

impl ZipCreatorWidget {
    pub fn new() -> Self {
        Self {
            files: UploadQueue::new(),
            archive: None,
        }
    }

    pub fn files(&self) -> &UploadQueue {
        &self.files
    }

    async fn create(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        if self.files.is_empty() {
            return Err(WidgetError::Usage("at least one file"));
        }

        let mut contents = Vec::with_capacity(self.files.len());
        for upload in self.files.iter() {
            let bytes = upload
                .read()
                .await
                .map_err(|e| WidgetError::failed(ZIP_FAILED, e))?;
            contents.push((upload.name.clone(), bytes));
        }

        let bytes = tokio::task::spawn_blocking(move || pack(&contents))
            .await
            .map_err(|e| WidgetError::failed(ZIP_FAILED, e))?
            .map_err(|e| WidgetError::failed(ZIP_FAILED, e))?;

        let blob = self
            .archive
            .insert(Blob::new(timestamped_name("assignment", "zip"), &bytes)?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!("Created {}", dest.display())))
    }
}

impl Default for ZipCreatorWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for ZipCreatorWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::ZipCreator
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel(format!("ZIP Creator ({} files)", self.files.len()), self.files.lines())
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "zip").then_some("Zipping...")
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "add" => {
                self.files.add(arg, accept_any)?;
            }
            "remove" | "rm" => {
                self.files.remove(parse_or(arg, 0))?;
            }
            "clear" => self.files.clear(),
            "zip" | "create" => {
                let done = self.create(ctx).await?;
                return Ok(vec![done]);
            }
            "list" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entries(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut text = String::new();
                file.read_to_string(&mut text).unwrap();
                (file.name().to_string(), text)
            })
            .collect()
    }

    #[test]
    fn test_pack_keeps_order() {
        let files = vec![
            ("essay.txt".to_string(), b"words".to_vec()),
            ("data.csv".to_string(), b"1,2".to_vec()),
        ];
        let archive = pack(&files).unwrap();
        assert_eq!(
            entries(archive),
            vec![
                ("essay.txt".to_string(), "words".to_string()),
                ("data.csv".to_string(), "1,2".to_string()),
            ]
        );
    }

    #[test]
    fn test_pack_duplicate_names() {
        let files = vec![
            ("a.txt".to_string(), b"first".to_vec()),
            ("b.txt".to_string(), b"bee".to_vec()),
            ("a.txt".to_string(), b"second".to_vec()),
        ];
        assert_eq!(
            entries(pack(&files).unwrap()),
            vec![
                ("a.txt".to_string(), "second".to_string()),
                ("b.txt".to_string(), "bee".to_string()),
            ]
        );
    }

    #[test]
    fn test_pack_uses_deflate() {
        let files = vec![("big.txt".to_string(), "abc".repeat(1000).into_bytes())];
        let bytes = pack(&files).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let file = archive.by_index(0).unwrap();
        assert_eq!(file.compression(), CompressionMethod::Deflated);
        assert!(file.compressed_size() < file.size());
    }

    #[tokio::test]
    async fn test_widget_creates_archive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.md"), b"# Notes").unwrap();
        fs::write(temp.path().join("report.txt"), b"Report").unwrap();
        let out_dir = temp.path().join("out");
        let ctx = WidgetContext::new(&out_dir);

        let mut widget = ZipCreatorWidget::new();
        widget
            .handle(&format!("add {}/*", temp.path().display()), &ctx)
            .await
            .unwrap();
        assert_eq!(widget.files().len(), 2);
        widget.handle("zip", &ctx).await.unwrap();

        let saved: Vec<_> = fs::read_dir(&out_dir).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(saved.len(), 1);
        let name = saved[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("assignment_") && name.ends_with(".zip"));

        let names: Vec<String> = entries(fs::read(&saved[0]).unwrap())
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["notes.md", "report.txt"]);
    }

    #[tokio::test]
    async fn test_vanished_file_reports_generic_message() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("draft.txt");
        fs::write(&path, b"draft").unwrap();
        let out_dir = temp.path().join("out");
        let ctx = WidgetContext::new(&out_dir);

        let mut widget = ZipCreatorWidget::new();
        widget.handle(&format!("add {}", path.display()), &ctx).await.unwrap();
        fs::remove_file(&path).unwrap();

        let err = widget.handle("zip", &ctx).await.unwrap_err();
        assert!(matches!(err, WidgetError::Failed { .. }));
        assert_eq!(err.to_string(), ZIP_FAILED);
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_widget_empty_queue() {
        let ctx = WidgetContext::new(".");
        let mut widget = ZipCreatorWidget::new();
        assert!(matches!(
            widget.handle("zip", &ctx).await,
            Err(WidgetError::Usage(_))
        ));
    }
}
