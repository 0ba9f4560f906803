//! Merge several PDFs into one.

use async_trait::async_trait;

use super::input::{parse_or, split_command, timestamped_name};
use super::pdf::{merge_pdfs, page_count, PdfError};
use super::uploads::accept_pdf;
use super::{Blob, UploadQueue, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const MERGE_FAILED: &str =
    "Error merging PDFs. Ensure files are valid and not password-protected.";

const USAGE: &[(&str, &str)] = &[
    ("add <file|glob>", "Queue PDF files"),
    ("remove <n>", "Remove the n-th file"),
    ("clear", "Remove all files"),
    ("merge", "Merge and save to the output directory"),
    ("list", "Show queued files"),
];

pub struct PdfMergerWidget {
    files: UploadQueue,
    merged: Option<Blob>,
}

impl PdfMergerWidget {
    pub fn new() -> Self {
        Self {
            files: UploadQueue::new(),
            merged: None,
        }
    }

    pub fn files(&self) -> &UploadQueue {
        &self.files
    }

    async fn merge(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        if self.files.len() < 2 {
            return Err(WidgetError::Usage("at least 2 PDF files"));
        }

        let mut sources = Vec::with_capacity(self.files.len());
        for upload in self.files.iter() {
            let bytes = upload
                .read()
                .await
                .map_err(|e| WidgetError::failed(MERGE_FAILED, e))?;
            sources.push(bytes);
        }

        let (bytes, pages) = tokio::task::spawn_blocking(move || {
            let bytes = merge_pdfs(&sources)?;
            let pages = page_count(&bytes)?;
            Ok::<_, PdfError>((bytes, pages))
        })
        .await
        .map_err(|e| WidgetError::failed(MERGE_FAILED, e))?
        .map_err(|e| WidgetError::failed(MERGE_FAILED, e))?;

        let blob = self.merged.insert(Blob::new(timestamped_name("merged", "pdf"), &bytes)?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!(
            "Merged {} files ({} pages) into {}",
            self.files.len(),
            pages,
            dest.display()
        )))
    }
}

impl Default for PdfMergerWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for PdfMergerWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::PdfMerger
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel(format!("Merge PDF ({} files)", self.files.len()), self.files.lines())
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "merge").then_some("Merging...")
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "add" => {
                self.files.add(arg, accept_pdf)?;
            }
            "remove" | "rm" => {
                self.files.remove(parse_or(arg, 0))?;
            }
            "clear" => self.files.clear(),
            "merge" => {
                let done = self.merge(ctx).await?;
                return Ok(vec![done]);
            }
            "list" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
