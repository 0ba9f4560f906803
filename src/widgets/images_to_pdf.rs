//! Turn a set of images into a PDF, one A4 page each.

use async_trait::async_trait;

use super::input::{parse_or, split_command, timestamped_name};
use super::palette::load_image;
use super::pdf::images_to_pdf;
use super::uploads::accept_image;
use super::{Blob, Upload, UploadQueue, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const CONVERT_FAILED: &str = "Error creating PDF. Ensure all files are valid images.";

const USAGE: &[(&str, &str)] = &[
    ("add <file|glob>", "Queue images"),
    ("remove <n>", "Remove the n-th image"),
    ("clear", "Remove all images"),
    ("convert", "Create the PDF in the output directory"),
    ("list", "Show queued images"),
];

pub struct ImagesToPdfWidget {
    images: UploadQueue,
    output: Option<Blob>,
}

impl ImagesToPdfWidget {
    pub fn new() -> Self {
        Self {
            images: UploadQueue::new(),
            output: None,
        }
    }

    pub fn images(&self) -> &UploadQueue {
        &self.images
    }

    async fn convert(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        if self.images.is_empty() {
            return Err(WidgetError::Usage("at least one image"));
        }

        let uploads: Vec<Upload> = self.images.iter().cloned().collect();
        let bytes = tokio::task::spawn_blocking(move || {
            let decoded = uploads
                .iter()
                .map(|u| load_image(&u.path))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| WidgetError::failed(CONVERT_FAILED, e))?;
            images_to_pdf(&decoded).map_err(|e| WidgetError::failed(CONVERT_FAILED, e))
        })
        .await
        .map_err(|e| WidgetError::failed(CONVERT_FAILED, e))??;

        let blob = self
            .output
            .insert(Blob::new(timestamped_name("images_to_pdf", "pdf"), &bytes)?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!(
            "Created {} ({} pages)",
            dest.display(),
            self.images.len()
        )))
    }
}

impl Default for ImagesToPdfWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for ImagesToPdfWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::ImagesToPdf
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel(
            format!("Images to PDF ({} images)", self.images.len()),
            self.images.lines(),
        )
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "convert").then_some("Building PDF...")
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "add" => {
                self.images.add(arg, accept_image)?;
            }
            "remove" | "rm" => {
                self.images.remove(parse_or(arg, 0))?;
            }
            "clear" => self.images.clear(),
            "convert" | "create" => {
                let done = self.convert(ctx).await?;
                return Ok(vec![done]);
            }
            "list" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
