//! Dominant colour extraction.
//!
//! Colours are bucketed by exact hex value, with no perceptual clustering.
//! Photos with gradients therefore produce near-duplicate entries.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader};

use super::input::split_command;
use super::{rank_by_frequency, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

/// Side of the square the image is resampled to.
pub const SAMPLE_SIZE: u32 = 100;
/// Every n-th pixel is sampled.
pub const SAMPLE_STRIDE: usize = 10;
pub const PALETTE_SIZE: usize = 6;

const PALETTE_FAILED: &str = "Could not process image.";

/// Top colours of `image` as lower-case `#rrggbb`, most frequent first.
pub fn extract_palette(image: &DynamicImage) -> Vec<String> {
    let small = image
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Nearest)
        .to_rgba8();

    let samples = small
        .pixels()
        .step_by(SAMPLE_STRIDE)
        .map(|p| format!("#{:02x}{:02x}{:02x}", p[0], p[1], p[2]));

    rank_by_frequency(samples, PALETTE_SIZE)
        .into_iter()
        .map(|(hex, _)| hex)
        .collect()
}

pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

const USAGE: &[(&str, &str)] = &[
    ("load <image>", "Extract colours from an image"),
    ("show", "Show the palette"),
];

pub struct PaletteWidget {
    source: Option<PathBuf>,
    colors: Vec<String>,
}

impl PaletteWidget {
    pub fn new() -> Self {
        Self {
            source: None,
            colors: Vec::new(),
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for PaletteWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for PaletteWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::PaletteExtractor
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        match &self.source {
            Some(path) => Message::panel(
                "Palette Extractor",
                [format!("{} ({} colours)", path.display(), self.colors.len())],
            ),
            None => Message::panel("Palette Extractor", ["Load an image to extract its palette."]),
        }
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "load").then_some("Sampling pixels...")
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "load" | "open" => {
                if arg.is_empty() {
                    return Err(WidgetError::Usage("an image path"));
                }
                let path = PathBuf::from(shellexpand::tilde(arg).as_ref());
                let decode_path = path.clone();
                let colors = tokio::task::spawn_blocking(move || {
                    load_image(&decode_path)
                        .map(|img| extract_palette(&img))
                        .map_err(|e| WidgetError::failed(PALETTE_FAILED, e))
                })
                .await
                .map_err(|e| WidgetError::failed(PALETTE_FAILED, e))??;

                tracing::debug!(path = %path.display(), colors = colors.len(), "Extracted palette");
                self.source = Some(path);
                self.colors = colors;
            }
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render(), Message::Swatches(self.colors.clone())])
    }
}
