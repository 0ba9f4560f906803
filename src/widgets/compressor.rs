//! Lossy re-encoding of raster images.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};

use super::input::{format_kb, parse_f64_or, split_command};
use super::palette::load_image;
use super::{Blob, Upload, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const DEFAULT_QUALITY: f64 = 0.7;
pub const MIN_QUALITY: f64 = 0.1;
pub const MAX_QUALITY: f64 = 1.0;

const COMPRESS_FAILED: &str = "Compression failed. Ensure the file is a valid image.";

pub fn clamp_quality(quality: f64) -> f64 {
    if quality.is_nan() {
        return DEFAULT_QUALITY;
    }
    quality.clamp(MIN_QUALITY, MAX_QUALITY)
}

/// Map a 0.1-1.0 factor onto the encoder's 1-100 scale.
pub fn encoder_quality(quality: f64) -> u8 {
    (clamp_quality(quality) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Re-encode `image` as JPEG. Alpha is dropped.
pub fn compress_image(image: &DynamicImage, quality: f64) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Cursor::new(Vec::new());
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, encoder_quality(quality)))?;
    Ok(bytes.into_inner())
}

/// Percentage saved, `(1 - after/before) * 100`. Negative when the output grew.
pub fn saved_percent(before: u64, after: u64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (1.0 - after as f64 / before as f64) * 100.0
}

/// Download name for a compressed copy of `original`.
pub fn compressed_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("compressed-{}.jpg", stem)
}

const USAGE: &[(&str, &str)] = &[
    ("load <image>", "Choose the image to compress"),
    ("quality <0.1-1.0>", "Set the quality factor"),
    ("compress", "Re-encode at the current quality"),
    ("save", "Write the compressed image to the output directory"),
];

pub struct CompressorWidget {
    original: Option<Upload>,
    compressed: Option<Blob>,
    quality: f64,
}

impl CompressorWidget {
    pub fn new() -> Self {
        Self {
            original: None,
            compressed: None,
            quality: DEFAULT_QUALITY,
        }
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn compressed(&self) -> Option<&Blob> {
        self.compressed.as_ref()
    }

    async fn compress(&mut self) -> Result<(), WidgetError> {
        let original = self
            .original
            .as_ref()
            .ok_or(WidgetError::Usage("an image; use 'load <image>' first"))?;

        let path = original.path.clone();
        let quality = self.quality;
        let bytes = tokio::task::spawn_blocking(move || {
            let image = load_image(&path).map_err(|e| WidgetError::failed(COMPRESS_FAILED, e))?;
            compress_image(&image, quality).map_err(|e| WidgetError::failed(COMPRESS_FAILED, e))
        })
        .await
        .map_err(|e| WidgetError::failed(COMPRESS_FAILED, e))??;

        self.compressed = Some(Blob::new(compressed_name(&original.name), &bytes)?);
        Ok(())
    }
}

impl Default for CompressorWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for CompressorWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::ImageCompressor
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let mut lines = vec![format!("Quality: {:.0}%", self.quality * 100.0)];
        match &self.original {
            Some(original) => {
                lines.push(format!("Original: {} ({})", original.name, format_kb(original.size)))
            }
            None => lines.push("No image loaded.".to_string()),
        }
        if let (Some(original), Some(blob)) = (&self.original, &self.compressed) {
            lines.push(format!("Compressed: {}", format_kb(blob.len())));
            lines.push(format!("Saved: {:.0}%", saved_percent(original.size, blob.len())));
        }
        Message::panel("Image Compressor", lines)
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "compress").then_some("Compressing...")
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "load" | "open" => {
                if arg.is_empty() {
                    return Err(WidgetError::Usage("an image path"));
                }
                let path = PathBuf::from(shellexpand::tilde(arg).as_ref());
                self.original = Some(Upload::from_path(path)?);
                self.compressed = None;
            }
            "quality" => self.quality = clamp_quality(parse_f64_or(arg, DEFAULT_QUALITY)),
            "compress" => self.compress().await?,
            "save" | "download" => {
                let blob = self
                    .compressed
                    .as_ref()
                    .ok_or(WidgetError::Usage("a compressed image; run 'compress' first"))?;
                let dest = blob.save_to(&ctx.output_dir)?;
                return Ok(vec![Message::success(format!("Saved {}", dest.display()))]);
            }
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
