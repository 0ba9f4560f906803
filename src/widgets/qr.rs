//! QR codes rendered by an external image service.

use async_trait::async_trait;
use reqwest::Url;

use super::input::{parse_or, split_command, timestamped_name};
use super::{Blob, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const DEFAULT_SIZE: u32 = 300;
pub const MIN_SIZE: u32 = 100;
pub const MAX_SIZE: u32 = 1000;
pub const DEFAULT_FOREGROUND: &str = "#137fec";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

const DOWNLOAD_FAILED: &str = "Could not download the QR code. Check your connection.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrOptions {
    pub content: String,
    pub size: u32,
    pub foreground: String,
    pub background: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            content: String::new(),
            size: DEFAULT_SIZE,
            foreground: DEFAULT_FOREGROUND.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Normalise `#RRGGBB` / `RRGGBB` to lower-case `#rrggbb`.
pub fn normalize_hex(input: &str) -> Option<String> {
    let digits = input.trim().trim_start_matches('#');
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| format!("#{}", digits.to_lowercase()))
}

/// Image URL for `options`, or `None` while there is no content.
pub fn qr_url(service: &str, options: &QrOptions) -> Result<Option<Url>, WidgetError> {
    if options.content.is_empty() {
        return Ok(None);
    }
    let size = format!("{}x{}", options.size, options.size);
    let url = Url::parse_with_params(
        service,
        &[
            ("size", size.as_str()),
            ("data", options.content.as_str()),
            ("color", options.foreground.trim_start_matches('#')),
            ("bgcolor", options.background.trim_start_matches('#')),
        ],
    )
    .map_err(|e| WidgetError::Invalid(format!("Invalid QR service URL {}: {}", service, e)))?;
    Ok(Some(url))
}

/// Fetch the rendered PNG.
pub async fn fetch_qr(client: &reqwest::Client, url: Url) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

const USAGE: &[(&str, &str)] = &[
    ("text <content>", "Set the encoded text or URL"),
    ("size <100-1000>", "Set the resolution in pixels"),
    ("fg <#rrggbb>", "Set the foreground colour"),
    ("bg <#rrggbb>", "Set the background colour"),
    ("preview", "Open the QR image in a browser"),
    ("download", "Save the PNG to the output directory"),
    ("show", "Show the current settings"),
];

pub struct QrWidget {
    options: QrOptions,
    image: Option<Blob>,
}

impl QrWidget {
    pub fn new() -> Self {
        Self {
            options: QrOptions::default(),
            image: None,
        }
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    fn require_url(&self, ctx: &WidgetContext) -> Result<Url, WidgetError> {
        qr_url(&ctx.qr_service_url, &self.options)?
            .ok_or(WidgetError::Usage("some content; use 'text <content>' first"))
    }

    fn set_color(target: &mut String, arg: &str) -> Result<(), WidgetError> {
        *target = normalize_hex(arg)
            .ok_or_else(|| WidgetError::Invalid(format!("Not a hex colour: {}", arg)))?;
        Ok(())
    }

    async fn download(&mut self, ctx: &WidgetContext) -> Result<Message, WidgetError> {
        let url = self.require_url(ctx)?;
        let bytes = fetch_qr(&ctx.http, url)
            .await
            .map_err(|e| WidgetError::failed(DOWNLOAD_FAILED, e))?;
        let blob = self
            .image
            .insert(Blob::new(timestamped_name("qrcode", "png"), &bytes)?);
        let dest = blob.save_to(&ctx.output_dir)?;
        Ok(Message::success(format!("Saved {}", dest.display())))
    }
}

impl Default for QrWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for QrWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::QrGenerator
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let o = &self.options;
        let content = if o.content.is_empty() {
            "(empty)".to_string()
        } else {
            o.content.clone()
        };
        Message::panel(
            "QR Code Pro",
            [
                format!("Content: {}", content),
                format!("Resolution: {}px", o.size),
                format!("Colours: {} on {}", o.foreground, o.background),
            ],
        )
    }

    fn busy_label(&self, input: &str) -> Option<&'static str> {
        (split_command(input).0 == "download").then_some("Downloading QR code...")
    }

    async fn handle(
        &mut self,
        input: &str,
        ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "text" | "data" => self.options.content = arg.to_string(),
            "size" => {
                self.options.size = parse_or(arg, DEFAULT_SIZE).clamp(MIN_SIZE, MAX_SIZE);
            }
            "fg" | "color" => Self::set_color(&mut self.options.foreground, arg)?,
            "bg" | "bgcolor" => Self::set_color(&mut self.options.background, arg)?,
            "url" => {
                let url = self.require_url(ctx)?;
                return Ok(vec![Message::info(url.to_string())]);
            }
            "preview" | "open" => {
                let url = self.require_url(ctx)?;
                webbrowser::open(url.as_str())
                    .map_err(|e| WidgetError::failed("Could not open a browser.", e))?;
                return Ok(vec![Message::info(format!("Opened {}", url))]);
            }
            "download" | "save" => {
                let done = self.download(ctx).await?;
                return Ok(vec![done]);
            }
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
