//! Tool widgets.
//!
//! Each module exposes the widget's computation as plain functions and a
//! [`Widget`] session holding its transient state. Sessions are created by
//! [`mount`] when a tool opens and dropped when it closes; any [`Blob`] a
//! session owns goes with it.

mod blob;
pub mod input;
mod uploads;

pub mod bmi;
pub mod calculator;
pub mod compressor;
pub mod exam_countdown;
pub mod images_to_pdf;
pub mod invoice;
pub mod json_formatter;
pub mod lorem;
pub mod palette;
pub mod password;
pub mod pdf;
pub mod pdf_merger;
pub mod qr;
pub mod timetable;
pub mod unit_converter;
pub mod word_analyst;
pub mod zip_creator;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Settings, DEFAULT_QR_SERVICE_URL};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub use blob::Blob;
pub use uploads::{Upload, UploadQueue};

/// Widget errors.
///
/// Messages are shown inline in the widget; none of them end the session.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("Unknown command '{0}'. Type 'help' for usage.")]
    UnknownCommand(String),
    #[error("Expected {0}")]
    Usage(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("No files match {0}")]
    NoMatch(String),
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// An external operation failed; `message` is what the user sees.
    #[error("{message}")]
    Failed {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("Failed to save file: {0}")]
    Save(#[from] std::io::Error),
}

impl WidgetError {
    pub fn failed(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Failed {
            message,
            source: source.into(),
        }
    }
}

/// Everything a widget may touch outside its own state.
#[derive(Debug, Clone)]
pub struct WidgetContext {
    /// Where downloads are written.
    pub output_dir: PathBuf,
    pub qr_service_url: String,
    pub http: reqwest::Client,
}

impl WidgetContext {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            qr_service_url: DEFAULT_QR_SERVICE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            output_dir: settings.output_dir(),
            qr_service_url: settings.qr.service_url.clone(),
            http: reqwest::Client::new(),
        }
    }
}

/// A mounted tool session.
#[async_trait]
pub trait Widget: Send {
    fn kind(&self) -> ToolKind;

    /// `(command, description)` pairs shown by `help`.
    fn usage(&self) -> &'static [(&'static str, &'static str)];

    /// Current state as a panel.
    fn render(&self) -> Message;

    /// Spinner text when `input` starts slow work.
    fn busy_label(&self, _input: &str) -> Option<&'static str> {
        None
    }

    /// Apply one line of input.
    async fn handle(&mut self, input: &str, ctx: &WidgetContext)
        -> Result<Vec<Message>, WidgetError>;
}

/// Create a fresh session for `kind`.
pub fn mount(kind: ToolKind) -> Box<dyn Widget> {
    tracing::debug!(tool = kind.id(), "Mounting widget");
    match kind {
        ToolKind::QrGenerator => Box::new(qr::QrWidget::new()),
        ToolKind::ImageCompressor => Box::new(compressor::CompressorWidget::new()),
        ToolKind::PasswordSuite => Box::new(password::PasswordWidget::new()),
        ToolKind::WordAnalyst => Box::new(word_analyst::WordAnalystWidget::new()),
        ToolKind::InvoiceMaker => Box::new(invoice::InvoiceWidget::new()),
        ToolKind::PaletteExtractor => Box::new(palette::PaletteWidget::new()),
        ToolKind::PdfMerger => Box::new(pdf_merger::PdfMergerWidget::new()),
        ToolKind::ImagesToPdf => Box::new(images_to_pdf::ImagesToPdfWidget::new()),
        ToolKind::ZipCreator => Box::new(zip_creator::ZipCreatorWidget::new()),
        ToolKind::StudyCalc => Box::new(calculator::CalculatorWidget::new()),
        ToolKind::ExamTracker => Box::new(exam_countdown::ExamWidget::new()),
        ToolKind::TimetableMaker => Box::new(timetable::TimetableWidget::new()),
        ToolKind::UnitConverter => Box::new(unit_converter::ConverterWidget::new()),
        ToolKind::BmiCalculator => Box::new(bmi::BmiWidget::new()),
        ToolKind::JsonFormatter => Box::new(json_formatter::JsonWidget::new()),
        ToolKind::LoremIpsum => Box::new(lorem::LoremWidget::new()),
    }
}

/// Help panel for a widget.
pub fn usage_message(widget: &dyn Widget) -> Message {
    let name = crate::registry::descriptor(widget.kind()).name;
    let mut lines: Vec<String> = widget
        .usage()
        .iter()
        .map(|(cmd, desc)| format!("{:<28} {}", cmd, desc))
        .collect();
    lines.push(format!("{:<28} {}", "help", "Show this help"));
    Message::panel(format!("{} commands", name), lines)
}

/// Count occurrences and return the `limit` most frequent.
///
/// Sorting is stable, so equal counts keep first-seen order.
pub(crate) fn rank_by_frequency<I>(items: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}
