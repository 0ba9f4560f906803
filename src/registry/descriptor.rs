//! Tool descriptor types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Category a tool is listed under.
///
/// `All` is the wildcard used by the filter; no tool carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Category {
    #[default]
    All,
    StudentKit,
    ImageTools,
    TextTools,
    DevTools,
    Converters,
    Security,
    PdfTools,
}

/// Categories offered by the shell's category bar, in display order.
pub const CATEGORIES: &[Category] = &[
    Category::All,
    Category::StudentKit,
    Category::ImageTools,
    Category::TextTools,
    Category::DevTools,
    Category::Converters,
    Category::Security,
];

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All",
            Category::StudentKit => "Student Kit",
            Category::ImageTools => "Image Tools",
            Category::TextTools => "Text Tools",
            Category::DevTools => "Dev Tools",
            Category::Converters => "Converters",
            Category::Security => "Security",
            Category::PdfTools => "PDF Tools",
        }
    }

    /// Every category, including ones the category bar does not show.
    pub fn all() -> [Category; 8] {
        [
            Category::All,
            Category::StudentKit,
            Category::ImageTools,
            Category::TextTools,
            Category::DevTools,
            Category::Converters,
            Category::Security,
            Category::PdfTools,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts labels case-insensitively, with spaces, dashes or underscores
    /// ("student kit", "Student-Kit", "studentkit").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Category::all()
            .into_iter()
            .find(|c| normalize(c.label()) == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Which widget a descriptor launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolKind {
    QrGenerator,
    ImageCompressor,
    PasswordSuite,
    WordAnalyst,
    InvoiceMaker,
    PaletteExtractor,
    PdfMerger,
    ImagesToPdf,
    ZipCreator,
    StudyCalc,
    ExamTracker,
    TimetableMaker,
    UnitConverter,
    BmiCalculator,
    JsonFormatter,
    LoremIpsum,
}

impl ToolKind {
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::QrGenerator => "qr-generator",
            ToolKind::ImageCompressor => "image-compressor",
            ToolKind::PasswordSuite => "password-checker",
            ToolKind::WordAnalyst => "word-counter",
            ToolKind::InvoiceMaker => "invoice-generator",
            ToolKind::PaletteExtractor => "color-palette",
            ToolKind::PdfMerger => "pdf-merger",
            ToolKind::ImagesToPdf => "images-to-pdf",
            ToolKind::ZipCreator => "zip-creator",
            ToolKind::StudyCalc => "scientific-calc",
            ToolKind::ExamTracker => "exam-countdown",
            ToolKind::TimetableMaker => "timetable-gen",
            ToolKind::UnitConverter => "unit-converter",
            ToolKind::BmiCalculator => "bmi-calculator",
            ToolKind::JsonFormatter => "json-formatter",
            ToolKind::LoremIpsum => "lorem-ipsum",
        }
    }

    /// Resolve a tool id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<ToolKind> {
        super::TOOLS
            .iter()
            .map(|t| t.kind)
            .find(|kind| kind.id() == id)
    }
}

/// Static metadata describing a tool for listing and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Symbolic icon name (Material Symbols).
    pub icon: &'static str,
    pub category: Category,
    pub is_hot: bool,
    #[serde(skip)]
    pub kind: ToolKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Category Parsing Tests
    // =========================================================================

    #[test]
    fn test_parse_exact_labels() {
        for category in Category::all() {
            assert_eq!(category.label().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_parse_is_lenient_about_case_and_separators() {
        assert_eq!("student kit".parse(), Ok(Category::StudentKit));
        assert_eq!("Student-Kit".parse(), Ok(Category::StudentKit));
        assert_eq!("IMAGE_TOOLS".parse(), Ok(Category::ImageTools));
        assert_eq!("pdftools".parse(), Ok(Category::PdfTools));
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "Cooking".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("Cooking".to_string()));
        assert_eq!(err.to_string(), "Unknown category: Cooking");
    }

    #[test]
    fn test_category_bar_starts_with_all() {
        assert_eq!(CATEGORIES[0], Category::All);
        assert!(!CATEGORIES.contains(&Category::PdfTools));
    }

    // =========================================================================
    // ToolKind Tests
    // =========================================================================

    #[test]
    fn test_from_id_round_trips_every_catalog_entry() {
        for tool in super::super::TOOLS {
            assert_eq!(ToolKind::from_id(tool.id), Some(tool.kind));
            assert_eq!(tool.kind.id(), tool.id);
        }
    }

    #[test]
    fn test_from_id_unknown() {
        assert_eq!(ToolKind::from_id("teleporter"), None);
        assert_eq!(ToolKind::from_id(""), None);
    }
}
