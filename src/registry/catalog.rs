//! The static tool catalog.

use super::descriptor::{Category, ToolDescriptor, ToolKind};

/// Every tool the shell can launch, in display order.
pub static TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: "qr-generator",
        name: "QR Code Pro",
        description: "Generate custom QR codes with color control. Download as PNG instantly.",
        icon: "qr_code_2",
        category: Category::Converters,
        is_hot: true,
        kind: ToolKind::QrGenerator,
    },
    ToolDescriptor {
        id: "image-compressor",
        name: "Image Compressor",
        description: "Reduce image file size by up to 90% without losing visible quality.",
        icon: "compress",
        category: Category::ImageTools,
        is_hot: true,
        kind: ToolKind::ImageCompressor,
    },
    ToolDescriptor {
        id: "password-checker",
        name: "Password Suite",
        description: "Check password strength and generate unhackable keys locally.",
        icon: "enhanced_encryption",
        category: Category::Security,
        is_hot: false,
        kind: ToolKind::PasswordSuite,
    },
    ToolDescriptor {
        id: "word-counter",
        name: "Word Analyst",
        description: "Advanced word count, reading time, and readability scoring.",
        icon: "reorder",
        category: Category::TextTools,
        is_hot: false,
        kind: ToolKind::WordAnalyst,
    },
    ToolDescriptor {
        id: "invoice-generator",
        name: "Invoice Maker",
        description: "Create professional PDF-ready invoices for your clients in seconds.",
        icon: "receipt_long",
        category: Category::DevTools,
        is_hot: false,
        kind: ToolKind::InvoiceMaker,
    },
    ToolDescriptor {
        id: "color-palette",
        name: "Palette Extractor",
        description: "Upload an image to extract its dominant color palette instantly.",
        icon: "palette",
        category: Category::ImageTools,
        is_hot: false,
        kind: ToolKind::PaletteExtractor,
    },
    // Student Kit
    ToolDescriptor {
        id: "pdf-merger",
        name: "Merge PDF",
        description: "Combine multiple PDF documents into one single file instantly.",
        icon: "merge_type",
        category: Category::StudentKit,
        is_hot: true,
        kind: ToolKind::PdfMerger,
    },
    ToolDescriptor {
        id: "images-to-pdf",
        name: "Images to PDF",
        description: "Convert your JPG/PNG photos into a professional PDF document.",
        icon: "picture_as_pdf",
        category: Category::StudentKit,
        is_hot: false,
        kind: ToolKind::ImagesToPdf,
    },
    ToolDescriptor {
        id: "zip-creator",
        name: "ZIP Creator",
        description: "Package multiple assignment files into a clean ZIP archive for submission.",
        icon: "folder_zip",
        category: Category::StudentKit,
        is_hot: false,
        kind: ToolKind::ZipCreator,
    },
    ToolDescriptor {
        id: "scientific-calc",
        name: "Study Calc",
        description: "A scientific calculator for complex math and engineering problems.",
        icon: "calculate",
        category: Category::StudentKit,
        is_hot: false,
        kind: ToolKind::StudyCalc,
    },
    ToolDescriptor {
        id: "exam-countdown",
        name: "Exam Tracker",
        description: "Count down to your upcoming exams and submission deadlines.",
        icon: "alarm",
        category: Category::StudentKit,
        is_hot: false,
        kind: ToolKind::ExamTracker,
    },
    ToolDescriptor {
        id: "timetable-gen",
        name: "Timetable Maker",
        description: "Create a visually pleasing class schedule and export as image.",
        icon: "calendar_month",
        category: Category::StudentKit,
        is_hot: false,
        kind: ToolKind::TimetableMaker,
    },
    // Utilities
    ToolDescriptor {
        id: "unit-converter",
        name: "Unit Converter",
        description: "Convert length, weight and temperature between common units.",
        icon: "straighten",
        category: Category::Converters,
        is_hot: false,
        kind: ToolKind::UnitConverter,
    },
    ToolDescriptor {
        id: "bmi-calculator",
        name: "BMI & Calories",
        description: "Work out your body mass index, BMR and daily calorie needs.",
        icon: "monitor_weight",
        category: Category::Converters,
        is_hot: false,
        kind: ToolKind::BmiCalculator,
    },
    ToolDescriptor {
        id: "json-formatter",
        name: "JSON Formatter",
        description: "Prettify or minify JSON and spot syntax errors instantly.",
        icon: "data_object",
        category: Category::DevTools,
        is_hot: false,
        kind: ToolKind::JsonFormatter,
    },
    ToolDescriptor {
        id: "lorem-ipsum",
        name: "Lorem Ipsum",
        description: "Generate placeholder paragraphs for drafts and mockups.",
        icon: "notes",
        category: Category::TextTools,
        is_hot: false,
        kind: ToolKind::LoremIpsum,
    },
];

/// Look up a descriptor by id.
pub fn find_tool(id: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|t| t.id == id)
}

/// Descriptor for a tool kind.
pub fn descriptor(kind: ToolKind) -> &'static ToolDescriptor {
    // Every ToolKind variant has exactly one catalog entry (checked in tests).
    TOOLS
        .iter()
        .find(|t| t.kind == kind)
        .unwrap_or(&TOOLS[0])
}

/// Tools flagged as popular.
pub fn hot_tools() -> impl Iterator<Item = &'static ToolDescriptor> {
    TOOLS.iter().filter(|t| t.is_hot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = TOOLS.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), TOOLS.len());
    }

    #[test]
    fn test_kinds_are_unique() {
        let kinds: HashSet<_> = TOOLS.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.len(), TOOLS.len());
    }

    #[test]
    fn test_no_tool_is_in_wildcard_category() {
        assert!(TOOLS.iter().all(|t| t.category != Category::All));
    }

    #[test]
    fn test_find_tool() {
        let tool = find_tool("pdf-merger").unwrap();
        assert_eq!(tool.name, "Merge PDF");
        assert_eq!(tool.kind, ToolKind::PdfMerger);
        assert!(find_tool("nope").is_none());
    }

    #[test]
    fn test_descriptor_matches_kind() {
        for tool in TOOLS {
            assert_eq!(descriptor(tool.kind).id, tool.id);
        }
    }

    #[test]
    fn test_hot_tools() {
        let hot: Vec<_> = hot_tools().map(|t| t.id).collect();
        assert_eq!(hot, vec!["qr-generator", "image-compressor", "pdf-merger"]);
    }
}
