//! Word, sentence and keyword statistics.

use async_trait::async_trait;

use super::input::split_command;
use super::{rank_by_frequency, Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const WORDS_PER_MINUTE: usize = 200;
pub const KEYWORD_LIMIT: usize = 5;

pub const STOP_WORDS: &[&str] = &[
    "the", "and", "a", "to", "of", "in", "is", "it", "that", "with", "as", "for", "was", "on",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextStats {
    pub words: usize,
    pub characters: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
    pub keywords: Vec<(String, usize)>,
}

pub fn analyze(text: &str) -> TextStats {
    let words: Vec<&str> = text.split_whitespace().collect();
    let trimmed = text.trim();

    let sentences = if trimmed.is_empty() {
        0
    } else {
        trimmed
            .split(['.', '!', '?'])
            .filter(|s| !s.is_empty())
            .count()
    };

    let paragraphs = if trimmed.is_empty() {
        0
    } else {
        trimmed.split('\n').filter(|p| !p.is_empty()).count()
    };

    TextStats {
        words: words.len(),
        characters: text.chars().count(),
        sentences,
        paragraphs,
        reading_minutes: words.len().div_ceil(WORDS_PER_MINUTE),
        keywords: keywords(&words),
    }
}

/// Most frequent words longer than three letters, skipping stop words.
fn keywords(words: &[&str]) -> Vec<(String, usize)> {
    let cleaned = words.iter().filter_map(|word| {
        let clean: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        (clean.len() > 3 && !STOP_WORDS.contains(&clean.as_str())).then_some(clean)
    });
    rank_by_frequency(cleaned, KEYWORD_LIMIT)
}

const USAGE: &[(&str, &str)] = &[
    ("set <text>", "Replace the text"),
    ("add <text>", "Append a line"),
    ("load <file>", "Analyze a text file"),
    ("clear", "Clear the text"),
    ("stats", "Show the statistics"),
];

pub struct WordAnalystWidget {
    text: String,
}

impl WordAnalystWidget {
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for WordAnalystWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for WordAnalystWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::WordAnalyst
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let stats = analyze(&self.text);
        let mut lines = vec![
            format!("Words: {}", stats.words),
            format!("Characters: {}", stats.characters),
            format!("Sentences: {}", stats.sentences),
            format!("Paragraphs: {}", stats.paragraphs),
            format!("Reading time: {} min", stats.reading_minutes),
        ];
        if stats.keywords.is_empty() {
            lines.push("Keywords: (type more to see keywords)".to_string());
        } else {
            let keywords: Vec<String> = stats
                .keywords
                .iter()
                .map(|(word, count)| format!("{} ({})", word, count))
                .collect();
            lines.push(format!("Keywords: {}", keywords.join(", ")));
        }
        Message::panel("Word Analyst", lines)
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "set" => self.text = arg.to_string(),
            "add" => {
                if !self.text.is_empty() {
                    self.text.push('\n');
                }
                self.text.push_str(arg);
            }
            "load" => {
                let path = std::path::PathBuf::from(shellexpand::tilde(arg).as_ref());
                self.text = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|source| WidgetError::Read { path, source })?;
            }
            "clear" => self.text.clear(),
            "stats" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Counting
    // =========================================================================

    #[test]
    fn test_empty_text() {
        let stats = analyze("");
        assert_eq!(stats, TextStats::default());
        assert_eq!(analyze("   \n\n  ").words, 0);
        assert_eq!(analyze("   \n\n  ").sentences, 0);
    }

    #[test]
    fn test_simple_words() {
        let stats = analyze("a b c");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.characters, 5);
        assert_eq!(stats.sentences, 1);
        assert_eq!(stats.paragraphs, 1);
        assert_eq!(stats.reading_minutes, 1);
    }

    #[test]
    fn test_sentences_and_paragraphs() {
        let text = "First one. Second one!! Third?\n\n\nNew paragraph here.";
        let stats = analyze(text);
        assert_eq!(stats.sentences, 4);
        assert_eq!(stats.paragraphs, 2);
    }

    #[test]
    fn test_characters_count_scalars() {
        assert_eq!(analyze("héllo wörld").characters, 11);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let text = "word ".repeat(201);
        assert_eq!(analyze(&text).reading_minutes, 2);
        let text = "word ".repeat(200);
        assert_eq!(analyze(&text).reading_minutes, 1);
    }

    // =========================================================================
    // Keywords
    // =========================================================================

    #[test]
    fn test_keywords_skip_short_and_stop_words() {
        let stats = analyze("The cat and the dog with that rust rust Rust!");
        assert_eq!(stats.keywords, vec![("rust".to_string(), 3)]);
    }

    #[test]
    fn test_keywords_tie_break_first_seen() {
        let stats = analyze("zeta alpha beta alpha zeta gamma delta omega kappa");
        let words: Vec<&str> = stats.keywords.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["zeta", "alpha", "beta", "gamma", "delta"]);
    }

    // =========================================================================
    // Widget
    // =========================================================================

    #[tokio::test]
    async fn test_widget_add_and_clear() {
        let ctx = WidgetContext::new(".");
        let mut widget = WordAnalystWidget::new();
        widget.handle("add Hello world.", &ctx).await.unwrap();
        widget.handle("add Second line.", &ctx).await.unwrap();
        assert_eq!(widget.text(), "Hello world.\nSecond line.");

        let out = widget.handle("stats", &ctx).await.unwrap();
        assert!(out[0].plain().contains("Paragraphs: 2"));

        widget.handle("clear", &ctx).await.unwrap();
        assert!(widget.text().is_empty());
    }

    #[tokio::test]
    async fn test_widget_load_missing_file() {
        let ctx = WidgetContext::new(".");
        let mut widget = WordAnalystWidget::new();
        let err = widget.handle("load /nonexistent/file.txt", &ctx).await.unwrap_err();
        assert!(matches!(err, WidgetError::Read { .. }));
    }
}
