//! Placeholder text.

use async_trait::async_trait;

use super::input::{parse_or, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const LOREM_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.";

pub const MAX_PARAGRAPHS: usize = 20;
pub const DEFAULT_PARAGRAPHS: usize = 3;

/// `count` copies of [`LOREM_TEXT`] separated by blank lines, count clamped to 1..=20.
pub fn generate(count: usize) -> String {
    vec![LOREM_TEXT; count.clamp(1, MAX_PARAGRAPHS)].join("\n\n")
}

const USAGE: &[(&str, &str)] = &[
    ("<n>", "Generate n paragraphs (1-20)"),
    ("generate [n]", "Same as above; defaults to the last count"),
    ("show", "Show the last output"),
];

pub struct LoremWidget {
    paragraphs: usize,
    output: String,
}

impl LoremWidget {
    pub fn new() -> Self {
        Self {
            paragraphs: DEFAULT_PARAGRAPHS,
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    fn run(&mut self, count: &str) {
        let requested = if count.is_empty() {
            self.paragraphs
        } else {
            parse_or(count, 1)
        };
        self.paragraphs = requested.clamp(1, MAX_PARAGRAPHS);
        self.output = generate(self.paragraphs);
    }
}

impl Default for LoremWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for LoremWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::LoremIpsum
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        if self.output.is_empty() {
            Message::panel(
                "Lorem Ipsum",
                [format!("Paragraphs: {} (type 'generate')", self.paragraphs)],
            )
        } else {
            Message::panel(
                format!("Lorem Ipsum ({} paragraphs)", self.paragraphs),
                self.output.split('\n').map(str::to_string),
            )
        }
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "generate" | "gen" => self.run(arg),
            "show" | "" => {}
            n if n.starts_with(|c: char| c.is_ascii_digit() || c == '-') => self.run(n),
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}
