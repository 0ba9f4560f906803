//! Message types rendered by the terminal front end.
//!
//! Widgets, the chat assistant and the shell all report through [`Message`];
//! nothing in the core writes to the terminal directly.

/// Message levels for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

/// A one-line text message.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// A titled block of lines, used for widget state.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelMessage {
    pub title: String,
    pub lines: Vec<String>,
}

/// Source text to be syntax highlighted.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeMessage {
    pub lang: String,
    pub code: String,
}

/// One card in the tool grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CardMessage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_hot: bool,
}

/// The tool grid with the filter that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMessage {
    pub category: String,
    pub query: String,
    pub cards: Vec<CardMessage>,
}

/// Who wrote a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSpeaker {
    User,
    Assistant,
}

/// One line of the study assistant transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLineMessage {
    pub speaker: ChatSpeaker,
    pub text: String,
}

/// Any renderable message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(TextMessage),
    Panel(PanelMessage),
    Code(CodeMessage),
    /// Hex colours drawn as swatches.
    Swatches(Vec<String>),
    Grid(GridMessage),
    Chat(ChatLineMessage),
    Divider,
    Clear,
}

impl Message {
    /// Create an info message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Info, text)
    }

    /// Create a success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Success, text)
    }

    /// Create a warning message.
    pub fn warning(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Warning, text)
    }

    /// Create an error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Error, text)
    }

    /// Create a debug message.
    pub fn debug(text: impl Into<String>) -> Self {
        Self::text(MessageLevel::Debug, text)
    }

    fn text(level: MessageLevel, text: impl Into<String>) -> Self {
        Self::Text(TextMessage {
            level,
            text: text.into(),
        })
    }

    /// Create a panel from a title and lines.
    pub fn panel<I, S>(title: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Panel(PanelMessage {
            title: title.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        })
    }

    /// Create a code message.
    pub fn code(lang: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Code(CodeMessage {
            lang: lang.into(),
            code: code.into(),
        })
    }

    /// Create a chat line.
    pub fn chat(speaker: ChatSpeaker, text: impl Into<String>) -> Self {
        Self::Chat(ChatLineMessage {
            speaker,
            text: text.into(),
        })
    }

    /// Plain text of a message, without styling. Used for non-interactive
    /// output and in tests.
    pub fn plain(&self) -> String {
        match self {
            Message::Text(t) => t.text.clone(),
            Message::Panel(p) => {
                let mut out = p.title.clone();
                for line in &p.lines {
                    out.push('\n');
                    out.push_str(line);
                }
                out
            }
            Message::Code(c) => c.code.clone(),
            Message::Swatches(colors) => colors.join(" "),
            Message::Grid(g) => g
                .cards
                .iter()
                .map(|c| format!("{}\t{}", c.id, c.name))
                .collect::<Vec<_>>()
                .join("\n"),
            Message::Chat(c) => c.text.clone(),
            Message::Divider | Message::Clear => String::new(),
        }
    }
}
