//! Reedline completion with Tab-triggered menu.
//!
//! Type "/" then Tab to see commands. `/open` completes tool ids and
//! `/category` completes category labels.

use std::borrow::Cow;

use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, Emacs, Highlighter, KeyCode, KeyModifiers, MenuBuilder, Prompt,
    PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, ReedlineEvent,
    ReedlineMenu, Span, StyledText, Suggestion,
};

use crate::registry::{Category, CATEGORIES, TOOLS};
use crate::shell::{ShellState, View};

/// All slash commands with descriptions
pub const COMMANDS: &[(&str, &str)] = &[
    ("/back", "Return to the tool grid"),
    ("/category", "Filter the grid by category"),
    ("/chat", "Toggle the study assistant, or send it a message"),
    ("/clear", "Clear screen"),
    ("/exit", "Exit"),
    ("/help", "Show help"),
    ("/home", "Reset filters and return to the grid"),
    ("/login", "Log in"),
    ("/open", "Open a tool"),
    ("/quit", "Exit"),
    ("/search", "Search tools by name or description"),
    ("/signup", "Create an account"),
    ("/theme", "Toggle dark mode"),
    ("/tools", "Show the tool grid"),
];

/// Completer for ToolNest commands
#[derive(Clone)]
pub struct ToolCompleter {
    pub tool_ids: Vec<String>,
    pub categories: Vec<String>,
}

impl ToolCompleter {
    pub fn new() -> Self {
        Self {
            tool_ids: TOOLS.iter().map(|t| t.id.to_string()).collect(),
            categories: CATEGORIES.iter().map(|c| c.label().to_string()).collect(),
        }
    }

    fn complete_argument(values: &[String], input: &str, pos: usize) -> Vec<Suggestion> {
        let start = input.find(' ').map(|i| i + 1).unwrap_or(pos);
        let prefix = input[start..].to_lowercase();
        values
            .iter()
            .filter(|v| prefix.is_empty() || v.to_lowercase().starts_with(&prefix))
            .take(12)
            .map(|v| Suggestion {
                value: v.clone(),
                description: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: false,
                style: None,
            })
            .collect()
    }
}

impl Default for ToolCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ToolCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if pos > line.len() {
            return Vec::new();
        }

        let input = &line[..pos];

        if input.is_empty() || !input.starts_with('/') {
            return Vec::new();
        }

        // Command completion (no space yet)
        if !input.contains(' ') {
            let prefix = input.to_lowercase();
            return COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(&prefix))
                .take(10)
                .map(|(cmd, desc)| Suggestion {
                    value: cmd.to_string(),
                    description: Some(desc.to_string()),
                    extra: None,
                    span: Span::new(0, pos),
                    append_whitespace: true,
                    style: None,
                })
                .collect();
        }

        if input.starts_with("/open ") {
            return Self::complete_argument(&self.tool_ids, input, pos);
        }

        if input.starts_with("/category ") {
            return Self::complete_argument(&self.categories, input, pos);
        }

        Vec::new()
    }
}

/// Prompt showing where the user is: grid filter, open tool or chat.
pub struct ToolPrompt {
    pub location: String,
    pub detail: String,
}

impl ToolPrompt {
    pub fn for_state(state: &ShellState) -> Self {
        if state.chat_open {
            return Self {
                location: "assistant".to_string(),
                detail: "/chat to close".to_string(),
            };
        }
        match state.view {
            View::Grid => {
                let mut detail = state.category.label().to_string();
                if !state.query.is_empty() {
                    detail.push_str(&format!(" · \"{}\"", state.query));
                }
                Self {
                    location: "toolnest".to_string(),
                    detail,
                }
            }
            View::Tool(kind) => Self {
                location: kind.id().to_string(),
                detail: "/back".to_string(),
            },
        }
    }
}

impl Prompt for ToolPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!(
            "\x1b[1;36m{}\x1b[0m \x1b[2m[{}]\x1b[0m",
            self.location, self.detail
        ))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed(" › ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(&self, hs: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match hs.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}search: {}) ", prefix, hs.term))
    }
}

#[derive(Clone)]
pub struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.starts_with('/') {
            let cmd_end = line.find(' ').unwrap_or(line.len());
            let cmd = &line[..cmd_end];
            let is_valid = COMMANDS.iter().any(|(c, _)| *c == cmd);

            if is_valid {
                styled.push((Style::new().fg(Color::Cyan).bold(), cmd.to_string()));
            } else {
                styled.push((Style::new().fg(Color::Yellow), cmd.to_string()));
            }

            if cmd_end < line.len() {
                styled.push((Style::default(), line[cmd_end..].to_string()));
            }
        } else {
            styled.push((Style::default(), line.to_string()));
        }

        styled
    }
}

pub fn create_reedline(completer: ToolCompleter) -> Reedline {
    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name("completion_menu")
            .with_columns(1)
            .with_column_padding(2)
            .with_text_style(Style::new().fg(Color::Default))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan))
            .with_description_text_style(Style::new().fg(Color::DarkGray)),
    );

    let mut keybindings = reedline::default_emacs_keybindings();

    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );

    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::MenuPrevious,
    );

    Reedline::create()
        .with_completer(Box::new(completer))
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_quick_completions(true)
        .with_partial_completions(true)
        .with_highlighter(Box::new(CommandHighlighter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)))
}

/// Category labels accepted by `/category`, for error hints.
pub fn category_hint() -> String {
    Category::all()
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}
