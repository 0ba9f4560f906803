//! Shell state and its transitions.
//!
//! [`ShellState::apply`] is the only way the shell changes: it takes the
//! current state and an action and returns the next state.

use super::auth::{AuthDialog, AuthMode};
use crate::messaging::{CardMessage, GridMessage, Message};
use crate::registry::{filter_tools, Category, ToolDescriptor, ToolKind, TOOLS};

/// What the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Grid,
    Tool(ToolKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    SetCategory(Category),
    SetQuery(String),
    /// Open a tool by id. Unknown ids are ignored.
    OpenTool(String),
    Back,
    /// Brand/logo click; same destination as `Back`.
    Home,
    ToggleTheme,
    OpenAuth(AuthMode),
    SwitchAuthMode(AuthMode),
    ToggleAuthMode,
    SubmitAuth,
    CloseAuth,
    ToggleChat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellState {
    pub category: Category,
    pub query: String,
    pub view: View,
    pub dark_mode: bool,
    pub auth: AuthDialog,
    pub chat_open: bool,
}

impl ShellState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            dark_mode,
            ..Self::default()
        }
    }

    pub fn apply(self, action: &ShellAction) -> ShellState {
        match action {
            ShellAction::SetCategory(category) => Self {
                category: *category,
                ..self
            },
            ShellAction::SetQuery(query) => Self {
                query: query.clone(),
                ..self
            },
            ShellAction::OpenTool(id) => match ToolKind::from_id(id) {
                Some(kind) => Self {
                    view: View::Tool(kind),
                    ..self
                },
                None => self,
            },
            ShellAction::Back | ShellAction::Home => Self {
                view: View::Grid,
                ..self
            },
            ShellAction::ToggleTheme => Self {
                dark_mode: !self.dark_mode,
                ..self
            },
            ShellAction::OpenAuth(mode) => Self {
                auth: AuthDialog::opened(*mode),
                ..self
            },
            ShellAction::SwitchAuthMode(mode) => Self {
                auth: AuthDialog {
                    mode: *mode,
                    ..self.auth
                },
                ..self
            },
            ShellAction::ToggleAuthMode => Self {
                auth: AuthDialog {
                    mode: self.auth.mode.toggled(),
                    ..self.auth
                },
                ..self
            },
            ShellAction::SubmitAuth | ShellAction::CloseAuth => Self {
                auth: AuthDialog {
                    open: false,
                    ..self.auth
                },
                ..self
            },
            ShellAction::ToggleChat => Self {
                chat_open: !self.chat_open,
                ..self
            },
        }
    }

    /// Tools listed in the grid for the current category and query.
    pub fn visible_tools(&self) -> Vec<&'static ToolDescriptor> {
        filter_tools(TOOLS, self.category, &self.query)
    }

    /// The grid view as a renderable message.
    pub fn grid(&self) -> Message {
        let cards = self
            .visible_tools()
            .into_iter()
            .map(|tool| CardMessage {
                id: tool.id.to_string(),
                name: tool.name.to_string(),
                description: tool.description.to_string(),
                category: tool.category.label().to_string(),
                is_hot: tool.is_hot,
            })
            .collect();
        Message::Grid(GridMessage {
            category: self.category.label().to_string(),
            query: self.query.clone(),
            cards,
        })
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        match self.view {
            View::Grid => None,
            View::Tool(kind) => Some(kind),
        }
    }
}
