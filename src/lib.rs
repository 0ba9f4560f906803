//! ToolNest Library
//!
//! This crate provides the core functionality for the ToolNest CLI.
//!
//! ## Main Components
//!
//! - [`registry`] - The static tool catalog and grid filtering
//! - [`shell`] - Shell state, routing and the account dialog
//! - [`widgets`] - The tool sessions (converters, generators, PDF/ZIP packaging)
//! - [`chat`] - Study assistant backed by a generative text service
//! - [`config`] - Settings file and environment overrides
//! - [`messaging`] - Terminal rendering
//! - [`cli`] - Command-line interface (REPL, commands, runner)
//!
//! ## Quick Start
//!
//! ```ignore
//! use toolnest::{ShellAction, ShellState};
//!
//! let state = ShellState::default()
//!     .apply(&ShellAction::SetQuery("pdf".to_string()))
//!     .apply(&ShellAction::OpenTool("pdf-merger".to_string()));
//! assert!(state.active_tool().is_some());
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod messaging;
pub mod registry;
pub mod shell;
pub mod widgets;

// Re-export commonly used types
pub use chat::{ChatAssistant, ChatError, GeminiClient, TextGenerator};
pub use config::Settings;
pub use messaging::{Message, TerminalRenderer};
pub use registry::{filter_tools, Category, ToolDescriptor, ToolKind, TOOLS};
pub use shell::{Router, ShellAction, ShellState, View};
pub use widgets::{mount, Widget, WidgetContext, WidgetError};
