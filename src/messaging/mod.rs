//! Messaging for the terminal front end.
//!
//! - [`Message`]: UI-agnostic output produced by the shell, widgets and chat
//! - [`TerminalRenderer`]: renders messages with colours and highlighting
//! - [`Spinner`]: busy indicator for slow widget work and assistant requests

mod renderer;
mod spinner;
mod types;

pub use renderer::{RenderStyle, TerminalRenderer};
pub use spinner::Spinner;
pub use types::*;
