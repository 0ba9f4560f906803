//! CLI components.

pub mod commands;
pub mod completion;
pub mod pickers;
pub mod repl;
pub mod runner;

pub use commands::{parse_command, Command, CommandResult};
pub use completion::{create_reedline, ToolCompleter, ToolPrompt, COMMANDS};
pub use repl::Repl;
pub use runner::{list_tools, run_interactive, run_single_prompt, StartOptions};
