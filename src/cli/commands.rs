//! Slash command parsing and help text.
//!
//! Parsing is separate from execution so the REPL can be driven by tests
//! without a terminal.

use crate::registry::{Category, ParseCategoryError};

/// Result of handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue the REPL loop
    Continue,
    /// Exit the REPL
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bare "/": show the command picker.
    Pick,
    Help,
    Tools,
    /// `None` opens the category picker.
    Category(Option<Category>),
    Search(String),
    /// `None` opens the tool picker.
    Open(Option<String>),
    Back,
    Home,
    Theme,
    /// `None` toggles the assistant panel.
    Chat(Option<String>),
    Login,
    Signup,
    Clear,
    Exit,
    Unknown(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Category(#[from] ParseCategoryError),
}

/// Parse a line starting with "/".
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let body = input.strip_prefix('/').unwrap_or(input);
    let parts: Vec<&str> = body.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    let command = match cmd.as_str() {
        "" => Command::Pick,
        "help" | "h" | "?" => Command::Help,
        "tools" | "grid" | "ls" => Command::Tools,
        "category" | "cat" => {
            if args.is_empty() {
                Command::Category(None)
            } else {
                Command::Category(Some(args.parse()?))
            }
        }
        "search" | "find" => Command::Search(args.to_string()),
        "open" | "o" => Command::Open((!args.is_empty()).then(|| args.to_lowercase())),
        "back" | "b" => Command::Back,
        "home" => Command::Home,
        "theme" | "dark" => Command::Theme,
        "chat" | "ask" => Command::Chat((!args.is_empty()).then(|| args.to_string())),
        "login" => Command::Login,
        "signup" | "register" => Command::Signup,
        "clear" | "cls" => Command::Clear,
        "exit" | "quit" | "q" => Command::Exit,
        other => Command::Unknown(other.to_string()),
    };
    Ok(command)
}

pub fn show_help() {
    println!(
        "
\x1b[1m🧰 ToolNest Commands\x1b[0m

  \x1b[1;36m/help, /h, /?\x1b[0m          Show this help message
  \x1b[1;36m/exit, /quit, /q\x1b[0m       Exit ToolNest
  \x1b[1;36m/clear, /cls\x1b[0m           Clear the screen
  \x1b[1;36m/theme\x1b[0m                 Toggle dark mode

\x1b[1mFinding tools:\x1b[0m
  \x1b[1;33m/tools\x1b[0m                 Show the tool grid
  \x1b[1;33m/category [name]\x1b[0m       Filter by category (picker if no name)
  \x1b[1;33m/search [text]\x1b[0m         Filter by name or description (empty clears)
  \x1b[1;33m/open [id]\x1b[0m             Open a tool (picker if no id)
  \x1b[1;33m/back\x1b[0m                  Close the tool and return to the grid
  \x1b[1;33m/home\x1b[0m                  Same as /back

\x1b[1mAssistant & Account:\x1b[0m
  \x1b[1;35m/chat\x1b[0m                  Open or close the study assistant
  \x1b[1;35m/chat <message>\x1b[0m        Ask the assistant directly
  \x1b[1;35m/login, /signup\x1b[0m        Open the account dialog

\x1b[2mIn the grid, typing text searches; a number opens that card.
Inside a tool, type \x1b[0m\x1b[1;36mhelp\x1b[0m\x1b[2m for its commands.\x1b[0m
"
    );
}
