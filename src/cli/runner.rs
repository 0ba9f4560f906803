//! CLI runner for interactive, listing and single-prompt modes.

use std::io::IsTerminal;

use crate::cli::repl::Repl;
use crate::config::Settings;
use crate::messaging::TerminalRenderer;
use crate::registry::{hot_tools, Category};
use crate::shell::{ShellAction, ShellState};

/// Where the interactive session starts.
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub tool: Option<String>,
}

/// Ask the assistant one question, print the transcript, and exit.
pub async fn run_single_prompt(settings: &Settings, prompt: &str) -> anyhow::Result<()> {
    let mut repl = Repl::new(settings);
    repl.ask(prompt).await;
    TerminalRenderer::new(settings.dark_mode).render_all(&repl.assistant().transcript())?;
    Ok(())
}

/// Print the tool grid for the given filter and exit.
///
/// Output is one `id<TAB>name` line per tool when stdout is not a terminal.
pub fn list_tools(settings: &Settings, category: Option<Category>, search: Option<&str>) -> anyhow::Result<()> {
    let mut state = ShellState::new(settings.dark_mode);
    if let Some(category) = category {
        state = state.apply(&ShellAction::SetCategory(category));
    }
    if let Some(search) = search {
        state = state.apply(&ShellAction::SetQuery(search.to_string()));
    }

    let grid = state.grid();
    if std::io::stdout().is_terminal() {
        TerminalRenderer::new(settings.dark_mode).render(&grid)?;
    } else {
        let listing = grid.plain();
        if !listing.is_empty() {
            println!("{}", listing);
        }
    }
    Ok(())
}

/// Run in interactive mode.
pub async fn run_interactive(settings: &Settings, options: StartOptions) -> anyhow::Result<()> {
    let mut repl = Repl::new(settings)
        .interactive()
        .with_filter(options.category, options.search.as_deref());

    if let Some(tool) = &options.tool {
        repl = repl.with_tool(tool)?;
    }

    // Print welcome banner
    print_banner();

    // Run the REPL
    repl.run().await?;

    Ok(())
}

/// Print the welcome banner.
fn print_banner() {
    println!();
    println!("  \x1b[1;34m╔╦╗╔═╗╔═╗╦  \x1b[1;36m╔╗╔╔═╗╔═╗╔╦╗\x1b[0m");
    println!("  \x1b[1;34m ║ ║ ║║ ║║  \x1b[1;36m║║║║╣ ╚═╗ ║ \x1b[0m");
    println!(
        "  \x1b[1;34m ╩ ╚═╝╚═╝╩═╝\x1b[1;36m╝╚╝╚═╝╚═╝ ╩ \x1b[0m  \x1b[2mv{}\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  \x1b[2m🧰 Everyday utilities for students and makers\x1b[0m");
    println!("  \x1b[2m🔥 {}\x1b[0m", popular_line());
    println!("  \x1b[2mType to search, a card number to open it, or \x1b[0m\x1b[1;36m/help\x1b[0m\x1b[2m for commands\x1b[0m");
    println!();
}

/// Hot tools as `Popular: name (id), ...`.
fn popular_line() -> String {
    let tools: Vec<String> = hot_tools()
        .map(|t| format!("{} ({})", t.name, t.id))
        .collect();
    format!("Popular: {}", tools.join(", "))
}
