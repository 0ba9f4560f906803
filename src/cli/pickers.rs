//! Interactive pickers using dialoguer.
//!
//! Fuzzy tool and category selection, the slash command menu, and the
//! log-in / sign-up form.

use dialoguer::{theme::ColorfulTheme, FuzzySelect, Input, Password};

use super::completion::COMMANDS;
use crate::registry::{Category, ToolDescriptor, CATEGORIES};
use crate::shell::{AuthMode, Credentials};

/// Show a fuzzy tool picker over `tools`, returns the selected tool id.
pub fn pick_tool(tools: &[&ToolDescriptor]) -> Option<&'static str> {
    if tools.is_empty() {
        return None;
    }

    let display: Vec<String> = tools
        .iter()
        .map(|t| {
            let hot = if t.is_hot { " 🔥" } else { "" };
            format!("{:<22} {}{}", t.name, t.category.label(), hot)
        })
        .collect();

    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Open tool (type to filter)")
        .items(&display)
        .default(0)
        .max_length(10)
        .interact_opt();

    match selection {
        Ok(Some(idx)) => tools.get(idx).map(|t| t.id),
        _ => None,
    }
}

/// Show a category picker with the current category preselected.
pub fn pick_category(current: Category) -> Option<Category> {
    let display: Vec<&str> = CATEGORIES.iter().map(|c| c.label()).collect();
    let default = CATEGORIES.iter().position(|c| *c == current).unwrap_or(0);

    match FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Category")
        .items(&display)
        .default(default)
        .interact_opt()
    {
        Ok(Some(idx)) => CATEGORIES.get(idx).copied(),
        _ => None,
    }
}

/// Pick a slash command from the full list (bare "/").
pub fn pick_command() -> Option<&'static str> {
    let display: Vec<String> = COMMANDS
        .iter()
        .map(|(cmd, desc)| format!("{:<12} {}", cmd, desc))
        .collect();

    FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Command")
        .items(&display)
        .default(0)
        .max_length(8)
        .interact_opt()
        .ok()
        .flatten()
        .map(|idx| COMMANDS[idx].0)
}

/// Prompt for the fields of the auth form. `None` when the user cancels.
///
/// Sign-up additionally asks for a name.
pub fn collect_credentials(mode: AuthMode) -> Option<Credentials> {
    let theme = ColorfulTheme::default();
    println!("\n\x1b[1m{}\x1b[0m\n", mode.title());

    let name = match mode {
        AuthMode::Signup => Some(
            Input::<String>::with_theme(&theme)
                .with_prompt("Full name")
                .interact_text()
                .ok()?,
        ),
        AuthMode::Login => None,
    };

    let email: String = Input::with_theme(&theme)
        .with_prompt("Email address")
        .validate_with(|value: &String| {
            if value.contains('@') {
                Ok(())
            } else {
                Err("Enter a valid email address")
            }
        })
        .interact_text()
        .ok()?;

    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()
        .ok()?;

    Some(Credentials {
        name,
        email,
        password,
    })
}
