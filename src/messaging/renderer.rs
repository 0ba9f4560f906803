//! Terminal renderer for messages.

use super::{
    CardMessage, ChatLineMessage, ChatSpeaker, GridMessage, Message, MessageLevel, PanelMessage,
};
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    ExecutableCommand,
};
use std::io::{stdout, Write};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const DARK_CODE_THEME: &str = "base16-ocean.dark";
const LIGHT_CODE_THEME: &str = "InspiredGitHub";

/// Brand blue used for headings and the QR default.
const PRIMARY: Color = Color::Rgb { r: 0x13, g: 0x7f, b: 0xec };

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub info_color: Color,
    pub success_color: Color,
    pub warning_color: Color,
    pub error_color: Color,
    pub accent_color: Color,
    pub muted_color: Color,
    pub code_theme: &'static str,
}

impl RenderStyle {
    pub fn dark() -> Self {
        Self {
            info_color: Color::White,
            success_color: Color::Green,
            warning_color: Color::Yellow,
            error_color: Color::Red,
            accent_color: PRIMARY,
            muted_color: Color::DarkGrey,
            code_theme: DARK_CODE_THEME,
        }
    }

    pub fn light() -> Self {
        Self {
            info_color: Color::Reset,
            success_color: Color::DarkGreen,
            warning_color: Color::DarkYellow,
            error_color: Color::DarkRed,
            accent_color: PRIMARY,
            muted_color: Color::Grey,
            code_theme: LIGHT_CODE_THEME,
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::light()
    }
}

/// Terminal renderer for messages.
pub struct TerminalRenderer {
    style: RenderStyle,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl TerminalRenderer {
    /// Create a new renderer.
    pub fn new(dark_mode: bool) -> Self {
        Self::with_style(RenderStyle::for_mode(dark_mode))
    }

    /// Create with custom style.
    pub fn with_style(style: RenderStyle) -> Self {
        Self {
            style,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Switch palettes after a theme toggle.
    pub fn set_dark_mode(&mut self, dark: bool) {
        self.style = RenderStyle::for_mode(dark);
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Render a message to the terminal.
    pub fn render(&self, message: &Message) -> std::io::Result<()> {
        match message {
            Message::Text(text) => self.render_text(text.level, &text.text),
            Message::Panel(panel) => self.render_panel(panel),
            Message::Code(code) => self.render_code_block(&code.lang, &code.code),
            Message::Swatches(colors) => self.render_swatches(colors),
            Message::Grid(grid) => self.render_grid(grid),
            Message::Chat(line) => self.render_chat_line(line),
            Message::Divider => self.render_divider(),
            Message::Clear => self.clear_screen(),
        }
    }

    /// Render a batch of messages in order.
    pub fn render_all(&self, messages: &[Message]) -> std::io::Result<()> {
        for message in messages {
            self.render(message)?;
        }
        Ok(())
    }

    fn render_text(&self, level: MessageLevel, text: &str) -> std::io::Result<()> {
        let color = match level {
            MessageLevel::Info => self.style.info_color,
            MessageLevel::Success => self.style.success_color,
            MessageLevel::Warning => self.style.warning_color,
            MessageLevel::Error => self.style.error_color,
            MessageLevel::Debug => self.style.muted_color,
        };

        let prefix = match level {
            MessageLevel::Success => "✓ ",
            MessageLevel::Warning => "⚠ ",
            MessageLevel::Error => "✗ ",
            _ => "",
        };

        stdout()
            .execute(SetForegroundColor(color))?
            .execute(Print(prefix))?
            .execute(Print(text))?
            .execute(Print("\n"))?
            .execute(ResetColor)?;

        Ok(())
    }

    fn render_panel(&self, panel: &PanelMessage) -> std::io::Result<()> {
        let mut stdout = stdout();
        stdout
            .execute(SetForegroundColor(self.style.accent_color))?
            .execute(SetAttribute(Attribute::Bold))?
            .execute(Print(&panel.title))?
            .execute(SetAttribute(Attribute::Reset))?
            .execute(ResetColor)?
            .execute(Print("\n"))?;

        for line in &panel.lines {
            stdout
                .execute(SetForegroundColor(self.style.muted_color))?
                .execute(Print("│ "))?
                .execute(ResetColor)?
                .execute(Print(line))?
                .execute(Print("\n"))?;
        }

        Ok(())
    }

    /// Render a code block with syntax highlighting.
    fn render_code_block(&self, lang: &str, code: &str) -> std::io::Result<()> {
        let mut stdout = stdout();

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(self.style.code_theme)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            println!("{}", code);
            return Ok(());
        };
        let mut highlighter = HighlightLines::new(syntax, theme);

        stdout
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print(format!(
                "┌── {}\n",
                if lang.is_empty() { "code" } else { lang }
            )))?
            .execute(ResetColor)?;

        for line in LinesWithEndings::from(code) {
            stdout
                .execute(SetForegroundColor(self.style.muted_color))?
                .execute(Print("│ "))?
                .execute(ResetColor)?;

            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
                    print!("{}", escaped);
                }
                Err(_) => {
                    print!("{}", line);
                }
            }
        }
        if !code.ends_with('\n') {
            println!();
        }

        stdout
            .execute(ResetColor)?
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print("└──\n"))?
            .execute(ResetColor)?;

        Ok(())
    }

    fn render_swatches(&self, colors: &[String]) -> std::io::Result<()> {
        let mut stdout = stdout();
        for hex in colors {
            match parse_hex(hex) {
                Some(color) => {
                    stdout
                        .execute(SetBackgroundColor(color))?
                        .execute(Print("      "))?
                        .execute(ResetColor)?;
                }
                None => {
                    stdout.execute(Print("  ??  "))?;
                }
            }
            stdout.execute(Print(format!(" {}\n", hex.to_uppercase())))?;
        }
        stdout.flush()
    }

    fn render_grid(&self, grid: &GridMessage) -> std::io::Result<()> {
        let mut stdout = stdout();
        stdout
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print(format!("Category: {}", grid.category)))?;
        if !grid.query.is_empty() {
            stdout.execute(Print(format!("  Search: \"{}\"", grid.query)))?;
        }
        stdout.execute(Print("\n"))?.execute(ResetColor)?;

        if grid.cards.is_empty() {
            stdout
                .execute(SetForegroundColor(self.style.warning_color))?
                .execute(Print("No tools found. Try a different search or category.\n"))?
                .execute(ResetColor)?;
            return Ok(());
        }

        let width = terminal_width();
        for (index, card) in grid.cards.iter().enumerate() {
            self.render_card(index + 1, card, width)?;
        }
        Ok(())
    }

    fn render_card(&self, number: usize, card: &CardMessage, width: usize) -> std::io::Result<()> {
        let mut stdout = stdout();
        stdout
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print(format!("{:>3}. ", number)))?
            .execute(SetForegroundColor(self.style.accent_color))?
            .execute(SetAttribute(Attribute::Bold))?
            .execute(Print(&card.name))?
            .execute(SetAttribute(Attribute::Reset))?
            .execute(ResetColor)?;
        if card.is_hot {
            stdout
                .execute(SetForegroundColor(Color::DarkYellow))?
                .execute(Print(" HOT"))?
                .execute(ResetColor)?;
        }
        stdout
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print(format!("  [{}] {}\n", card.id, card.category)))?
            .execute(ResetColor)?;

        let indent = "     ";
        let available = width.saturating_sub(indent.len()).max(20);
        for line in wrap(&card.description, available) {
            stdout.execute(Print(format!("{}{}\n", indent, line)))?;
        }
        Ok(())
    }

    fn render_chat_line(&self, line: &ChatLineMessage) -> std::io::Result<()> {
        let (label, color) = match line.speaker {
            ChatSpeaker::User => ("You", self.style.info_color),
            ChatSpeaker::Assistant => ("Assistant", self.style.accent_color),
        };
        stdout()
            .execute(SetForegroundColor(color))?
            .execute(SetAttribute(Attribute::Bold))?
            .execute(Print(format!("{}: ", label)))?
            .execute(SetAttribute(Attribute::Reset))?
            .execute(ResetColor)?
            .execute(Print(&line.text))?
            .execute(Print("\n"))?;
        Ok(())
    }

    fn render_divider(&self) -> std::io::Result<()> {
        let width = terminal_width().min(80);
        stdout()
            .execute(SetForegroundColor(self.style.muted_color))?
            .execute(Print("─".repeat(width)))?
            .execute(Print("\n"))?
            .execute(ResetColor)?;
        Ok(())
    }

    fn clear_screen(&self) -> std::io::Result<()> {
        use crossterm::cursor::MoveTo;
        use crossterm::terminal::{Clear, ClearType};
        stdout().execute(Clear(ClearType::All))?.execute(MoveTo(0, 0))?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(80)
}

/// Parse `#rrggbb` into a terminal colour.
fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some(Color::Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Greedy word wrap.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            parse_hex("#137fec"),
            Some(Color::Rgb { r: 0x13, g: 0x7f, b: 0xec })
        );
        assert_eq!(parse_hex("FFFFFF"), Some(Color::Rgb { r: 255, g: 255, b: 255 }));
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn test_style_for_mode() {
        assert_eq!(RenderStyle::for_mode(true).code_theme, DARK_CODE_THEME);
        assert_eq!(RenderStyle::for_mode(false).code_theme, LIGHT_CODE_THEME);
    }

    #[test]
    fn test_code_themes_exist() {
        let themes = ThemeSet::load_defaults();
        assert!(themes.themes.contains_key(DARK_CODE_THEME));
        assert!(themes.themes.contains_key(LIGHT_CODE_THEME));
    }

    #[test]
    fn test_set_dark_mode() {
        let mut renderer = TerminalRenderer::new(false);
        renderer.set_dark_mode(true);
        assert_eq!(renderer.style().code_theme, DARK_CODE_THEME);
    }
}
