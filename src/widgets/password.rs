//! Password generation and strength scoring.

use async_trait::async_trait;
use rand::Rng;

use super::input::{parse_or, parse_switch, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+~`|}{[]:;?><,./-=";

pub const MIN_LENGTH: usize = 8;
pub const MAX_LENGTH: usize = 100;
pub const DEFAULT_LENGTH: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub upper: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            upper: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl PasswordOptions {
    /// Enabled classes concatenated: lower, upper, numbers, symbols.
    pub fn charset(&self) -> String {
        let mut charset = String::from(LOWERCASE);
        if self.upper {
            charset.push_str(UPPERCASE);
        }
        if self.numbers {
            charset.push_str(NUMBERS);
        }
        if self.symbols {
            charset.push_str(SYMBOLS);
        }
        charset
    }

    pub fn clamped_length(&self) -> usize {
        self.length.clamp(MIN_LENGTH, MAX_LENGTH)
    }
}

/// Generate a password with the thread-local CSPRNG.
pub fn generate_password(options: &PasswordOptions) -> String {
    generate_with(options, &mut rand::rng())
}

/// Generate a password drawing uniformly from `options.charset()`.
pub fn generate_with<R: Rng + ?Sized>(options: &PasswordOptions, rng: &mut R) -> String {
    let charset: Vec<char> = options.charset().chars().collect();
    (0..options.clamped_length())
        .map(|_| charset[rng.random_range(0..charset.len())])
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Empty,
    Weak,
    Medium,
    Strong,
    Exceptional,
}

impl Strength {
    pub fn label(self) -> &'static str {
        match self {
            Strength::Empty => "Empty",
            Strength::Weak => "Weak",
            Strength::Medium => "Medium",
            Strength::Strong => "Strong",
            Strength::Exceptional => "Exceptional",
        }
    }

    /// Meter fill in quarters.
    pub fn meter(self) -> usize {
        match self {
            Strength::Empty => 0,
            Strength::Weak => 1,
            Strength::Medium => 2,
            Strength::Strong => 3,
            Strength::Exceptional => 4,
        }
    }
}

/// One point each for: longer than 12, longer than 20, a digit, a symbol,
/// an uppercase letter.
pub fn strength_score(password: &str) -> u8 {
    let length = password.chars().count();
    let checks = [
        length > 12,
        length > 20,
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
        password.chars().any(|c| c.is_ascii_uppercase()),
    ];
    checks.iter().filter(|&&passed| passed).count() as u8
}

pub fn strength(password: &str) -> Strength {
    if password.is_empty() {
        return Strength::Empty;
    }
    match strength_score(password) {
        0..=1 => Strength::Weak,
        2..=3 => Strength::Medium,
        4 => Strength::Strong,
        _ => Strength::Exceptional,
    }
}

const USAGE: &[(&str, &str)] = &[
    ("generate", "Generate a new password"),
    ("length <8-100>", "Set the length"),
    ("upper [on|off]", "Include uppercase letters"),
    ("numbers [on|off]", "Include digits"),
    ("symbols [on|off]", "Include symbols"),
    ("check <password>", "Score an existing password"),
];

pub struct PasswordWidget {
    options: PasswordOptions,
    password: String,
}

impl PasswordWidget {
    /// A password is generated on mount.
    pub fn new() -> Self {
        let options = PasswordOptions::default();
        Self {
            password: generate_password(&options),
            options,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn options(&self) -> &PasswordOptions {
        &self.options
    }

    fn regenerate(&mut self) {
        self.password = generate_password(&self.options);
    }
}

impl Default for PasswordWidget {
    fn default() -> Self {
        Self::new()
    }
}

fn meter_line(password: &str) -> String {
    let strength = strength(password);
    let filled = strength.meter();
    format!(
        "Strength: [{}{}] {}",
        "#".repeat(filled * 5),
        "-".repeat((4 - filled) * 5),
        strength.label()
    )
}

#[async_trait]
impl Widget for PasswordWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::PasswordSuite
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        let on = |b: bool| if b { "on" } else { "off" };
        Message::panel(
            "Secure Key Vault",
            [
                self.password.clone(),
                meter_line(&self.password),
                format!(
                    "Length {}  upper {}  numbers {}  symbols {}",
                    self.options.length,
                    on(self.options.upper),
                    on(self.options.numbers),
                    on(self.options.symbols)
                ),
            ],
        )
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "generate" | "regen" | "" => self.regenerate(),
            "length" => {
                let length = parse_or(arg, DEFAULT_LENGTH);
                self.options.length = length.clamp(MIN_LENGTH, MAX_LENGTH);
                self.regenerate();
            }
            "upper" => {
                self.options.upper = parse_switch(arg, self.options.upper);
                self.regenerate();
            }
            "numbers" => {
                self.options.numbers = parse_switch(arg, self.options.numbers);
                self.regenerate();
            }
            "symbols" => {
                self.options.symbols = parse_switch(arg, self.options.symbols);
                self.regenerate();
            }
            "check" => {
                return Ok(vec![Message::panel(
                    "Password check",
                    [meter_line(arg), format!("Score: {}/5", strength_score(arg))],
                )]);
            }
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // =========================================================================
    // Generation
    // =========================================================================

    #[test]
    fn test_charset_order() {
        let all = PasswordOptions::default().charset();
        assert!(all.starts_with(LOWERCASE));
        assert!(all.ends_with(SYMBOLS));

        let lower_only = PasswordOptions {
            upper: false,
            numbers: false,
            symbols: false,
            ..Default::default()
        };
        assert_eq!(lower_only.charset(), LOWERCASE);
    }

    #[test]
    fn test_generated_chars_come_from_enabled_classes() {
        let mut rng = StdRng::seed_from_u64(7);
        for upper in [false, true] {
            for numbers in [false, true] {
                for symbols in [false, true] {
                    for length in [MIN_LENGTH, 18, 57, MAX_LENGTH] {
                        let options = PasswordOptions {
                            length,
                            upper,
                            numbers,
                            symbols,
                        };
                        let charset = options.charset();
                        let password = generate_with(&options, &mut rng);
                        assert_eq!(password.chars().count(), length);
                        assert!(password.chars().all(|c| charset.contains(c)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_length_is_clamped() {
        let short = PasswordOptions {
            length: 2,
            ..Default::default()
        };
        assert_eq!(generate_password(&short).len(), MIN_LENGTH);

        let long = PasswordOptions {
            length: 500,
            ..Default::default()
        };
        assert_eq!(generate_password(&long).len(), MAX_LENGTH);
    }

    #[test]
    fn test_regeneration_changes_value() {
        let options = PasswordOptions::default();
        let a = generate_password(&options);
        let b = generate_password(&options);
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
    }

    // =========================================================================
    // Strength
    // =========================================================================

    #[test]
    fn test_strength_buckets() {
        assert_eq!(strength(""), Strength::Empty);
        assert_eq!(strength("abc"), Strength::Weak);
        assert_eq!(strength("abcdefghijklmn"), Strength::Weak);
        assert_eq!(strength("abc1"), Strength::Weak);
        assert_eq!(strength("Abc1"), Strength::Medium);
        assert_eq!(strength("Abc1!"), Strength::Medium);
        assert_eq!(strength("Abcdefghijklm1!"), Strength::Strong);
        assert_eq!(strength("Abcdefghijklmnopqrstu1!"), Strength::Exceptional);
    }

    #[test]
    fn test_score_counts_each_rule_once() {
        assert_eq!(strength_score("AAAA"), 1);
        assert_eq!(strength_score("1111"), 1);
        assert_eq!(strength_score("!!!!"), 1);
        assert_eq!(strength_score("aaaaaaaaaaaaaaaaaaaaaa"), 2);
    }

    // =========================================================================
    // Widget
    // =========================================================================

    #[test]
    fn test_widget_generates_on_mount() {
        let widget = PasswordWidget::new();
        assert_eq!(widget.password().len(), DEFAULT_LENGTH);
    }

    #[tokio::test]
    async fn test_widget_options() {
        let ctx = WidgetContext::new(".");
        let mut widget = PasswordWidget::new();

        widget.handle("length 30", &ctx).await.unwrap();
        assert_eq!(widget.password().len(), 30);

        widget.handle("length nope", &ctx).await.unwrap();
        assert_eq!(widget.options().length, DEFAULT_LENGTH);

        widget.handle("symbols off", &ctx).await.unwrap();
        widget.handle("numbers off", &ctx).await.unwrap();
        widget.handle("upper off", &ctx).await.unwrap();
        assert!(widget.password().chars().all(|c| c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_widget_check() {
        let ctx = WidgetContext::new(".");
        let mut widget = PasswordWidget::new();
        let out = widget.handle("check hunter2", &ctx).await.unwrap();
        assert!(out[0].plain().contains("Weak"));
    }
}
