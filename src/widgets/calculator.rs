//! Scientific calculator: an expression evaluator plus a display/history session.

use std::collections::VecDeque;
use std::f64::consts::PI;

use async_trait::async_trait;
use thiserror::Error;

use super::input::split_command;
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

pub const HISTORY_LIMIT: usize = 10;
pub const ERROR_DISPLAY: &str = "Error";
/// Deepest nesting of parentheses, signs and function calls.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("result is not a finite number")]
    NotFinite,
    #[error("expression nested deeper than {} levels", MAX_NESTING)]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Sqrt,
}

impl Func {
    fn apply(self, x: f64) -> f64 {
        match self {
            Func::Sin => x.sin(),
            Func::Cos => x.cos(),
            Func::Tan => x.tan(),
            Func::Sqrt => x.sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    LParen,
    RParen,
    Func(Func),
}

fn tokenize(expr: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse()
                    .map_err(|_| CalcError::UnexpectedToken(format!("number '{}'", text)))?;
                tokens.push(Token::Num(value));
            }
            '+' | '-' | '*' | '/' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '×' => {
                tokens.push(Token::Op('*'));
                i += 1;
            }
            '÷' => {
                tokens.push(Token::Op('/'));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            'π' => {
                tokens.push(Token::Num(PI));
                i += 1;
            }
            '√' => {
                tokens.push(Token::Func(Func::Sqrt));
                i += 1;
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let token = match word.to_lowercase().as_str() {
                    "sin" => Token::Func(Func::Sin),
                    "cos" => Token::Func(Func::Cos),
                    "tan" => Token::Func(Func::Tan),
                    "sqrt" => Token::Func(Func::Sqrt),
                    "pi" => Token::Num(PI),
                    _ => return Err(CalcError::UnknownFunction(word)),
                };
                tokens.push(token);
            }
            other => return Err(CalcError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream.
///
/// ```text
/// expr    := term (('+' | '-') term)*
/// term    := unary (('*' | '/') unary)*
/// unary   := ('-' | '+') unary | power
/// power   := primary ('^' unary)?
/// primary := number | func primary | '(' expr ')'
/// ```
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    /// Run `rule` one nesting level down. Every recursive rule passes
    /// through here, so the native stack stays bounded.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<f64, CalcError>) -> Result<f64, CalcError> {
        if self.depth >= MAX_NESTING {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = if op == '*' { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.nested(Self::unary)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::Func(f)) => Ok(f.apply(self.nested(Self::primary)?)),
            Some(Token::LParen) => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(unexpected(other)),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some(other) => Err(unexpected(other)),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

fn unexpected(token: Token) -> CalcError {
    let text = match token {
        Token::Num(n) => format!("number {}", n),
        Token::Op(c) => format!("'{}'", c),
        Token::LParen => "'('".to_string(),
        Token::RParen => "')'".to_string(),
        Token::Func(f) => format!("function {:?}", f).to_lowercase(),
    };
    CalcError::UnexpectedToken(text)
}

/// Evaluate an arithmetic expression. Trigonometry works in radians.
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(CalcError::UnexpectedEnd);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(unexpected(extra));
    }
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

/// Integers print plainly, everything else with six decimals.
pub fn format_result(value: f64) -> String {
    if value == value.trunc() {
        if value == 0.0 {
            "0".to_string()
        } else {
            format!("{}", value)
        }
    } else {
        format!("{:.6}", value)
    }
}

/// Display and history of the calculator keypad.
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    history: VecDeque<String>,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Newest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Type `keys` into the display; a `0` or `Error` display is replaced.
    pub fn press(&mut self, keys: &str) {
        if self.display == "0" || self.display == ERROR_DISPLAY {
            self.display = keys.to_string();
        } else {
            self.display.push_str(keys);
        }
    }

    /// Evaluate the display, replacing it with the result or `Error`.
    pub fn calculate(&mut self) -> Result<f64, CalcError> {
        match evaluate(&self.display) {
            Ok(value) => {
                let result = format_result(value);
                self.history
                    .push_front(format!("{} = {}", self.display, result));
                self.history.truncate(HISTORY_LIMIT);
                self.display = result;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(expr = %self.display, error = %e, "Calculation failed");
                self.display = ERROR_DISPLAY.to_string();
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `input` reads as keypad input rather than a command word.
fn is_expression(input: &str) -> bool {
    let lower = input.to_lowercase();
    let starts_with_key = input.starts_with(|c: char| {
        c.is_ascii_digit() || "+-*/^().=×÷π√".contains(c)
    });
    starts_with_key
        || ["sin", "cos", "tan", "sqrt", "pi"]
            .iter()
            .any(|f| lower.starts_with(f))
}

const USAGE: &[(&str, &str)] = &[
    ("<keys>", "Type into the display, e.g. 2*(3+4)"),
    ("<keys>=", "Type and evaluate, e.g. sin(π/2)="),
    ("=", "Evaluate the display"),
    ("clear", "Reset the display to 0"),
    ("history", "Show the last 10 calculations"),
];

pub struct CalculatorWidget {
    calc: Calculator,
}

impl CalculatorWidget {
    pub fn new() -> Self {
        Self {
            calc: Calculator::new(),
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    fn history_panel(&self) -> Message {
        let mut lines: Vec<String> = self.calc.history().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push("No calculations yet".to_string());
        }
        Message::panel("History", lines)
    }
}

impl Default for CalculatorWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for CalculatorWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::StudyCalc
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        Message::panel("Study Calc", [self.calc.display().to_string()])
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let input = input.trim();
        let (cmd, _) = split_command(input);
        match cmd.as_str() {
            "clear" | "c" | "ac" => self.calc.clear(),
            "history" => return Ok(vec![self.history_panel()]),
            "show" | "" => {}
            _ if is_expression(input) => {
                let (keys, evaluate) = match input.strip_suffix('=') {
                    Some(keys) => (keys.trim_end(), true),
                    None => (input, false),
                };
                let keys: String = keys.chars().filter(|c| !c.is_whitespace()).collect();
                if !keys.is_empty() {
                    self.calc.press(&keys);
                }
                if evaluate {
                    // A failed calculation shows Error in the display.
                    let _ = self.calc.calculate();
                }
            }
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> String {
        format_result(evaluate(expr).unwrap())
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), "14");
        assert_eq!(eval("(2+3)*4"), "20");
        assert_eq!(eval("10/4"), "2.500000");
        assert_eq!(eval("7 - 2 - 1"), "4");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("2^3^2"), "512");
        assert_eq!(eval("-2^2"), "-4");
        assert_eq!(eval("2^-1"), "0.500000");
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(eval("sin(π/2)"), "1");
        assert_eq!(eval("cos(0)"), "1");
        assert_eq!(eval("√(16)"), "4");
        assert_eq!(eval("sqrt 9"), "3");
        assert_eq!(eval("pi"), "3.141593");
        assert_eq!(eval("6×7÷2"), "21");
    }

    #[test]
    fn test_negative_zero_prints_zero() {
        assert_eq!(eval("-0"), "0");
        assert_eq!(eval("0*-1"), "0");
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1/0"), Err(CalcError::NotFinite));
        assert_eq!(evaluate("√(-1)"), Err(CalcError::NotFinite));
        assert_eq!(evaluate("2+"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("(1+2"), Err(CalcError::UnexpectedEnd));
        assert_eq!(evaluate("3 $ 4"), Err(CalcError::UnexpectedChar('$')));
        assert_eq!(
            evaluate("log(2)"),
            Err(CalcError::UnknownFunction("log".to_string()))
        );
        assert!(matches!(evaluate("1.2.3"), Err(CalcError::UnexpectedToken(_))));
        assert!(matches!(evaluate("2 3"), Err(CalcError::UnexpectedToken(_))));
        assert_eq!(evaluate(""), Err(CalcError::UnexpectedEnd));
    }

    // =========================================================================
    // Keypad Session
    // =========================================================================

    #[test]
    fn test_deep_nesting_is_rejected() {
        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate(&shallow), Ok(1.0));
        assert_eq!(evaluate(&format!("{}5", "-".repeat(10))), Ok(5.0));

        let parens = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert_eq!(evaluate(&parens), Err(CalcError::TooDeep));
        assert_eq!(evaluate(&format!("{}1", "-".repeat(200_000))), Err(CalcError::TooDeep));
        assert_eq!(evaluate(&format!("{}4", "√".repeat(10_000))), Err(CalcError::TooDeep));
        assert_eq!(evaluate(&format!("2{}", "^2".repeat(10_000))), Err(CalcError::TooDeep));

        let mut calc = Calculator::new();
        calc.press(&parens);
        assert!(calc.calculate().is_err());
        assert_eq!(calc.display(), ERROR_DISPLAY);
    }

    #[test]
    fn test_press_replaces_zero_and_error() {
        let mut calc = Calculator::new();
        calc.press("7");
        calc.press("+1");
        assert_eq!(calc.display(), "7+1");
        calc.calculate().unwrap();
        assert_eq!(calc.display(), "8");

        calc.press("/");
        assert!(calc.calculate().is_err());
        assert_eq!(calc.display(), ERROR_DISPLAY);
        calc.press("5");
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut calc = Calculator::new();
        for i in 1..=12 {
            calc.clear();
            calc.press(&format!("{}+0", i));
            calc.calculate().unwrap();
        }
        let history: Vec<&str> = calc.history().collect();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0], "12+0 = 12");
        assert_eq!(history[9], "3+0 = 3");
    }

    #[tokio::test]
    async fn test_widget_expression_lines() {
        let ctx = WidgetContext::new(".");
        let mut widget = CalculatorWidget::new();
        widget.handle("2 * (3 + 4)", &ctx).await.unwrap();
        assert_eq!(widget.calculator().display(), "2*(3+4)");
        widget.handle("=", &ctx).await.unwrap();
        assert_eq!(widget.calculator().display(), "14");

        widget.handle("clear", &ctx).await.unwrap();
        widget.handle("sin(0)=", &ctx).await.unwrap();
        assert_eq!(widget.calculator().display(), "0");

        widget.handle("1/0=", &ctx).await.unwrap();
        assert_eq!(widget.calculator().display(), ERROR_DISPLAY);

        let out = widget.handle("history", &ctx).await.unwrap();
        assert!(out[0].plain().contains("2*(3+4) = 14"));
    }
}
