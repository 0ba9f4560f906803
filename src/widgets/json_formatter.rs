//! JSON pretty-printer and minifier.

use async_trait::async_trait;
use serde_json::Value;

use super::input::{expand_files, split_command};
use super::{Widget, WidgetContext, WidgetError};
use crate::messaging::Message;
use crate::registry::ToolKind;

fn parse(text: &str) -> Result<Value, WidgetError> {
    serde_json::from_str(text).map_err(|e| WidgetError::Invalid(format!("Invalid JSON: {}", e)))
}

/// Pretty-print with two-space indentation, keeping key order.
pub fn format_json(text: &str) -> Result<String, WidgetError> {
    let value = parse(text)?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| WidgetError::Invalid(format!("Invalid JSON: {}", e)))
}

pub fn minify_json(text: &str) -> Result<String, WidgetError> {
    let value = parse(text)?;
    serde_json::to_string(&value).map_err(|e| WidgetError::Invalid(format!("Invalid JSON: {}", e)))
}

const USAGE: &[(&str, &str)] = &[
    ("set <json>", "Replace the buffer"),
    ("append <text>", "Append a line to the buffer"),
    ("load <file>", "Read the buffer from a file"),
    ("format", "Pretty-print the buffer"),
    ("minify", "Strip whitespace from the buffer"),
    ("show", "Print the buffer"),
    ("clear", "Empty the buffer"),
];

pub struct JsonWidget {
    buffer: String,
}

impl JsonWidget {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer with `op(buffer)`; on error the buffer is untouched.
    fn rewrite(&mut self, op: fn(&str) -> Result<String, WidgetError>) -> Result<(), WidgetError> {
        self.buffer = op(&self.buffer)?;
        Ok(())
    }

    async fn load(&mut self, pattern: &str) -> Result<(), WidgetError> {
        let files = expand_files(pattern)?;
        let path = &files[0];
        self.buffer = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| WidgetError::Read {
                path: path.clone(),
                source,
            })?;
        Ok(())
    }
}

impl Default for JsonWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Widget for JsonWidget {
    fn kind(&self) -> ToolKind {
        ToolKind::JsonFormatter
    }

    fn usage(&self) -> &'static [(&'static str, &'static str)] {
        USAGE
    }

    fn render(&self) -> Message {
        if self.buffer.is_empty() {
            Message::panel("JSON Formatter", ["(empty buffer)"])
        } else {
            Message::code("json", self.buffer.clone())
        }
    }

    async fn handle(
        &mut self,
        input: &str,
        _ctx: &WidgetContext,
    ) -> Result<Vec<Message>, WidgetError> {
        let (cmd, arg) = split_command(input);
        match cmd.as_str() {
            "set" | "paste" => self.buffer = arg.to_string(),
            "append" => {
                if !self.buffer.is_empty() {
                    self.buffer.push('\n');
                }
                self.buffer.push_str(arg);
            }
            "load" => self.load(arg).await?,
            "format" | "pretty" => self.rewrite(format_json)?,
            "minify" => self.rewrite(minify_json)?,
            "clear" => self.buffer.clear(),
            "show" | "" => {}
            _ => return Err(WidgetError::UnknownCommand(cmd)),
        }
        Ok(vec![self.render()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // Formatting
    // =========================================================================

    #[test]
    fn test_format_keeps_key_order() {
        let pretty = format_json(r#"{"zeta":1,"alpha":[true,null]}"#).unwrap();
        assert_eq!(
            pretty,
            "{\n  \"zeta\": 1,\n  \"alpha\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_minify() {
        let min = minify_json("{\n  \"a\": 1,\n  \"b\": \"x y\"\n}").unwrap();
        assert_eq!(min, r#"{"a":1,"b":"x y"}"#);
    }

    #[test]
    fn test_invalid_json() {
        let err = format_json("{\"a\": }").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON"));
    }

    // =========================================================================
    // Widget
    // =========================================================================

    #[tokio::test]
    async fn test_error_leaves_buffer_unchanged() {
        let ctx = WidgetContext::new(".");
        let mut widget = JsonWidget::new();
        widget.handle("set {\"a\": [1, 2", &ctx).await.unwrap();
        assert!(widget.handle("format", &ctx).await.is_err());
        assert_eq!(widget.buffer(), "{\"a\": [1, 2");

        widget.handle("append ]}", &ctx).await.unwrap();
        widget.handle("minify", &ctx).await.unwrap();
        assert_eq!(widget.buffer(), r#"{"a":[1,2]}"#);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");
        fs::write(&path, "[1,2,3]").unwrap();
        let ctx = WidgetContext::new(temp.path());

        let mut widget = JsonWidget::new();
        widget
            .handle(&format!("load {}", path.display()), &ctx)
            .await
            .unwrap();
        let out = widget.handle("format", &ctx).await.unwrap();
        assert_eq!(out[0], Message::code("json", "[\n  1,\n  2,\n  3\n]"));
    }

    #[tokio::test]
    async fn test_empty_buffer_renders_placeholder() {
        let ctx = WidgetContext::new(".");
        let mut widget = JsonWidget::new();
        let out = widget.handle("show", &ctx).await.unwrap();
        assert!(out[0].plain().contains("(empty buffer)"));
    }
}
