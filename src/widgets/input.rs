//! Argument parsing shared by the widgets.
//!
//! Malformed numbers fall back to the caller's default instead of failing.

use std::path::PathBuf;
use std::str::FromStr;

use super::WidgetError;

/// Split `input` into a lower-cased command word and the trimmed remainder.
pub fn split_command(input: &str) -> (String, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
        None => (input.to_lowercase(), ""),
    }
}

/// Parse `value`, falling back to `default` when missing or malformed.
pub fn parse_or<T: FromStr>(value: &str, default: T) -> T {
    value.trim().parse().unwrap_or(default)
}

/// Parse a finite float, falling back to `default`.
pub fn parse_f64_or(value: &str, default: f64) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => default,
    }
}

/// Parse an on/off switch. An empty argument toggles `current`.
pub fn parse_switch(value: &str, current: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "" => !current,
        "on" | "true" | "yes" | "1" => true,
        "off" | "false" | "no" | "0" => false,
        _ => current,
    }
}

/// Expand `~` and glob patterns into existing files, in sorted order.
pub fn expand_files(pattern: &str) -> Result<Vec<PathBuf>, WidgetError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(WidgetError::Usage("a file path or glob pattern"));
    }
    let expanded = shellexpand::tilde(pattern).into_owned();

    let plain = PathBuf::from(&expanded);
    if plain.is_file() {
        return Ok(vec![plain]);
    }

    let paths = glob::glob(&expanded)
        .map_err(|e| WidgetError::Invalid(format!("Invalid pattern {}: {}", pattern, e)))?;
    let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
    files.sort();

    if files.is_empty() {
        return Err(WidgetError::NoMatch(pattern.to_string()));
    }
    Ok(files)
}

/// `<prefix>_<unix millis>.<ext>`, the naming scheme for downloads.
pub fn timestamped_name(prefix: &str, ext: &str) -> String {
    format!("{}_{}.{}", prefix, chrono::Utc::now().timestamp_millis(), ext)
}

/// Size in kilobytes with one decimal.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // Command Splitting
    // =========================================================================

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  Size   400 "), ("size".to_string(), "400"));
        assert_eq!(split_command("swap"), ("swap".to_string(), ""));
        assert_eq!(split_command(""), (String::new(), ""));
        assert_eq!(
            split_command("text hello world"),
            ("text".to_string(), "hello world")
        );
    }

    // =========================================================================
    // Coercion
    // =========================================================================

    #[test]
    fn test_parse_or_coerces_malformed() {
        assert_eq!(parse_or("42", 7u32), 42);
        assert_eq!(parse_or("abc", 7u32), 7);
        assert_eq!(parse_or("", 7u32), 7);
        assert_eq!(parse_or("-3", 7u32), 7);
    }

    #[test]
    fn test_parse_f64_rejects_non_finite() {
        assert_eq!(parse_f64_or("2.5", 0.0), 2.5);
        assert_eq!(parse_f64_or("NaN", 1.0), 1.0);
        assert_eq!(parse_f64_or("inf", 1.0), 1.0);
        assert_eq!(parse_f64_or("x", 1.0), 1.0);
    }

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("on", false));
        assert!(!parse_switch("off", true));
        assert!(parse_switch("", false));
        assert!(!parse_switch("", true));
        assert!(parse_switch("maybe", true));
    }

    // =========================================================================
    // File Expansion
    // =========================================================================

    #[test]
    fn test_expand_plain_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.pdf");
        fs::write(&path, b"x").unwrap();
        let files = expand_files(path.to_str().unwrap()).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_expand_glob_is_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["b.png", "a.png", "c.txt"] {
            fs::write(temp.path().join(name), b"x").unwrap();
        }
        let pattern = format!("{}/*.png", temp.path().display());
        let files = expand_files(&pattern).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_expand_no_match() {
        let temp = TempDir::new().unwrap();
        let pattern = format!("{}/*.pdf", temp.path().display());
        assert!(matches!(expand_files(&pattern), Err(WidgetError::NoMatch(_))));
        assert!(matches!(expand_files(""), Err(WidgetError::Usage(_))));
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    #[test]
    fn test_timestamped_name() {
        let name = timestamped_name("merged", "pdf");
        assert!(name.starts_with("merged_"));
        assert!(name.ends_with(".pdf"));
        let millis = &name["merged_".len()..name.len() - ".pdf".len()];
        assert!(millis.parse::<i64>().is_ok());
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(1024), "1.0 KB");
        assert_eq!(format_kb(1536), "1.5 KB");
        assert_eq!(format_kb(0), "0.0 KB");
    }
}
