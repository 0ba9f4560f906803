//! End-to-end tests for the `toolnest` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with settings isolated from the user's config.
fn toolnest(config: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("toolnest").unwrap();
    cmd.env("XDG_CONFIG_HOME", config.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("API_KEY")
        .env_remove("TOOLNEST_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

// =========================================================================
// Listing
// =========================================================================

#[test]
fn test_list_all_tools() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("qr-generator\tQR Code Pro"))
        .stdout(predicate::str::contains("lorem-ipsum\tLorem Ipsum"));
}

#[test]
fn test_list_by_category() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .args(["--list", "--category", "Student Kit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf-merger"))
        .stdout(predicate::str::contains("qr-generator").not());
}

#[test]
fn test_list_with_search() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .args(["--list", "--search", "lorem"])
        .assert()
        .success()
        .stdout("lorem-ipsum\tLorem Ipsum\n");
}

#[test]
fn test_list_empty_category_prints_nothing() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .args(["--list", "--category", "pdf-tools"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_unknown_category_is_rejected() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .args(["--list", "--category", "Gardening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

// =========================================================================
// Settings and Help
// =========================================================================

#[test]
fn test_malformed_settings_fail() {
    let config = TempDir::new().unwrap();
    let dir = config.path().join("toolnest");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("settings.json"), "{ not json").unwrap();

    toolnest(&config)
        .arg("--list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse settings file"));
}

#[test]
fn test_help() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--category"))
        .stdout(predicate::str::contains("--tool"));
}

// =========================================================================
// Assistant
// =========================================================================

#[test]
fn test_prompt_without_key_falls_back() {
    let config = TempDir::new().unwrap();
    toolnest(&config)
        .args(["--prompt", "How do I merge PDFs?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AI is busy, but your tools are ready!",
        ));
}
