//! HTML formatting through the prettier command line.
//!
//! Before an HTML exercise is bundled, every `.html` file is reformatted with
//! a fixed prettier configuration and written back, so the preview always
//! shows consistently indented markup.  A file prettier cannot parse is a
//! compilation error: its line number and message are reported to the
//! student instead of building the preview.
//!
//! # How prettier is invoked
//!
//! ```text
//! prettier --parser html --print-width 80 --tab-width 4 \
//!          --html-whitespace-sensitivity ignore  < index.html
//! ```
//!
//! The source is written to prettier's stdin and the formatted markup is read
//! back from stdout.  On a syntax error prettier exits non-zero and prints
//! something like `[error] stdin: SyntaxError: Unexpected closing tag "p". (7:3)`.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// A file prettier refused to format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line: {} {message}", .line.map_or_else(|| "?".to_string(), |l| l.to_string()))]
pub struct FormatError {
    /// 1-based line of the first syntax error, when prettier reported one.
    pub line: Option<u32>,
    pub message: String,
}

impl FormatError {
    pub fn new(line: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Formats HTML documents.
#[async_trait]
pub trait HtmlFormatter: Send + Sync {
    /// Returns `source` reformatted, or the first syntax error.
    async fn format_html(&self, source: &str) -> Result<String, FormatError>;
}

/// The fixed prettier settings applied to every exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettierOptions {
    pub print_width: u16,
    pub tab_width: u8,
    pub use_tabs: bool,
    pub html_whitespace_sensitivity: &'static str,
}

impl Default for PrettierOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            tab_width: 4,
            use_tabs: false,
            html_whitespace_sensitivity: "ignore",
        }
    }
}

impl PrettierOptions {
    fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--parser".to_string(),
            "html".to_string(),
            "--print-width".to_string(),
            self.print_width.to_string(),
            "--tab-width".to_string(),
            self.tab_width.to_string(),
            "--html-whitespace-sensitivity".to_string(),
            self.html_whitespace_sensitivity.to_string(),
        ];
        if self.use_tabs {
            args.push("--use-tabs".to_string());
        }
        args
    }
}

/// [`HtmlFormatter`] backed by the `prettier` executable.
#[derive(Debug, Clone)]
pub struct PrettierCli {
    program: PathBuf,
    options: PrettierOptions,
}

impl Default for PrettierCli {
    fn default() -> Self {
        Self::new("prettier")
    }
}

impl PrettierCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            options: PrettierOptions::default(),
        }
    }
}

#[async_trait]
impl HtmlFormatter for PrettierCli {
    async fn format_html(&self, source: &str) -> Result<String, FormatError> {
        let spawn_err = |e: std::io::Error| {
            FormatError::new(None, format!("failed to run {}: {e}", self.program.display()))
        };

        let mut child = Command::new(&self.program)
            .args(self.options.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        // stdin is dropped at the end of this block, closing the pipe.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).await.map_err(spawn_err)?;
        }
        let output = child.wait_with_output().await.map_err(spawn_err)?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("prettier exited with {}: {stderr}", output.status);
        Err(parse_prettier_error(&stderr))
    }
}

/// Extracts the line number and message from prettier's stderr.
pub fn parse_prettier_error(stderr: &str) -> FormatError {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    let location = LOCATION.get_or_init(|| {
        Regex::new(r"\((\d+):(\d+)\)").expect("location pattern is valid")
    });

    let first = stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("prettier failed without output");
    let line = location
        .captures(first)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());
    let message = first
        .trim_start_matches("[error]")
        .trim()
        .trim_start_matches("stdin:")
        .trim();
    let message = location.replace(message, "").trim().to_string();

    FormatError { line, message }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prettier_syntax_error() {
        // Arrange
        let stderr = "[error] stdin: SyntaxError: Unexpected closing tag \"p\". (7:3)\n\
                      [error]   5 | <body>\n";

        // Act
        let err = parse_prettier_error(stderr);

        // Assert
        assert_eq!(err.line, Some(7));
        assert_eq!(err.message, "SyntaxError: Unexpected closing tag \"p\".");
        assert_eq!(err.to_string(), "Line: 7 SyntaxError: Unexpected closing tag \"p\".");
    }

    #[test]
    fn test_parse_prettier_error_without_location() {
        let err = parse_prettier_error("\n[error] No parser could be inferred\n");

        assert_eq!(err.line, None);
        assert_eq!(err.message, "No parser could be inferred");
        assert_eq!(err.to_string(), "Line: ? No parser could be inferred");
    }

    #[test]
    fn test_parse_empty_stderr() {
        let err = parse_prettier_error("");

        assert_eq!(err.message, "prettier failed without output");
    }

    #[test]
    fn test_default_options_render_fixed_arguments() {
        let args = PrettierOptions::default().to_args();

        assert_eq!(
            args,
            [
                "--parser",
                "html",
                "--print-width",
                "80",
                "--tab-width",
                "4",
                "--html-whitespace-sensitivity",
                "ignore"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_prettier_binary_is_a_format_error() {
        let formatter = PrettierCli::new("/nonexistent/bin/prettier");

        let err = formatter.format_html("<p>hi</p>").await.expect_err("must fail");

        assert_eq!(err.line, None);
        assert!(err.message.contains("failed to run"));
    }

    /// Writes an executable shell script standing in for prettier.
    #[cfg(unix)]
    fn fake_prettier(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("prettier");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_source_is_piped_through_the_child_process() {
        // Arrange: a formatter that echoes stdin back, uppercased
        let dir = tempfile::tempdir().expect("tempdir");
        let formatter = PrettierCli::new(fake_prettier(dir.path(), "tr a-z A-Z"));

        // Act
        let formatted = formatter
            .format_html("<p>hi</p>\n")
            .await
            .expect("format");

        // Assert
        assert_eq!(formatted, "<P>HI</P>\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_parsed_from_stderr() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = "cat >/dev/null\n\
                      echo '[error] stdin: SyntaxError: Unexpected closing tag \"p\". (2:5)' >&2\n\
                      exit 2";
        let formatter = PrettierCli::new(fake_prettier(dir.path(), script));

        let err = formatter.format_html("<div>\n</p>").await.expect_err("must fail");

        assert_eq!(err.line, Some(2));
        assert_eq!(err.message, "SyntaxError: Unexpected closing tag \"p\".");
    }
}
