//! [`Bundler`] backed by the `webpack` command line.
//!
//! Webpack is started once per build with `--json`, so that the compilation
//! stats arrive on stdout as a single JSON document.  A build with errors in
//! the student's code still prints stats (and exits non-zero); only a build
//! without stats is a [`BundlerError`].

use std::fmt::Write as _;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::{BundleRequest, BundleStats, Bundler, BundlerError};

/// Runs `webpack` as a child process.
#[derive(Debug, Clone)]
pub struct WebpackCli {
    program: PathBuf,
}

impl Default for WebpackCli {
    fn default() -> Self {
        Self::new("webpack")
    }
}

impl WebpackCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for `request`, in the order webpack receives them.
    pub fn args(request: &BundleRequest) -> Vec<String> {
        let mut args = vec![
            "--config".to_string(),
            request.config_file.to_string_lossy().into_owned(),
            "--mode".to_string(),
            "development".to_string(),
        ];
        for entry in &request.entries {
            args.push("--entry".to_string());
            args.push(entry.clone());
        }
        args.extend([
            "--output-path".to_string(),
            request.output_path.to_string_lossy().into_owned(),
            "--output-public-path".to_string(),
            request.public_path.clone(),
            "--env".to_string(),
            format!("contentBase={}", request.content_base),
        ]);
        if let Some(template) = &request.html_template {
            args.push("--env".to_string());
            args.push(format!("template={}", template.to_string_lossy()));
        }
        args.push("--json".to_string());
        args
    }
}

#[async_trait]
impl Bundler for WebpackCli {
    async fn run(&self, request: &BundleRequest) -> Result<BundleStats, BundlerError> {
        let program = self.program.to_string_lossy().into_owned();
        let args = Self::args(request);
        debug!("running {program} {}", args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&request.working_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| BundlerError::Spawn { program, source })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() && !output.status.success() {
            return Err(BundlerError::Crashed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_stats(&stdout)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawStats {
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    time: Option<u64>,
    #[serde(default)]
    assets: Vec<RawAsset>,
    #[serde(default)]
    errors: Vec<RawMessage>,
    #[serde(default)]
    warnings: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    name: String,
    #[serde(default)]
    size: u64,
}

/// Webpack 4 reports messages as strings, webpack 5 as objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMessage {
    Text(String),
    Detailed {
        message: String,
        #[serde(default, rename = "moduleName")]
        module_name: Option<String>,
    },
}

impl RawMessage {
    fn render(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Detailed {
                message,
                module_name: Some(module),
            } => format!("{module}\n{message}"),
            Self::Detailed { message, .. } => message,
        }
    }
}

/// Parses the JSON printed by `webpack --json` into [`BundleStats`].
///
/// Notices printed before the document are skipped, even when they contain
/// braces themselves: parsing starts at each `{` in turn until the rest of
/// the output is one complete document.
pub fn parse_stats(stdout: &str) -> Result<BundleStats, BundlerError> {
    let mut last_error = None;
    let mut parsed = None;
    for (start, _) in stdout.match_indices('{') {
        match serde_json::from_str::<RawStats>(&stdout[start..]) {
            Ok(raw) => {
                parsed = Some(raw);
                break;
            }
            Err(e) => last_error = Some(e.to_string()),
        }
    }
    let raw = parsed.ok_or_else(|| {
        BundlerError::InvalidStats(
            last_error.unwrap_or_else(|| "no JSON document on stdout".to_string()),
        )
    })?;

    let errors: Vec<String> = raw.errors.into_iter().map(RawMessage::render).collect();
    let warnings: Vec<String> = raw.warnings.into_iter().map(RawMessage::render).collect();

    let mut output = String::new();
    if let Some(hash) = &raw.hash {
        let _ = writeln!(output, "Hash: {hash}");
    }
    if let Some(time) = raw.time {
        let _ = writeln!(output, "Time: {time}ms");
    }
    for asset in &raw.assets {
        let _ = writeln!(output, "  {}  {} bytes", asset.name, asset.size);
    }
    for error in &errors {
        let _ = writeln!(output, "\nERROR in {error}");
    }
    for warning in &warnings {
        let _ = writeln!(output, "\nWARNING in {warning}");
    }

    Ok(BundleStats {
        errors,
        warnings,
        output: output.trim_end().to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
