//! CompileExerciseUseCase: builds the browser preview of one exercise.
//!
//! The use case never returns an error.  Every outcome is reported through
//! the [`ReportingChannel`]:
//!
//! ```text
//! no bundler profile / config ──► internal-error
//! HTML formatting failed      ──► compiler-error   (Line: <n> <message>)
//! otherwise                   ──► compiling, then one of
//!                                   compiler-error   (+ exercise_error activity)
//!                                   compiler-warning
//!                                   compiler-success
//! ```
//!
//! An exercise without files is still bundled: the build then holds only
//! the dev-server client, and the outcome is reported as usual.
//!
//! The bundler, formatter and activity tracker are injected, so the whole
//! flow runs in tests without node tooling installed.

use std::path::{Path, PathBuf};

use bc_core::{ChannelEvent, ExerciseConfig, ExerciseFile, Language};
use tracing::{debug, info, warn};

use crate::infrastructure::activity::{ActivityDetails, ActivityTracker, EXERCISE_ERROR};
use crate::infrastructure::bundler::{BundleRequest, Bundler};
use crate::infrastructure::channel::ReportingChannel;
use crate::infrastructure::formatter::{FormatError, HtmlFormatter};

/// Output folder used when the project configures none.
pub const DEFAULT_OUTPUT_PATH: &str = ".breathecode/dist";

/// Inputs of a single compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    /// The exercise's files, as returned by the resolver.
    pub files: &'a [ExerciseFile],
    pub config: &'a ExerciseConfig,
    /// Project root; the output folder and template are relative to it.
    pub working_dir: &'a Path,
}

/// Compiles exercises with webpack.
pub struct CompileExerciseUseCase {
    bundler: Box<dyn Bundler>,
    formatter: Box<dyn HtmlFormatter>,
    activity: Box<dyn ActivityTracker>,
    /// Folder holding the `webpack.config.<language>.js` files.
    bundler_configs: PathBuf,
}

impl CompileExerciseUseCase {
    pub fn new(
        bundler: Box<dyn Bundler>,
        formatter: Box<dyn HtmlFormatter>,
        activity: Box<dyn ActivityTracker>,
        bundler_configs: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bundler,
            formatter,
            activity,
            bundler_configs: bundler_configs.into(),
        }
    }

    /// Builds the preview described by `request`, reporting to `channel`.
    pub async fn compile(&self, request: CompileRequest<'_>, channel: &dyn ReportingChannel) {
        if request.files.is_empty() {
            debug!("no exercise files, bundling the dev-server client only");
        }

        let language_key = request.config.language_key().unwrap_or_default();
        let language = request.config.language();
        let Some(config_file) = language
            .and_then(Language::bundler_profile)
            .map(|profile| self.bundler_configs.join(profile.config_file_name()))
            .filter(|path| path.is_file())
        else {
            channel.log(
                ChannelEvent::InternalError,
                vec![format!("Unknown config for webpack and {language_key}")],
            );
            return;
        };

        let output_path = request
            .config
            .output_path
            .as_deref()
            .unwrap_or(DEFAULT_OUTPUT_PATH);
        let output_dir = request.working_dir.join(output_path);

        if language.is_some_and(Language::formats_html) {
            let errors = self.format_html_files(request.files, &output_dir).await;
            if !errors.is_empty() {
                channel.log(
                    ChannelEvent::CompilerError,
                    errors.iter().map(ToString::to_string).collect(),
                );
                return;
            }
        }

        let bundle = BundleRequest {
            config_file,
            entries: entries(request.files, request.config),
            output_path: output_dir,
            public_path: request.config.public_path.clone().unwrap_or_default(),
            content_base: output_path.to_string(),
            html_template: self.template(request.config, request.working_dir),
            working_dir: request.working_dir.to_path_buf(),
        };

        channel.log(ChannelEvent::Compiling, vec!["Compiling...".to_string()]);
        let stats = match self.bundler.run(&bundle).await {
            Ok(stats) => stats,
            Err(e) => {
                let message = e.to_string();
                self.track_failure(language_key, &message);
                channel.log(ChannelEvent::CompilerError, vec![message]);
                return;
            }
        };

        if stats.has_errors() {
            self.track_failure(language_key, &stats.errors.join("\n"));
            channel.log(ChannelEvent::CompilerError, vec![stats.output]);
        } else if stats.has_warnings() {
            channel.log(ChannelEvent::CompilerWarning, vec![stats.output]);
        } else {
            channel.log(ChannelEvent::CompilerSuccess, vec![stats.output]);
        }
    }

    /// Resolves the configured template, falling back to the bundler default.
    fn template(&self, config: &ExerciseConfig, working_dir: &Path) -> Option<PathBuf> {
        let template = config.template.as_deref()?;
        let path = working_dir.join(template);
        if path.is_file() {
            info!("compiling with custom template {}", path.display());
            Some(path)
        } else {
            warn!("template not found: {}", path.display());
            info!("check the \"template\" property of bc.json or remove it to use the default");
            None
        }
    }

    /// Reformats every `.html` file in place and copies it into `output_dir`.
    ///
    /// Returns one [`FormatError`] per file that could not be formatted or
    /// written.
    async fn format_html_files(
        &self,
        files: &[ExerciseFile],
        output_dir: &Path,
    ) -> Vec<FormatError> {
        let mut errors = Vec::new();
        for file in files.iter().filter(|f| f.name.ends_with(".html")) {
            if let Err(e) = self.format_one(file, output_dir).await {
                warn!("could not format {}: {e}", file.path);
                errors.push(e);
            }
        }
        errors
    }

    async fn format_one(&self, file: &ExerciseFile, output_dir: &Path) -> Result<(), FormatError> {
        let io_err = |e: std::io::Error| FormatError::new(None, format!("{}: {e}", file.path));

        let source = tokio::fs::read_to_string(&file.path).await.map_err(io_err)?;
        let formatted = self.formatter.format_html(&source).await?;
        tokio::fs::write(&file.path, &formatted).await.map_err(io_err)?;

        tokio::fs::create_dir_all(output_dir).await.map_err(io_err)?;
        tokio::fs::write(output_dir.join(&file.name), &formatted)
            .await
            .map_err(io_err)?;
        debug!("formatted {}", file.path);
        Ok(())
    }

    fn track_failure(&self, language: &str, message: &str) {
        self.activity.error(
            EXERCISE_ERROR,
            &ActivityDetails::bundler_failure(language, message),
        );
    }
}

/// Entry modules of the build: the exercise's `index.js` and `styles.css`,
/// followed by the dev-server client.
pub fn entries(files: &[ExerciseFile], config: &ExerciseConfig) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.path.contains("index.js") || f.path.contains("styles.css"))
        .map(|f| {
            if f.path.starts_with("./") || Path::new(&f.path).is_absolute() {
                f.path.clone()
            } else {
                format!("./{}", f.path)
            }
        })
        .chain(std::iter::once(format!(
            "webpack-dev-server/client?http://{}:{}",
            config.address, config.port
        )))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
