//! `bc` command-line entry point.
//!
//! Resolves the project configuration once, then runs a single subcommand.
//!
//! # Output channels
//!
//! ```text
//! stdout  ── command results, and one JSON object per line for build/test
//!            events ({"event":"compiler-success","payload":[...]})
//! stderr  ── tracing logs (RUST_LOG, or --verbose for debug)
//! ```
//!
//! The process exits with status 1 when a command fails or when any error
//! event was reported.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bc_core::{ExerciseStatus, Mode};
use bc_runner::application::compile_exercise::{CompileExerciseUseCase, CompileRequest};
use bc_runner::application::prepare_tests::{prepare, run_tests};
use bc_runner::infrastructure::activity::TracingActivity;
use bc_runner::infrastructure::bundler::webpack::WebpackCli;
use bc_runner::infrastructure::channel::JsonLinesChannel;
use bc_runner::infrastructure::formatter::PrettierCli;
use bc_runner::infrastructure::storage::{ConfigResolver, FileContents, ResolveOptions};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Local runner for coding exercises.
#[derive(Debug, Parser)]
#[command(name = "bc", about = "Index, preview and test coding exercises", version)]
struct Cli {
    /// Project root holding `bc.json` and the exercises.
    #[arg(long, default_value = ".", env = "BC_ROOT", global = true)]
    root: PathBuf,

    /// Where the exercises live: `exercises` or `standalone`.
    #[arg(long, default_value = "standalone", env = "BC_MODE", global = true)]
    mode: Mode,

    /// Editor recorded in the configuration.
    #[arg(long, env = "BC_EDITOR", global = true)]
    editor: Option<String>,

    /// Overrides the language declared in `bc.json`.
    #[arg(long, env = "BC_LANGUAGE", global = true)]
    language: Option<String>,

    /// Folder holding the `webpack.config.<language>.js` files.
    #[arg(long, default_value = "webpack", env = "BC_WEBPACK_CONFIGS", global = true)]
    webpack_configs: PathBuf,

    /// `node_modules` folder the test toolchain is installed in.
    #[arg(long, default_value = "node_modules", env = "BC_NODE_MODULES", global = true)]
    node_modules: PathBuf,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild the exercise index from the exercises folder.
    Index,
    /// List indexed exercises with their status.
    List,
    /// Print the README of an exercise, or of the project.
    Readme { slug: Option<String> },
    /// List the files of an exercise.
    Files {
        slug: String,
        /// Include tests, READMEs and hidden files.
        #[arg(long)]
        all: bool,
    },
    /// Print one file of an exercise.
    Cat { slug: String, name: String },
    /// Print a shared asset from `_assets`.
    Asset { name: String },
    /// Overwrite an existing exercise file with the contents of another file.
    Save {
        slug: String,
        name: String,
        source_file: PathBuf,
    },
    /// Set the status of an exercise and save the configuration.
    Status { slug: String, status: ExerciseStatus },
    /// Build the browser preview of an exercise.
    Build { slug: String },
    /// Print the jest command of an exercise, or run it with `--run`.
    Test {
        slug: String,
        #[arg(long)]
        run: bool,
    },
}

impl Cli {
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            mode: self.mode,
            editor: self.editor.clone(),
            language: self.language.clone(),
        }
    }

    fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut resolver = ConfigResolver::resolve(&cli.root, cli.resolve_options())
        .with_context(|| format!("failed to load the project at {}", cli.root.display()))?;
    debug!("exercises folder: {}", resolver.exercises_path().display());

    let (printed, code) = run(cli, &mut resolver).await?;
    printed.emit(&mut std::io::stdout().lock())?;
    Ok(code)
}

/// What a command prints to stdout once its work is done.
///
/// Commands build this value instead of writing as they go, so stdout is
/// only locked after the last `.await`.  Build and test events stream
/// through [`JsonLinesChannel`] and print nothing here.
#[derive(Debug, Default, PartialEq, Eq)]
enum Printed {
    #[default]
    Nothing,
    Lines(Vec<String>),
    Bytes(Vec<u8>),
}

impl Printed {
    fn emit(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Self::Nothing => Ok(()),
            Self::Lines(lines) => lines.iter().try_for_each(|line| writeln!(out, "{line}")),
            Self::Bytes(bytes) => out.write_all(bytes),
        }?;
        out.flush()
    }
}

async fn run(cli: Cli, resolver: &mut ConfigResolver) -> anyhow::Result<(Printed, ExitCode)> {
    let printed = match cli.command {
        Command::Index => {
            let pending = resolver.build_index()?;
            let path = pending.path().to_path_buf();
            pending
                .write()
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("exercise index written to {}", path.display());
            Printed::Lines(resolver.exercises().iter().map(|e| e.slug.clone()).collect())
        }
        Command::List => Printed::Lines(
            resolver
                .exercises()
                .iter()
                .map(|e| format!("{}\t{}", e.slug, e.status))
                .collect(),
        ),
        Command::Readme { slug } => {
            Printed::Bytes(resolver.get_readme(slug.as_deref())?.into_bytes())
        }
        Command::Files { slug, all } => {
            let files = if all {
                resolver.get_all_files(&slug)?
            } else {
                resolver.get_exercise_details(&slug)?
            };
            Printed::Lines(vec![serde_json::to_string_pretty(&files)?])
        }
        Command::Cat { slug, name } => match resolver.get_file(&slug, &name)? {
            FileContents::File(bytes) => Printed::Bytes(bytes),
            FileContents::Directory(message) => Printed::Lines(vec![message]),
        },
        Command::Asset { name } => Printed::Bytes(resolver.get_asset(&name)?),
        Command::Save {
            slug,
            name,
            source_file,
        } => {
            let content = tokio::fs::read(&source_file)
                .await
                .with_context(|| format!("failed to read {}", source_file.display()))?;
            resolver.save_file(&slug, &name, content)?;
            info!("saved {name} of exercise {slug}");
            Printed::Nothing
        }
        Command::Status { slug, status } => {
            let exercise = resolver.update_exercise_status(&slug, status)?.clone();
            resolver.save().await?;
            Printed::Lines(vec![serde_json::to_string_pretty(&exercise)?])
        }
        Command::Build { slug } => {
            let files = resolver.get_exercise_details(&slug)?;
            let compiler = CompileExerciseUseCase::new(
                Box::new(WebpackCli::default()),
                Box::new(PrettierCli::default()),
                Box::new(TracingActivity),
                &cli.webpack_configs,
            );
            let channel = JsonLinesChannel::stdout();
            compiler
                .compile(
                    CompileRequest {
                        files: &files,
                        config: resolver.config(),
                        working_dir: resolver.root(),
                    },
                    &channel,
                )
                .await;
            return Ok((Printed::Nothing, exit_code(!channel.saw_error())));
        }
        Command::Test { slug, run } => {
            let plan = prepare(resolver.get_all_files(&slug)?, &cli.node_modules);
            plan.validate()?;
            if !run {
                return Ok((Printed::Lines(vec![plan.command().await?]), ExitCode::SUCCESS));
            }

            let channel = JsonLinesChannel::stdout();
            let passed = run_tests(&plan, resolver.root(), &channel).await?;
            let status = if passed {
                ExerciseStatus::Completed
            } else {
                ExerciseStatus::Failed
            };
            resolver.update_exercise_status(&slug, status)?;
            resolver.save().await?;
            return Ok((Printed::Nothing, exit_code(passed)));
        }
    };

    Ok((printed, ExitCode::SUCCESS))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
