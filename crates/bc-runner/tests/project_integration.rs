//! Integration tests for project resolution and the exercise index.
//!
//! Each test builds a scratch project tree on disk and drives the public
//! [`ConfigResolver`] API end to end: resolve, build the index, write it, and
//! read the configuration back.

use std::path::Path;

use bc_core::{ExerciseConfig, ExerciseStatus, Mode};
use bc_runner::infrastructure::storage::{
    ConfigError, ConfigResolver, FileContents, ResolveOptions,
};

/// Creates a standalone-mode project with the given exercise folders.
fn project(json: &str, exercises: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path().join(".breathecode/exercises");
    std::fs::create_dir_all(&base).expect("mkdir");
    std::fs::write(dir.path().join("bc.json"), json).expect("write config");
    for name in exercises {
        std::fs::create_dir_all(base.join(name)).expect("mkdir exercise");
    }
    dir
}

fn resolve(root: &Path) -> ConfigResolver {
    ConfigResolver::resolve(root, ResolveOptions::default()).expect("resolve")
}

fn read_config(root: &Path) -> ExerciseConfig {
    let raw = std::fs::read_to_string(root.join("bc.json")).expect("read config");
    serde_json::from_str(&raw).expect("parse config")
}

#[test]
fn test_invalid_folder_aborts_index_without_writing() {
    // Arrange
    let json = r#"{"language":"vanillajs"}"#;
    let dir = project(json, &["01-intro", "02.1-loops", "bad name"]);
    let mut resolver = resolve(dir.path());

    // Act
    let result = resolver.build_index();

    // Assert
    match result {
        Err(ConfigError::InvalidExerciseName { name }) => assert_eq!(name, "bad name"),
        other => panic!("expected InvalidExerciseName, got {other:?}"),
    }
    assert!(resolver.exercises().is_empty());
    let on_disk = std::fs::read_to_string(dir.path().join("bc.json")).expect("read");
    assert_eq!(on_disk, json);
}

#[tokio::test]
async fn test_index_write_lists_pending_exercises_in_scan_order() {
    // Arrange
    let dir = project(r#"{"language":"vanillajs"}"#, &["02-vars", "01-intro"]);
    let mut resolver = resolve(dir.path());

    // Act
    resolver.build_index().expect("build").write().await.expect("write");

    // Assert
    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("bc.json")).expect("read"),
    )
    .expect("json");
    let exercises = raw["exercises"].as_array().expect("array");
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["slug"], "01-intro");
    assert_eq!(exercises[1]["slug"], "02-vars");
    for exercise in exercises {
        assert_eq!(exercise["status"], "pending");
        assert!(exercise["completedAt"].is_null());
    }
}

#[tokio::test]
async fn test_index_round_trips_through_the_config_file() {
    // Arrange
    let dir = project(r#"{"language":"html","title":"Web 101"}"#, &["01-intro", "02-vars"]);
    let mut resolver = resolve(dir.path());

    // Act
    resolver.build_index().expect("build").write().await.expect("write");
    let reloaded = resolve(dir.path());

    // Assert
    assert_eq!(reloaded.exercises(), resolver.exercises());
    assert_eq!(read_config(dir.path()).exercises, resolver.config().exercises);
    assert_eq!(
        reloaded.config().extra.get("title").and_then(|v| v.as_str()),
        Some("Web 101")
    );
}

#[tokio::test]
async fn test_index_file_is_indented_with_four_spaces() {
    let dir = project(r#"{"language":"node"}"#, &["01-intro"]);
    let mut resolver = resolve(dir.path());

    resolver.build_index().expect("build").write().await.expect("write");

    let raw = std::fs::read_to_string(dir.path().join("bc.json")).expect("read");
    assert!(raw.contains("\n    \"language\": \"node\""));
}

#[test]
fn test_exercise_details_hide_tests_and_readme() {
    // Arrange
    let dir = project(r#"{"language":"node"}"#, &["01-intro"]);
    let base = dir.path().join(".breathecode/exercises/01-intro");
    for name in ["index.html", "index.js", "notes.txt", "test.js", "README.md"] {
        std::fs::write(base.join(name), "").expect("write");
    }
    let mut resolver = resolve(dir.path());
    let _pending = resolver.build_index().expect("build");

    // Act
    let files = resolver.get_exercise_details("01-intro").expect("details");

    // Assert
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["index.html", "index.js", "notes.txt"]);
}

#[test]
fn test_save_file_never_creates_files() {
    // Arrange
    let dir = project(r#"{"language":"node"}"#, &["01-intro"]);
    let mut resolver = resolve(dir.path());
    let _pending = resolver.build_index().expect("build");

    // Act
    let result = resolver.save_file("01-intro", "new.js", "console.log(1)");

    // Assert
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    assert!(!dir.path().join(".breathecode/exercises/01-intro/new.js").exists());
}

#[test]
fn test_get_file_on_directory_returns_message() {
    let dir = project(r#"{"language":"node"}"#, &["01-intro"]);
    std::fs::create_dir(dir.path().join(".breathecode/exercises/01-intro/assets"))
        .expect("mkdir");
    let mut resolver = resolve(dir.path());
    let _pending = resolver.build_index().expect("build");

    let contents = resolver.get_file("01-intro", "assets").expect("contents");

    assert!(matches!(
        contents,
        FileContents::Directory(message) if message.starts_with("Error: This is not a file")
    ));
}

#[tokio::test]
async fn test_status_update_is_persisted() {
    // Arrange
    let dir = project(r#"{"language":"node"}"#, &["01-intro", "02-vars"]);
    let mut resolver = resolve(dir.path());
    resolver.build_index().expect("build").write().await.expect("write");

    // Act
    resolver
        .update_exercise_status("02-vars", ExerciseStatus::Completed)
        .expect("update");
    resolver.save().await.expect("save");

    // Assert
    let saved = read_config(dir.path());
    let vars = saved.find_exercise("02-vars").expect("exercise");
    assert_eq!(vars.status, ExerciseStatus::Completed);
    assert!(vars.completed_at.is_some());
    assert_eq!(saved.exercises[0].status, ExerciseStatus::Pending);
    assert_eq!(saved.mode, Some(Mode::Standalone));
}

#[test]
fn test_exercises_mode_requires_top_level_folder() {
    let dir = project(r#"{"language":"node"}"#, &[]);

    let result = ConfigResolver::resolve(
        dir.path(),
        ResolveOptions {
            mode: Mode::Exercises,
            ..ResolveOptions::default()
        },
    );

    assert!(matches!(
        result,
        Err(ConfigError::ExercisesPathMissing { mode: Mode::Exercises, .. })
    ));
}

// ── Exercise and project file access ─────────────────────────────────────────

/// Standalone project with one indexed exercise holding `files`.
fn indexed(json: &str, files: &[(&str, &str)]) -> (tempfile::TempDir, ConfigResolver) {
    let dir = project(json, &["01-intro"]);
    let base = dir.path().join(".breathecode/exercises/01-intro");
    for (name, body) in files {
        std::fs::write(base.join(name), body).expect("write");
    }
    let mut resolver = resolve(dir.path());
    let _pending = resolver.build_index().expect("build");
    (dir, resolver)
}

fn sorted_names(files: &[bc_core::ExerciseFile]) -> Vec<&str> {
    let mut names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    names.sort_unstable();
    names
}

#[test]
fn test_readme_of_exercise_and_project() {
    // Arrange
    let (dir, resolver) = indexed(r#"{"language":"node"}"#, &[("README.md", "# Intro")]);
    std::fs::write(dir.path().join("README.md"), "# Course").expect("write");

    // Act
    let exercise = resolver.get_readme(Some("01-intro")).expect("exercise readme");
    let course = resolver.get_readme(None).expect("project readme");

    // Assert
    assert_eq!(exercise, "# Intro");
    assert_eq!(course, "# Course");
}

#[test]
fn test_readme_missing_in_exercise() {
    let (_dir, resolver) = indexed(r#"{"language":"node"}"#, &[("app.js", "")]);

    let result = resolver.get_readme(Some("01-intro"));

    assert!(matches!(
        result,
        Err(ConfigError::ReadmeNotFound(path)) if path.ends_with("01-intro/README.md")
    ));
}

#[test]
fn test_readme_of_unknown_exercise() {
    let (_dir, resolver) = indexed(r#"{"language":"node"}"#, &[]);

    let result = resolver.get_readme(Some("99-nope"));

    assert!(matches!(result, Err(ConfigError::ExerciseNotFound(slug)) if slug == "99-nope"));
}

#[test]
fn test_get_asset_reads_from_assets_folder() {
    // Arrange
    let (dir, resolver) = indexed(r#"{"language":"node"}"#, &[]);
    std::fs::create_dir(dir.path().join("_assets")).expect("mkdir");
    std::fs::write(dir.path().join("_assets/logo.png"), [0x89, b'P', b'N', b'G']).expect("write");

    // Act
    let bytes = resolver.get_asset("logo.png").expect("asset");
    let missing = resolver.get_asset("banner.png");

    // Assert
    assert_eq!(bytes, [0x89, b'P', b'N', b'G']);
    assert!(matches!(
        missing,
        Err(ConfigError::AssetNotFound(path)) if path.ends_with("_assets/banner.png")
    ));
}

#[test]
fn test_get_file_returns_bytes_or_not_found() {
    let (_dir, resolver) =
        indexed(r#"{"language":"node"}"#, &[("app.js", "console.log('hi')")]);

    let contents = resolver.get_file("01-intro", "app.js").expect("contents");
    let missing = resolver.get_file("01-intro", "other.js");

    assert_eq!(contents, FileContents::File(b"console.log('hi')".to_vec()));
    assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_all_files_include_tests_and_readme() {
    // Arrange
    let (_dir, resolver) = indexed(
        r#"{"language":"node"}"#,
        &[("app.js", ""), ("test.js", ""), ("README.md", ""), ("_solution.js", "")],
    );

    // Act
    let all = resolver.get_all_files("01-intro").expect("all files");
    let visible = resolver.get_exercise_details("01-intro").expect("details");

    // Assert
    assert_eq!(sorted_names(&all), ["README.md", "_solution.js", "app.js", "test.js"]);
    assert_eq!(sorted_names(&visible), ["app.js"]);
}

#[test]
fn test_exercise_details_skip_underscored_files_and_folders() {
    // Arrange
    let (dir, resolver) = indexed(
        r#"{"language":"node"}"#,
        &[("app.js", ""), ("_solution.js", ""), ("notes.txt", "")],
    );
    std::fs::create_dir(dir.path().join(".breathecode/exercises/01-intro/lib")).expect("mkdir");

    // Act
    let files = resolver.get_exercise_details("01-intro").expect("details");

    // Assert
    assert_eq!(sorted_names(&files), ["app.js", "notes.txt"]);
    assert!(files.iter().all(|f| Path::new(&f.path).is_file()));
}

#[test]
fn test_html_default_ignore_regex_hides_scripts() {
    // Arrange: html projects inherit the `\.js$` ignore pattern
    let (_dir, resolver) = indexed(
        r#"{"language":"html"}"#,
        &[("index.html", ""), ("index.js", ""), ("styles.css", "")],
    );

    // Act
    let files = resolver.get_exercise_details("01-intro").expect("details");

    // Assert
    assert_eq!(resolver.config().ignore_regex.as_deref(), Some(r"\.js$"));
    assert_eq!(sorted_names(&files), ["index.html", "styles.css"]);
}

#[test]
fn test_configured_ignore_regex_hides_matching_files() {
    let (_dir, resolver) = indexed(
        r#"{"language":"node","ignoreRegex":"\\.txt$"}"#,
        &[("app.js", ""), ("notes.txt", "")],
    );

    let files = resolver.get_exercise_details("01-intro").expect("details");

    assert_eq!(sorted_names(&files), ["app.js"]);
}
