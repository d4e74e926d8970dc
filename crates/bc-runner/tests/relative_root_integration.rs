//! Resolving a project from a relative root.
//!
//! This file holds a single test because it changes the process working
//! directory, which every test in the same binary would observe.

use std::path::Path;

use bc_core::Mode;
use bc_runner::infrastructure::storage::{ConfigResolver, ResolveOptions};

#[test]
fn test_index_built_from_dot_root_records_absolute_paths() {
    // Arrange: a project in exercises mode, entered with `cd`
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("bc.json"), r#"{"language":"node"}"#).expect("write");
    std::fs::create_dir_all(dir.path().join("exercises/01-intro")).expect("mkdir");
    std::fs::write(dir.path().join("exercises/01-intro/app.js"), "").expect("write");
    let previous = std::env::current_dir().expect("cwd");
    std::env::set_current_dir(dir.path()).expect("cd");

    // Act
    let mut resolver = ConfigResolver::resolve(
        ".",
        ResolveOptions {
            mode: Mode::Exercises,
            ..ResolveOptions::default()
        },
    )
    .expect("resolve");
    let _pending = resolver.build_index().expect("build");
    std::env::set_current_dir(&previous).expect("cd back");

    // Assert: lookups keep working after leaving the project folder
    assert!(resolver.root().is_absolute());
    let exercise = &resolver.exercises()[0];
    assert!(Path::new(&exercise.path).is_absolute(), "{}", exercise.path);
    assert!(!exercise.path.contains("/./"));
    let files = resolver.get_exercise_details("01-intro").expect("details");
    assert_eq!(files.len(), 1);
    assert!(Path::new(&files[0].path).is_file());
}
