//! Exercises and exercise files.
//!
//! An [`Exercise`] is one directory-backed coding task.  The index builder
//! creates one record per sub-folder of the exercises root; afterwards only
//! the `status` and `completed_at` fields change.
//!
//! An [`ExerciseFile`] is a transient listing entry computed on demand and
//! never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress of a student on one exercise.
///
/// Serialized in kebab-case (`"pending"`, `"in-progress"`, ...) to stay
/// compatible with existing `bc.json` files.  Statuses written by other tools
/// are kept verbatim in [`ExerciseStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExerciseStatus {
    /// Freshly indexed, never opened.
    #[default]
    Pending,
    /// Opened or compiled at least once.
    InProgress,
    /// Tests passed.
    Completed,
    /// Last test run failed.
    Failed,
    /// A status this runner does not assign itself.
    Other(String),
}

impl ExerciseStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ExerciseStatus {
    fn from(name: String) -> Self {
        match name.as_str() {
            "pending" => Self::Pending,
            "in-progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(name),
        }
    }
}

impl From<ExerciseStatus> for String {
    fn from(status: ExerciseStatus) -> Self {
        match status {
            ExerciseStatus::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Parses the statuses a user may set from the command line.
///
/// Unlike deserialization, unknown names are rejected here.
impl std::str::FromStr for ExerciseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.to_string()) {
            Self::Other(other) => Err(format!(
                "unknown exercise status '{other}' (expected pending, in-progress, completed or failed)"
            )),
            known => Ok(known),
        }
    }
}

/// One indexed exercise as stored in the `exercises` array of `bc.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ExerciseRecord")]
pub struct Exercise {
    /// Folder name relative to the exercises root, e.g. `"01-intro"`.
    pub slug: String,
    /// Display title.  Defaults to the slug.
    pub title: String,
    /// Absolute path of the exercise folder.
    pub path: String,
    /// When the status last changed through a status update.
    pub completed_at: Option<DateTime<Utc>>,
    pub status: ExerciseStatus,
}

/// On-disk shape of an [`Exercise`]; only `slug` and `path` are required.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExerciseRecord {
    slug: String,
    #[serde(default)]
    title: Option<String>,
    path: String,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    status: ExerciseStatus,
}

impl From<ExerciseRecord> for Exercise {
    fn from(record: ExerciseRecord) -> Self {
        Self {
            title: record.title.unwrap_or_else(|| record.slug.clone()),
            slug: record.slug,
            path: record.path,
            completed_at: record.completed_at,
            status: record.status,
        }
    }
}

impl Exercise {
    /// Creates a pending exercise record for the folder `slug` located at `path`.
    pub fn pending(slug: impl Into<String>, path: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            title: slug.clone(),
            slug,
            path: path.into(),
            completed_at: None,
            status: ExerciseStatus::Pending,
        }
    }

    /// Records a new status and stamps `completed_at` with `at`.
    pub fn mark(&mut self, status: ExerciseStatus, at: DateTime<Utc>) {
        self.status = status;
        self.completed_at = Some(at);
    }
}

/// A directory entry of an exercise folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFile {
    /// Path of the entry (exercise path joined with the name).
    pub path: String,
    /// Bare file name.
    pub name: String,
}

impl ExerciseFile {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

// ── File visibility and ordering ──────────────────────────────────────────────

/// Display rank of well-known file names.  Lower ranks are listed first;
/// names not in the table are listed after every ranked name.
pub fn file_priority(name: &str) -> Option<u8> {
    match name {
        "index.html" => Some(1),
        "styles.css" | "styles.scss" | "style.css" | "style.scss" | "index.css"
        | "index.scss" => Some(2),
        "index.js" => Some(3),
        _ => None,
    }
}

/// Returns `true` if a test runner would treat `name` as a test file.
pub fn is_test_file(name: &str) -> bool {
    name.contains("test.") || name.contains("tests.")
}

/// Returns `true` if a plain file named `name` should be shown to the student.
///
/// Hidden are test files, the exercise `README.md`, and anything starting
/// with an underscore.  Directories and `ignoreRegex` matches are filtered by
/// the caller, which knows about the file system and the configuration.
pub fn is_student_visible(name: &str) -> bool {
    !is_test_file(name) && name != "README.md" && !name.starts_with('_')
}

/// Sorts `files` by [`file_priority`].  Equal ranks keep their input order.
pub fn sort_by_priority(files: &mut [ExerciseFile]) {
    files.sort_by_key(|f| file_priority(&f.name).unwrap_or(u8::MAX));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[ExerciseFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_pending_exercise_uses_slug_as_title() {
        let ex = Exercise::pending("01-intro", "/tmp/exercises/01-intro");

        assert_eq!(ex.title, "01-intro");
        assert_eq!(ex.status, ExerciseStatus::Pending);
        assert!(ex.completed_at.is_none());
    }

    #[test]
    fn test_mark_sets_status_and_timestamp() {
        // Arrange
        let mut ex = Exercise::pending("01-intro", "/x");
        let now = Utc::now();

        // Act
        ex.mark(ExerciseStatus::Completed, now);

        // Assert
        assert_eq!(ex.status, ExerciseStatus::Completed);
        assert_eq!(ex.completed_at, Some(now));
    }

    #[test]
    fn test_exercise_serializes_with_camel_case_and_null_timestamp() {
        let ex = Exercise::pending("01-intro", "/x/01-intro");

        let json = serde_json::to_value(&ex).expect("serialize");

        assert_eq!(json["status"], "pending");
        assert!(json["completedAt"].is_null());
        assert_eq!(json["slug"], "01-intro");
    }

    #[test]
    fn test_status_wire_names_match_from_str() {
        for status in [
            ExerciseStatus::Pending,
            ExerciseStatus::InProgress,
            ExerciseStatus::Completed,
            ExerciseStatus::Failed,
        ] {
            let parsed: ExerciseStatus = status.as_str().parse().expect("parse");
            assert_eq!(parsed, status);
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_unknown_status_is_rejected_from_the_command_line() {
        assert!("done".parse::<ExerciseStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim_in_json() {
        // Arrange
        let json = r#"{"slug":"01-a","path":"/p","status":"done"}"#;

        // Act
        let ex: Exercise = serde_json::from_str(json).expect("deserialize");
        let back = serde_json::to_value(&ex).expect("serialize");

        // Assert
        assert_eq!(ex.status, ExerciseStatus::Other("done".to_string()));
        assert_eq!(back["status"], "done");
    }

    #[test]
    fn test_missing_title_defaults_to_slug() {
        let ex: Exercise =
            serde_json::from_str(r#"{"slug":"02-vars","path":"/p"}"#).expect("deserialize");

        assert_eq!(ex.title, "02-vars");
    }

    #[test]
    fn test_explicit_title_is_kept() {
        let ex: Exercise = serde_json::from_str(r#"{"slug":"02-vars","title":"Variables","path":"/p"}"#)
            .expect("deserialize");

        assert_eq!(ex.title, "Variables");
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let json = r#"{"slug":"01-a","title":"01-a","path":"/p"}"#;

        let ex: Exercise = serde_json::from_str(json).expect("deserialize");

        assert_eq!(ex.status, ExerciseStatus::Pending);
        assert!(ex.completed_at.is_none());
    }

    #[test]
    fn test_student_visibility_rules() {
        assert!(is_student_visible("index.js"));
        assert!(is_student_visible("notes.txt"));
        assert!(!is_student_visible("test.js"));
        assert!(!is_student_visible("tests.py"));
        assert!(!is_student_visible("app.test.js"));
        assert!(!is_student_visible("README.md"));
        assert!(!is_student_visible("_solution.js"));
    }

    #[test]
    fn test_sort_by_priority_puts_html_then_styles_then_js_then_rest() {
        // Arrange
        let mut files: Vec<ExerciseFile> = ["notes.txt", "index.js", "styles.css", "index.html"]
            .iter()
            .map(|n| ExerciseFile::new(format!("/ex/{n}"), *n))
            .collect();

        // Act
        sort_by_priority(&mut files);

        // Assert
        assert_eq!(names(&files), ["index.html", "styles.css", "index.js", "notes.txt"]);
    }

    #[test]
    fn test_sort_by_priority_keeps_scan_order_for_unranked_files() {
        let mut files: Vec<ExerciseFile> = ["b.txt", "a.txt", "index.js", "c.txt"]
            .iter()
            .map(|n| ExerciseFile::new(*n, *n))
            .collect();

        sort_by_priority(&mut files);

        assert_eq!(names(&files), ["index.js", "b.txt", "a.txt", "c.txt"]);
    }
}
