//! The merged `bc.json` configuration record.
//!
//! [`ExerciseConfig`] is what the config resolver hands to every other part
//! of the runner.  It is assembled from three sources, later ones winning:
//!
//! 1. The JSON file found on disk.
//! 2. The defaults of the project language (see [`crate::Language`]).
//! 3. Runtime overrides: `mode`, `editor`, and the resolved `exercisesPath`.
//!
//! Keys the runner does not know about are kept in [`ExerciseConfig::extra`]
//! so that writing the index back never drops a course author's custom settings.
//!
//! # Example file
//!
//! ```json
//! {
//!     "language": "vanillajs",
//!     "address": "localhost",
//!     "port": 8080,
//!     "exercises": []
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::exercise::Exercise;
use crate::domain::language::Language;

/// Where the exercises live relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Exercises are published in `<root>/exercises`.
    Exercises,
    /// Exercises are bundled with the tool in `<root>/.breathecode/exercises`.
    #[default]
    Standalone,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exercises => "exercises",
            Self::Standalone => "standalone",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exercises" => Ok(Self::Exercises),
            "standalone" => Ok(Self::Standalone),
            other => Err(format!("unknown mode '{other}' (expected exercises or standalone)")),
        }
    }
}

/// Project configuration after defaults and runtime overrides are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseConfig {
    /// Language identifier, e.g. `"vanillajs"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Legacy name of the language field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
    /// Folder (relative to the project root) the preview is built into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// URL path the preview is served under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    /// Host of the dev server the preview connects back to.
    #[serde(default = "default_address")]
    pub address: String,
    /// Port of the dev server the preview connects back to.  Accepts a
    /// number or a numeric string.
    #[serde(default = "default_port", deserialize_with = "port_from_number_or_string")]
    pub port: u16,
    /// Optional custom HTML template for the preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Files whose name matches this pattern are hidden from the student.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises_path: Option<String>,
    /// Indexed exercises, in directory scan order.
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Keys not modelled above, written back verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_address() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8080
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid port '{text}'"))),
    }
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        Self {
            language: None,
            compiler: None,
            output_path: None,
            public_path: None,
            address: default_address(),
            port: default_port(),
            template: None,
            ignore_regex: None,
            mode: None,
            editor: None,
            exercises_path: None,
            exercises: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl ExerciseConfig {
    /// The raw language key: `language`, falling back to `compiler`.
    pub fn language_key(&self) -> Option<&str> {
        self.language.as_deref().or(self.compiler.as_deref())
    }

    /// The language table entry for [`language_key`](Self::language_key).
    pub fn language(&self) -> Option<Language> {
        self.language_key().and_then(Language::from_id)
    }

    /// First exercise whose slug equals `slug`.
    pub fn find_exercise(&self, slug: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|ex| ex.slug == slug)
    }

    pub fn find_exercise_mut(&mut self, slug: &str) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|ex| ex.slug == slug)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
