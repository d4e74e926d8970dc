//! Language table: defaults and bundler profiles per exercise language.
//!
//! Every project declares the language its exercises are written in through
//! the `language` field of `bc.json` (older files use `compiler` instead).
//! The language decides two things:
//!
//! - **Defaults** merged over the loaded configuration (output folder, public
//!   path of the preview, which files to hide from the student).
//! - **Bundler profile**: which webpack configuration builds the preview.
//!   Languages without a browser preview (Node, Python) have none.
//!
//! The table is a plain `match` so adding a language is a compile-time
//! checked change in one place.

use serde_json::{Map, Value};

/// Languages the runner knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Plain HTML + CSS, no JavaScript entry point.
    Html,
    /// HTML + CSS + vanilla JavaScript.
    VanillaJs,
    /// React components bundled with babel.
    React,
    /// Node.js console exercises.
    Node,
    /// Python 3 console exercises.
    Python3,
}

impl Language {
    /// Every known language, in declaration order.
    pub const ALL: [Language; 5] = [
        Language::Html,
        Language::VanillaJs,
        Language::React,
        Language::Node,
        Language::Python3,
    ];

    /// Parses the identifier used in `bc.json` (`"vanillajs"`, `"react"`, ...).
    ///
    /// Returns `None` for identifiers the runner has no table entry for.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "html" => Some(Self::Html),
            "vanillajs" => Some(Self::VanillaJs),
            "react" => Some(Self::React),
            "node" => Some(Self::Node),
            "python3" => Some(Self::Python3),
            _ => None,
        }
    }

    /// Identifier used in `bc.json`.
    pub fn id(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::VanillaJs => "vanillajs",
            Self::React => "react",
            Self::Node => "node",
            Self::Python3 => "python3",
        }
    }

    /// Defaults merged over the loaded configuration for this language.
    pub fn defaults(self) -> LanguageDefaults {
        match self {
            Self::Html => LanguageDefaults {
                output_path: Some(".breathecode/dist"),
                public_path: Some("/preview"),
                // HTML exercises ship helper scripts the student never edits.
                ignore_regex: Some(r"\.js$"),
            },
            Self::VanillaJs | Self::React => LanguageDefaults {
                output_path: Some(".breathecode/dist"),
                public_path: Some("/preview"),
                ignore_regex: None,
            },
            Self::Node => LanguageDefaults::default(),
            Self::Python3 => LanguageDefaults {
                ignore_regex: Some(r"\.pyc$"),
                ..LanguageDefaults::default()
            },
        }
    }

    /// Webpack profile for this language, if it has a browser preview.
    pub fn bundler_profile(self) -> Option<BundlerProfile> {
        match self {
            Self::Html | Self::VanillaJs | Self::React => Some(BundlerProfile { language: self }),
            Self::Node | Self::Python3 => None,
        }
    }

    /// Returns `true` if `.html` files must be reformatted before bundling.
    ///
    /// React previews generate their markup from JSX, so there is nothing to
    /// format.
    pub fn formats_html(self) -> bool {
        self != Self::React
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-language configuration defaults.
///
/// Only fields set to `Some` are merged; on a key collision the default wins
/// over the value loaded from `bc.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageDefaults {
    pub output_path: Option<&'static str>,
    pub public_path: Option<&'static str>,
    pub ignore_regex: Option<&'static str>,
}

impl LanguageDefaults {
    /// Overlays these defaults onto a raw `bc.json` object.
    pub fn apply(&self, doc: &mut Map<String, Value>) {
        let fields = [
            ("outputPath", self.output_path),
            ("publicPath", self.public_path),
            ("ignoreRegex", self.ignore_regex),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                doc.insert(key.to_string(), Value::String(value.to_string()));
            }
        }
    }
}

/// Identifies the webpack configuration used to build a language's preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundlerProfile {
    pub language: Language,
}

impl BundlerProfile {
    /// File name of the webpack configuration, e.g. `webpack.config.react.js`.
    pub fn config_file_name(&self) -> String {
        format!("webpack.config.{}.js", self.language.id())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
