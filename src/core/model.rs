// Linewright - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Case style
// =============================================================================

/// The fourteen case rewriting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CaseStyle {
    /// Produces an empty string. Kept as-is; see DESIGN.md.
    #[default]
    None,
    Upper,
    Lower,
    Title,
    /// Per-character simple case folding, not a case toggle.
    Reverse,
    Camel,
    Pascal,
    Snake,
    SnakeAllCaps,
    Kebab,
    SnakeCamel,
    SnakePascal,
    KebabCamel,
    KebabPascal,
}

impl CaseStyle {
    /// Returns all variants in declaration order.
    pub fn all() -> &'static [CaseStyle] {
        &[
            CaseStyle::None,
            CaseStyle::Upper,
            CaseStyle::Lower,
            CaseStyle::Title,
            CaseStyle::Reverse,
            CaseStyle::Camel,
            CaseStyle::Pascal,
            CaseStyle::Snake,
            CaseStyle::SnakeAllCaps,
            CaseStyle::Kebab,
            CaseStyle::SnakeCamel,
            CaseStyle::SnakePascal,
            CaseStyle::KebabCamel,
            CaseStyle::KebabPascal,
        ]
    }

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            CaseStyle::None => "none",
            CaseStyle::Upper => "upper",
            CaseStyle::Lower => "lower",
            CaseStyle::Title => "title",
            CaseStyle::Reverse => "reverse",
            CaseStyle::Camel => "camel",
            CaseStyle::Pascal => "pascal",
            CaseStyle::Snake => "snake",
            CaseStyle::SnakeAllCaps => "snake-all-caps",
            CaseStyle::Kebab => "kebab",
            CaseStyle::SnakeCamel => "snake-camel",
            CaseStyle::SnakePascal => "snake-pascal",
            CaseStyle::KebabCamel => "kebab-camel",
            CaseStyle::KebabPascal => "kebab-pascal",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by `CaseStyle::from_str` for names that match no style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCaseStyle(pub String);

impl fmt::Display for UnknownCaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown case style '{}'", self.0)
    }
}

impl std::error::Error for UnknownCaseStyle {}

impl FromStr for CaseStyle {
    type Err = UnknownCaseStyle;

    /// Case-insensitive; `_`, `-` and spaces are interchangeable and the
    /// historical `kehab` spelling is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let key = key.replace("kehab", "kebab");

        let style = match key.as_str() {
            "none" => CaseStyle::None,
            "upper" => CaseStyle::Upper,
            "lower" => CaseStyle::Lower,
            "title" => CaseStyle::Title,
            "reverse" => CaseStyle::Reverse,
            "camel" => CaseStyle::Camel,
            "pascal" => CaseStyle::Pascal,
            "snake" => CaseStyle::Snake,
            "snakeallcaps" => CaseStyle::SnakeAllCaps,
            "kebab" => CaseStyle::Kebab,
            "snakecamel" => CaseStyle::SnakeCamel,
            "snakepascal" => CaseStyle::SnakePascal,
            "kebabcamel" => CaseStyle::KebabCamel,
            "kebabpascal" => CaseStyle::KebabPascal,
            _ => return Err(UnknownCaseStyle(s.to_string())),
        };
        Ok(style)
    }
}

/// Case rule as resolved from configuration.
///
/// A name that does not resolve to a style is kept rather than rejected;
/// the pipeline passes such lines through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CaseSelection {
    Known(CaseStyle),
    Unrecognized(String),
}

impl Default for CaseSelection {
    fn default() -> Self {
        CaseSelection::Known(CaseStyle::default())
    }
}

impl CaseSelection {
    /// Resolve a configured name. Never fails.
    pub fn from_name(name: &str) -> Self {
        match name.parse::<CaseStyle>() {
            Ok(style) => CaseSelection::Known(style),
            Err(_) => CaseSelection::Unrecognized(name.to_string()),
        }
    }
}

impl From<CaseStyle> for CaseSelection {
    fn from(style: CaseStyle) -> Self {
        CaseSelection::Known(style)
    }
}

impl fmt::Display for CaseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseSelection::Known(style) => style.fmt(f),
            CaseSelection::Unrecognized(name) => write!(f, "{name} (unrecognized)"),
        }
    }
}

// =============================================================================
// Transform configuration
// =============================================================================

/// A single literal substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Everything a pipeline needs to know. Fixed once the pipeline is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformConfig {
    /// Canonical line boundary.
    pub line_separator: String,
    /// Canonical field boundary.
    pub field_separator: String,
    /// Case rule applied to each line.
    pub case: CaseSelection,
    /// Alternate line delimiters, normalised in this order.
    pub line_delimiters: Vec<String>,
    /// Alternate field delimiters, normalised in this order.
    pub field_delimiters: Vec<String>,
    pub remove_prefix: String,
    pub remove_suffix: String,
    pub add_prefix: String,
    pub add_suffix: String,
    /// Substrings removed from each line, in this order.
    pub cut: Vec<String>,
    /// Substitutions applied to each line, in this order.
    pub replace: Vec<Replacement>,
    /// Lines starting with any of these are dropped before processing.
    pub skip_prefixes: Vec<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            line_separator: constants::DEFAULT_LINE_SEPARATOR.to_string(),
            field_separator: constants::DEFAULT_FIELD_SEPARATOR.to_string(),
            case: CaseSelection::default(),
            line_delimiters: Vec::new(),
            field_delimiters: Vec::new(),
            remove_prefix: String::new(),
            remove_suffix: String::new(),
            add_prefix: String::new(),
            add_suffix: String::new(),
            cut: Vec::new(),
            replace: Vec::new(),
            skip_prefixes: Vec::new(),
        }
    }
}

// =============================================================================
// Transform profile
// =============================================================================

/// A validated, named transform configuration ready for runtime use.
#[derive(Debug, Clone)]
pub struct TransformProfile {
    pub id: String,
    pub name: String,
    /// Profile file version, "1.0" when the file does not set one.
    pub version: String,
    pub description: String,
    pub config: TransformConfig,
    /// Whether this profile is built-in (embedded) or user-defined.
    pub is_builtin: bool,
}

// =============================================================================
// Run summary
// =============================================================================

/// Per-input outcome reported by `--summary`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Input name ("-" for stdin).
    pub input: String,
    /// Wall-clock start of the transform; absent when the input never loaded.
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub lines_in: usize,
    pub lines_out: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
    /// Error message when the input failed.
    pub error: Option<String>,
    pub timeline: Vec<crate::util::trace::Snapshot>,
}
