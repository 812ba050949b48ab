// Linewright - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Linewright operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LinewrightError {
    /// A document transform failed.
    Transform(TransformError),

    /// Profile loading or validation failed.
    Profile(ProfileError),

    /// Command-line arguments or settings that cannot be used together.
    Usage(String),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LinewrightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform(e) => write!(f, "Transform error: {e}"),
            Self::Profile(e) => write!(f, "Profile error: {e}"),
            Self::Usage(msg) => write!(f, "Usage error: {msg}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LinewrightError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transform(e) => Some(e),
            Self::Profile(e) => Some(e),
            Self::Usage(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Transform errors
// ---------------------------------------------------------------------------

/// Errors raised while running a document through the pipeline.
#[derive(Debug)]
pub enum TransformError {
    /// The document's lines were already populated; a document is split
    /// exactly once per pipeline run.
    AlreadySplit,

    /// Reading the input payload failed. The source error is passed through
    /// untouched.
    Read { source: io::Error },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySplit => write!(f, "document already split; split may only run once"),
            Self::Read { source } => write!(f, "failed to read input: {source}"),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source } => Some(source),
            Self::AlreadySplit => None,
        }
    }
}

impl From<io::Error> for TransformError {
    fn from(e: io::Error) -> Self {
        Self::Read { source: e }
    }
}

impl From<TransformError> for LinewrightError {
    fn from(e: TransformError) -> Self {
        Self::Transform(e)
    }
}

// ---------------------------------------------------------------------------
// Profile errors
// ---------------------------------------------------------------------------

/// Errors related to transform profile loading and validation.
#[derive(Debug)]
pub enum ProfileError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Profile file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A required field is missing from the profile definition.
    MissingField {
        profile_id: String,
        field: &'static str,
    },

    /// A field holds a value the pipeline cannot use.
    InvalidValue {
        profile_id: String,
        field: &'static str,
        reason: String,
    },

    /// Maximum number of profiles exceeded.
    TooManyProfiles { count: usize, max: usize },

    /// A profile was requested by id or path but could not be found.
    NotFound { name: String },

    /// I/O error reading a profile file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Profile '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { profile_id, field } => {
                write!(
                    f,
                    "Profile '{profile_id}': missing required field '{field}'"
                )
            }
            Self::InvalidValue {
                profile_id,
                field,
                reason,
            } => write!(f, "Profile '{profile_id}': invalid '{field}': {reason}"),
            Self::TooManyProfiles { count, max } => {
                write!(f, "Too many profiles loaded ({count}), maximum is {max}")
            }
            Self::NotFound { name } => write!(
                f,
                "No profile named '{name}'. Use --list-profiles to see what is available."
            ),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading profile '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ProfileError> for LinewrightError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
///
/// Surfaced as warnings by `platform::config::load_config`; a bad config
/// never stops a run, so these are not wrapped by `LinewrightError`.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for Linewright results.
pub type Result<T> = std::result::Result<T, LinewrightError>;
