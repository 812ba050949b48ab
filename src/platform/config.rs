// Linewright - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Linewright configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/linewright/ or %APPDATA%\Linewright\config\)
    pub config_dir: PathBuf,

    /// User profile directory (e.g. ~/.config/linewright/profiles/)
    pub user_profiles_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let user_profiles_dir = config_dir.join(constants::PROFILES_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                profiles = %user_profiles_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                user_profiles_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                user_profiles_dir: fallback.join(constants::PROFILES_DIR_NAME),
                config_dir: fallback,
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still works
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[logging]` section.
    pub logging: LoggingSection,
    /// `[transform]` section.
    pub transform: TransformSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// `[transform]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TransformSection {
    /// Profile used when --profile is not given.
    pub default_profile: Option<String>,
    /// Memo strategy: "off", "rwlock" or "cow".
    pub cache: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
    /// Profile id or path used when --profile is absent.
    pub default_profile: Option<String>,
    /// Memo strategy name, already validated.
    pub cache: Option<String>,
}

/// Accepted `[transform] cache` values.
pub const CACHE_CHOICES: &[&str] = &["off", "rwlock", "cow"];

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the tool still runs and the user is told why their settings were ignored.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, mut field_warnings) = validate(raw);
    warnings.append(&mut field_warnings);
    (config, warnings)
}

/// Validate each field, accumulating every problem rather than stopping at
/// the first.
fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "logging.level".to_string(),
                value: level,
                expected: constants::VALID_LOG_LEVELS.join(", "),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(file);
    }

    // -- Transform: default_profile --
    if let Some(profile) = raw.transform.default_profile {
        let profile = profile.trim().to_string();
        if profile.is_empty() {
            warnings.push(
                "[transform] default_profile is empty. No default profile will be used."
                    .to_string(),
            );
        } else {
            config.default_profile = Some(profile);
        }
    }

    // -- Transform: cache --
    if let Some(cache) = raw.transform.cache {
        let cache = cache.to_lowercase();
        if CACHE_CHOICES.contains(&cache.as_str()) {
            config.cache = Some(cache);
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "transform.cache".to_string(),
                value: cache,
                expected: CACHE_CHOICES.join(", "),
            };
            warnings.push(format!("{err}. Using default (off)."));
        }
    }

    (config, warnings)
}
