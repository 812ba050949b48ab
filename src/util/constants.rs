// Linewright - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Linewright";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Linewright";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Transform defaults
// =============================================================================

/// Canonical line separator used when a profile does not set one.
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// Canonical field separator used when a profile does not set one.
pub const DEFAULT_FIELD_SEPARATOR: &str = "\t";

/// Line delimiters offered by `--normalize-newlines`, in the order they must
/// be applied (CRLF before the bare CR it contains).
pub const COMMON_LINE_DELIMITERS: &[&str] = &["\r\n", "\r"];

// =============================================================================
// Input limits
// =============================================================================

/// Maximum size of a single input document in bytes.
///
/// The pipeline holds the original text, the normalised text, the line
/// vector and the output at the same time, so peak memory is roughly four
/// times this figure.
pub const MAX_INPUT_BYTES: u64 = 256 * 1024 * 1024; // 256 MB

/// Maximum number of input files accepted by a single batch run.
pub const MAX_BATCH_FILES: usize = 10_000;

// =============================================================================
// Memo cache
// =============================================================================

/// Lines longer than this are transformed directly and never cached.
/// Keeps the memo from pinning very large one-off lines in memory.
pub const MAX_CACHED_LINE_BYTES: usize = 4 * 1024;

/// Upper bound on memo entries. Once reached, new results are not stored.
pub const MAX_CACHE_ENTRIES: usize = 100_000;

// =============================================================================
// Profiles
// =============================================================================

/// Maximum number of profiles (built-in + user) loaded at once.
pub const MAX_PROFILES: usize = 100;

/// Maximum size of a single profile file in bytes.
pub const MAX_PROFILE_FILE_SIZE: u64 = 64 * 1024; // 64 KB

/// Maximum number of cut or replacement rules in a single profile.
pub const MAX_RULES_PER_PROFILE: usize = 1_000;

/// Directory (under the config dir) that holds user profiles.
pub const PROFILES_DIR_NAME: &str = "profiles";

/// File extension recognised for profile files.
pub const PROFILE_EXTENSION: &str = "toml";

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Files
// =============================================================================

/// Name of the application config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";
