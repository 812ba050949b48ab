// Linewright - core/profile.rs
//
// Transform profile loading and validation.
// Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::profile_mgr which feeds content here.

use crate::core::model::{CaseSelection, Replacement, TransformConfig, TransformProfile};
use crate::util::constants;
use crate::util::error::ProfileError;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML profile definition as deserialized from a .toml file.
/// This is validated and compiled into a `TransformProfile` for runtime use.
#[derive(Debug, Deserialize)]
pub struct ProfileDefinition {
    pub profile: ProfileMeta,
    #[serde(default)]
    pub delimiters: DelimitersDef,
    #[serde(default)]
    pub case: CaseDef,
    #[serde(default)]
    pub affixes: AffixesDef,
    #[serde(default)]
    pub substrings: SubstringsDef,
    /// Array of tables, so file order is preserved.
    #[serde(default)]
    pub replace: Vec<ReplaceDef>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileMeta {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Deserialize, Default)]
pub struct DelimitersDef {
    pub line_separator: Option<String>,
    pub field_separator: Option<String>,
    #[serde(default)]
    pub line: Vec<String>,
    #[serde(default)]
    pub field: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CaseDef {
    pub style: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AffixesDef {
    #[serde(default)]
    pub remove_prefix: String,
    #[serde(default)]
    pub remove_suffix: String,
    #[serde(default)]
    pub add_prefix: String,
    #[serde(default)]
    pub add_suffix: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct SubstringsDef {
    #[serde(default)]
    pub cut: Vec<String>,
    #[serde(default)]
    pub skip_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceDef {
    pub from: String,
    #[serde(default)]
    pub to: String,
}

// =============================================================================
// Profile validation and compilation
// =============================================================================

/// Parse a TOML string into a `ProfileDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_profile_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<ProfileDefinition, ProfileError> {
    toml::from_str(toml_content).map_err(|e| ProfileError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Validate a `ProfileDefinition` and compile it into a `TransformProfile`.
///
/// Validates:
/// - Required fields are present and non-empty
/// - Canonical separators are non-empty
/// - Rule lists are within size limits
///
/// An unrecognised case style is not an error; it is logged and kept so
/// the pipeline passes lines through unchanged.
pub fn validate_and_compile(
    def: ProfileDefinition,
    source_path: &Path,
    is_builtin: bool,
) -> Result<TransformProfile, ProfileError> {
    let id = def.profile.id.trim().to_string();

    if id.is_empty() {
        return Err(ProfileError::MissingField {
            profile_id: "(empty)".to_string(),
            field: "profile.id",
        });
    }
    if def.profile.name.trim().is_empty() {
        return Err(ProfileError::MissingField {
            profile_id: id,
            field: "profile.name",
        });
    }

    let line_separator = separator(
        &id,
        "delimiters.line_separator",
        def.delimiters.line_separator,
        constants::DEFAULT_LINE_SEPARATOR,
    )?;
    let field_separator = separator(
        &id,
        "delimiters.field_separator",
        def.delimiters.field_separator,
        constants::DEFAULT_FIELD_SEPARATOR,
    )?;

    check_rule_count(&id, "substrings.cut", def.substrings.cut.len())?;
    check_rule_count(&id, "replace", def.replace.len())?;

    if def.replace.iter().any(|r| r.from.is_empty()) {
        tracing::warn!(
            profile_id = %id,
            source = %source_path.display(),
            "Profile has a replacement with an empty 'from'; it will be ignored"
        );
    }

    let case = match def.case.style.as_deref() {
        Some(name) => CaseSelection::from_name(name),
        None => CaseSelection::default(),
    };
    if let CaseSelection::Unrecognized(name) = &case {
        tracing::warn!(
            profile_id = %id,
            source = %source_path.display(),
            style = %name,
            "Profile names an unknown case style; case will be left unchanged"
        );
    }

    let config = TransformConfig {
        line_separator,
        field_separator,
        case,
        line_delimiters: def.delimiters.line,
        field_delimiters: def.delimiters.field,
        remove_prefix: def.affixes.remove_prefix,
        remove_suffix: def.affixes.remove_suffix,
        add_prefix: def.affixes.add_prefix,
        add_suffix: def.affixes.add_suffix,
        cut: def.substrings.cut,
        replace: def
            .replace
            .into_iter()
            .map(|r| Replacement::new(r.from, r.to))
            .collect(),
        skip_prefixes: def.substrings.skip_prefixes,
    };

    Ok(TransformProfile {
        id,
        name: def.profile.name,
        version: def.profile.version,
        description: def.profile.description,
        config,
        is_builtin,
    })
}

fn separator(
    profile_id: &str,
    field: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ProfileError> {
    match value {
        None => Ok(default.to_string()),
        Some(s) if s.is_empty() => Err(ProfileError::InvalidValue {
            profile_id: profile_id.to_string(),
            field,
            reason: "separator must not be empty".to_string(),
        }),
        Some(s) => Ok(s),
    }
}

fn check_rule_count(profile_id: &str, field: &'static str, count: usize) -> Result<(), ProfileError> {
    if count > constants::MAX_RULES_PER_PROFILE {
        return Err(ProfileError::InvalidValue {
            profile_id: profile_id.to_string(),
            field,
            reason: format!(
                "{count} rules exceeds maximum of {}",
                constants::MAX_RULES_PER_PROFILE
            ),
        });
    }
    Ok(())
}

/// Find a profile by id (case-insensitive).
pub fn find_profile<'a>(profiles: &'a [TransformProfile], id: &str) -> Option<&'a TransformProfile> {
    profiles.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

// =============================================================================
// Built-in profiles (embedded at compile time)
// =============================================================================

/// Embedded TOML content for built-in profiles.
/// Each tuple is (filename, TOML content).
pub fn builtin_profile_sources() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "snake_identifiers.toml",
            include_str!("../../profiles/snake_identifiers.toml"),
        ),
        ("env_keys.toml", include_str!("../../profiles/env_keys.toml")),
        (
            "kebab_slugs.toml",
            include_str!("../../profiles/kebab_slugs.toml"),
        ),
        (
            "camel_fields.toml",
            include_str!("../../profiles/camel_fields.toml"),
        ),
        ("shout.toml", include_str!("../../profiles/shout.toml")),
    ]
}

/// Load and validate all built-in profiles.
///
/// Invalid profiles are logged as errors and skipped (non-fatal).
pub fn load_builtin_profiles() -> Vec<TransformProfile> {
    let mut profiles = Vec::new();
    let mut failed = 0usize;

    for (filename, content) in builtin_profile_sources() {
        let path = std::path::PathBuf::from(format!("<builtin>/{filename}"));
        match parse_profile_toml(content, &path)
            .and_then(|def| validate_and_compile(def, &path, true))
        {
            Ok(profile) => {
                tracing::debug!(profile_id = %profile.id, "Loaded built-in profile");
                profiles.push(profile);
            }
            Err(e) => {
                tracing::error!(file = filename, error = %e, "Failed to load built-in profile");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        tracing::warn!(count = failed, "Some built-in profiles failed to load");
    }

    profiles
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CaseStyle;
    use crate::core::pipeline::Pipeline;
    use std::path::PathBuf;

    const VALID_PROFILE_TOML: &str = r##"
[profile]
id = "test-profile"
name = "Test Profile"
description = "A test profile"

[delimiters]
line = ["\r\n", "\r"]
field = [","]

[case]
style = "kebab"

[affixes]
remove_prefix = "- "
add_suffix = ";"

[substrings]
cut = ["!"]
skip_prefixes = ["#"]

[[replace]]
from = "one"
to = "two"

[[replace]]
from = "two"
to = "three"
"##;

    fn compile(toml: &str) -> Result<TransformProfile, ProfileError> {
        let path = PathBuf::from("test.toml");
        let def = parse_profile_toml(toml, &path)?;
        validate_and_compile(def, &path, false)
    }

    #[test]
    fn test_compile_valid_profile() {
        let profile = compile(VALID_PROFILE_TOML).unwrap();
        assert_eq!(profile.id, "test-profile");
        assert_eq!(profile.version, "1.0");
        assert!(!profile.is_builtin);

        let c = &profile.config;
        assert_eq!(c.case, CaseSelection::Known(CaseStyle::Kebab));
        assert_eq!(c.line_separator, "\n");
        assert_eq!(c.line_delimiters, ["\r\n", "\r"]);
        assert_eq!(c.field_delimiters, [","]);
        assert_eq!(c.remove_prefix, "- ");
        assert_eq!(c.add_suffix, ";");
        assert_eq!(
            c.replace,
            vec![Replacement::new("one", "two"), Replacement::new("two", "three")]
        );
    }

    #[test]
    fn test_compiled_profile_runs() {
        let profile = compile(VALID_PROFILE_TOML).unwrap();
        let pipeline = Pipeline::new(profile.config);
        let out = pipeline
            .run_str("# comment\r\n- Step one!\r\nDone")
            .unwrap();
        // Replacements chain in order, so "Done" also becomes "Dtwo" then "Dthree".
        assert_eq!(out, "step-three;\ndthree;");
    }

    #[test]
    fn test_minimal_profile_uses_defaults() {
        let profile = compile(
            r#"
[profile]
id = "bare"
name = "Bare"
"#,
        )
        .unwrap();
        assert_eq!(profile.config, TransformConfig::default());
    }

    #[test]
    fn test_missing_required_field() {
        let result = compile(
            r#"
[profile]
id = ""
name = "No Id"
"#,
        );
        match result.unwrap_err() {
            ProfileError::MissingField { field, .. } => assert_eq!(field, "profile.id"),
            other => panic!("Expected MissingField, got: {other:?}"),
        }
    }

    #[test]
    fn test_empty_separator_rejected() {
        let result = compile(
            r#"
[profile]
id = "bad-sep"
name = "Bad Separator"

[delimiters]
line_separator = ""
"#,
        );
        assert!(matches!(
            result.unwrap_err(),
            ProfileError::InvalidValue {
                field: "delimiters.line_separator",
                ..
            }
        ));
    }

    #[test]
    fn test_too_many_rules_rejected() {
        let cuts: Vec<String> = (0..=constants::MAX_RULES_PER_PROFILE)
            .map(|i| format!("\"c{i}\""))
            .collect();
        let toml = format!(
            r#"
[profile]
id = "big"
name = "Big"

[substrings]
cut = [{}]
"#,
            cuts.join(", ")
        );
        assert!(matches!(
            compile(&toml).unwrap_err(),
            ProfileError::InvalidValue { field: "substrings.cut", .. }
        ));
    }

    #[test]
    fn test_unknown_style_is_kept() {
        let profile = compile(
            r#"
[profile]
id = "odd"
name = "Odd"

[case]
style = "sponge"
"#,
        )
        .unwrap();
        assert_eq!(
            profile.config.case,
            CaseSelection::Unrecognized("sponge".to_string())
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            compile("[profile\nid = 1").unwrap_err(),
            ProfileError::TomlParse { .. }
        ));
    }

    #[test]
    fn test_load_builtin_profiles() {
        let profiles = load_builtin_profiles();
        assert_eq!(profiles.len(), builtin_profile_sources().len());
        assert!(profiles.iter().all(|p| p.is_builtin));
        assert!(find_profile(&profiles, "SNAKE-IDENTIFIERS").is_some());
        assert!(find_profile(&profiles, "missing").is_none());
        assert_eq!(find_profile(&profiles, "env-keys").unwrap().version, "1.1");
    }

    #[test]
    fn test_builtin_profiles_behave() {
        let profiles = load_builtin_profiles();
        let run = |id: &str, input: &str| {
            let profile = find_profile(&profiles, id).unwrap();
            Pipeline::new(profile.config.clone()).run_str(input).unwrap()
        };

        assert_eq!(run("env-keys", "server.http-port\r\n# note"), "APP_SERVER_HTTP_PORT=");
        assert_eq!(
            run("kebab-slugs", "# Getting Started: Install & Run"),
            "getting-started-install-and-run"
        );
        assert_eq!(run("camel-fields", "first_name,Last Name"), "firstName\nlastName");
        assert_eq!(run("snake-identifiers", "Order-ID, v2"), "order_id_v2");
        assert_eq!(run("shout", "hi\r\nthere"), "HI\nTHERE");
    }
}
