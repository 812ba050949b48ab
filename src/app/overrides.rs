// Linewright - app/overrides.rs
//
// Command-line adjustments layered over a profile's transform config, and
// assembly of the pipeline a run uses.
// Scalar settings replace the profile's value; rule lists (delimiters,
// cuts, replacements, skip prefixes) run after the profile's own rules.

use crate::app::profile_mgr;
use crate::core::cache::MapStrategy;
use crate::core::model::{CaseStyle, Replacement, TransformConfig, TransformProfile};
use crate::core::pipeline::Pipeline;
use crate::util::constants;
use crate::util::error::{self, LinewrightError};

/// Settings given on the command line. `None`/empty means "keep the
/// profile's value".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub case: Option<CaseStyle>,
    pub normalize_newlines: bool,
    pub line_delimiters: Vec<String>,
    pub field_delimiters: Vec<String>,
    pub line_separator: Option<String>,
    pub field_separator: Option<String>,
    pub remove_prefix: Option<String>,
    pub remove_suffix: Option<String>,
    pub add_prefix: Option<String>,
    pub add_suffix: Option<String>,
    pub cut: Vec<String>,
    pub replace: Vec<Replacement>,
    pub skip_prefixes: Vec<String>,
}

impl Overrides {
    /// Layer these settings over `config`.
    ///
    /// Delimiters and separators accept `\n`, `\r`, `\t` and `\\` escapes.
    pub fn apply(self, config: &mut TransformConfig) -> Result<(), String> {
        if let Some(style) = self.case {
            config.case = style.into();
        }

        if let Some(sep) = self.line_separator {
            config.line_separator = non_empty("--line-sep", unescape(&sep))?;
        }
        if let Some(sep) = self.field_separator {
            config.field_separator = non_empty("--field-sep", unescape(&sep))?;
        }

        if self.normalize_newlines {
            let mut common: Vec<String> = constants::COMMON_LINE_DELIMITERS
                .iter()
                .filter(|d| !config.line_delimiters.iter().any(|e| e == *d))
                .map(|d| d.to_string())
                .collect();
            common.append(&mut config.line_delimiters);
            config.line_delimiters = common;
        }
        config
            .line_delimiters
            .extend(self.line_delimiters.iter().map(|d| unescape(d)));
        config
            .field_delimiters
            .extend(self.field_delimiters.iter().map(|d| unescape(d)));

        replace_if_set(&mut config.remove_prefix, self.remove_prefix);
        replace_if_set(&mut config.remove_suffix, self.remove_suffix);
        replace_if_set(&mut config.add_prefix, self.add_prefix);
        replace_if_set(&mut config.add_suffix, self.add_suffix);

        config.cut.extend(self.cut);
        config.replace.extend(self.replace);
        config.skip_prefixes.extend(self.skip_prefixes);

        if config.cut.len() > constants::MAX_RULES_PER_PROFILE
            || config.replace.len() > constants::MAX_RULES_PER_PROFILE
        {
            return Err(format!(
                "too many cut or replace rules (maximum {})",
                constants::MAX_RULES_PER_PROFILE
            ));
        }

        Ok(())
    }
}

/// Build the pipeline for a run.
///
/// `profile` is an id or a path to a profile file; without one the defaults
/// apply. `cache` is `off`, `rwlock` or `cow`; `None` means off.
pub fn build_pipeline(
    profile: Option<&str>,
    profiles: &[TransformProfile],
    overrides: Overrides,
    cache: Option<&str>,
) -> error::Result<Pipeline> {
    let mut config = match profile {
        Some(name) => {
            let profile = profile_mgr::resolve_profile(name, profiles)?;
            tracing::info!(profile_id = %profile.id, version = %profile.version, "Using profile");
            profile.config
        }
        None => TransformConfig::default(),
    };

    overrides.apply(&mut config).map_err(LinewrightError::Usage)?;

    let strategy = match cache {
        None | Some("off") => None,
        Some(name) => Some(name.parse::<MapStrategy>().map_err(LinewrightError::Usage)?),
    };

    let pipeline = Pipeline::new(config);
    Ok(match strategy {
        Some(strategy) => {
            tracing::debug!(strategy = %strategy, "Line memo enabled");
            pipeline.with_memo(strategy)
        }
        None => pipeline,
    })
}

fn replace_if_set(slot: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn non_empty(flag: &str, value: String) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("{flag} must not be empty"))
    } else {
        Ok(value)
    }
}

/// Expand `\n`, `\r`, `\t` and `\\`. Any other backslash is kept literally.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a `FROM=TO` replacement. Splits at the first `=`; `TO` may be empty.
pub fn parse_replacement(s: &str) -> Result<Replacement, String> {
    match s.split_once('=') {
        Some((from, _)) if from.is_empty() => Err(format!("'{s}': FROM must not be empty")),
        Some((from, to)) => Ok(Replacement::new(from, to)),
        None => Err(format!("'{s}': expected FROM=TO")),
    }
}

/// Parse a case style name, listing the valid names on failure.
pub fn parse_case_style(s: &str) -> Result<CaseStyle, String> {
    s.parse::<CaseStyle>().map_err(|e| {
        let names: Vec<&str> = CaseStyle::all().iter().map(CaseStyle::name).collect();
        format!("{e}; expected one of: {}", names.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CaseSelection;

    #[test]
    fn test_scalars_replace_and_lists_append() {
        let mut config = TransformConfig {
            case: CaseStyle::Snake.into(),
            add_prefix: "old".to_string(),
            cut: vec!["a".to_string()],
            replace: vec![Replacement::new("x", "y")],
            ..Default::default()
        };

        Overrides {
            case: Some(CaseStyle::Kebab),
            add_prefix: Some("new".to_string()),
            cut: vec!["b".to_string()],
            replace: vec![Replacement::new("y", "z")],
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap();

        assert_eq!(config.case, CaseSelection::Known(CaseStyle::Kebab));
        assert_eq!(config.add_prefix, "new");
        assert_eq!(config.cut, ["a", "b"]);
        assert_eq!(
            config.replace,
            vec![Replacement::new("x", "y"), Replacement::new("y", "z")]
        );
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let mut config = TransformConfig::default();
        Overrides::default().apply(&mut config).unwrap();
        assert_eq!(config, TransformConfig::default());
    }

    #[test]
    fn test_normalize_newlines_goes_first_without_duplicates() {
        let mut config = TransformConfig {
            line_delimiters: vec!["\r".to_string(), ";".to_string()],
            ..Default::default()
        };
        Overrides {
            normalize_newlines: true,
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.line_delimiters, ["\r\n", "\r", ";"]);
    }

    #[test]
    fn test_delimiters_are_unescaped() {
        let mut config = TransformConfig::default();
        Overrides {
            line_delimiters: vec![r"\r\n".to_string()],
            field_separator: Some(r"\t".to_string()),
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap();
        assert_eq!(config.line_delimiters, ["\r\n"]);
        assert_eq!(config.field_separator, "\t");
    }

    #[test]
    fn test_empty_separator_rejected() {
        let mut config = TransformConfig::default();
        let err = Overrides {
            line_separator: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut config)
        .unwrap_err();
        assert!(err.contains("--line-sep"));
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r"a\qb\\"), "a\\qb\\");
        assert_eq!(unescape(r"end\"), "end\\");
    }

    #[test]
    fn test_parse_replacement() {
        assert_eq!(parse_replacement("a=b=c").unwrap(), Replacement::new("a", "b=c"));
        assert_eq!(parse_replacement("gone=").unwrap(), Replacement::new("gone", ""));
        assert!(parse_replacement("=x").is_err());
        assert!(parse_replacement("novalue").is_err());
    }

    #[test]
    fn test_build_pipeline_from_profile_with_cache() {
        let (profiles, _) = profile_mgr::load_all_profiles(None);
        let pipeline = build_pipeline(
            Some("shout"),
            &profiles,
            Overrides {
                add_suffix: Some("!".to_string()),
                ..Default::default()
            },
            Some("cow"),
        )
        .unwrap();
        assert_eq!(pipeline.memo_strategy(), Some(MapStrategy::CopyOnWrite));
        assert_eq!(pipeline.run_str("hi").unwrap(), "HI!");
    }

    #[test]
    fn test_build_pipeline_errors_are_typed() {
        let (profiles, _) = profile_mgr::load_all_profiles(None);

        let missing = build_pipeline(Some("nope"), &profiles, Overrides::default(), None);
        assert!(matches!(missing, Err(LinewrightError::Profile(_))));

        let bad_cache = build_pipeline(None, &profiles, Overrides::default(), Some("lru"));
        assert!(matches!(bad_cache, Err(LinewrightError::Usage(_))));

        let bad_sep = build_pipeline(
            None,
            &profiles,
            Overrides {
                field_separator: Some(String::new()),
                ..Default::default()
            },
            Some("off"),
        );
        match bad_sep {
            Err(LinewrightError::Usage(msg)) => assert!(msg.contains("--field-sep")),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_case_style_lists_choices() {
        assert_eq!(parse_case_style("snake_all_caps").unwrap(), CaseStyle::SnakeAllCaps);
        let err = parse_case_style("sponge").unwrap_err();
        assert!(err.contains("kebab-pascal"));
    }
}
