// Linewright - app/profile_mgr.rs
//
// Loads transform profiles from both built-in sources (embedded in the
// binary) and user-defined TOML files on disk, and resolves the profile a
// run asks for. User profiles override built-in profiles with the same ID.

use crate::core::model::TransformProfile;
use crate::core::profile;
use crate::util::constants;
use crate::util::error::ProfileError;
use std::path::Path;

/// Load all available profiles: built-in first, then user-defined overrides.
///
/// Invalid user profiles are logged and skipped (non-fatal).
///
/// Returns the merged list and any non-fatal errors encountered.
pub fn load_all_profiles(
    user_profile_dir: Option<&Path>,
) -> (Vec<TransformProfile>, Vec<ProfileError>) {
    let mut profiles = profile::load_builtin_profiles();
    let mut errors = Vec::new();

    tracing::info!(builtin_count = profiles.len(), "Loaded built-in profiles");

    match user_profile_dir {
        Some(dir) if dir.is_dir() => {
            let (user_profiles, user_errors) = load_user_profiles(dir);
            errors.extend(user_errors);

            for user_profile in user_profiles {
                if let Some(pos) = profiles.iter().position(|p| p.id == user_profile.id) {
                    tracing::info!(
                        profile_id = %user_profile.id,
                        "User profile overrides built-in"
                    );
                    profiles[pos] = user_profile;
                } else {
                    tracing::info!(
                        profile_id = %user_profile.id,
                        "Loaded user-defined profile"
                    );
                    profiles.push(user_profile);
                }
            }
        }
        Some(dir) => tracing::debug!(
            dir = %dir.display(),
            "User profile directory does not exist (skipping)"
        ),
        None => {}
    }

    if profiles.len() > constants::MAX_PROFILES {
        tracing::warn!(
            count = profiles.len(),
            max = constants::MAX_PROFILES,
            "Too many profiles loaded, truncating"
        );
        errors.push(ProfileError::TooManyProfiles {
            count: profiles.len(),
            max: constants::MAX_PROFILES,
        });
        profiles.truncate(constants::MAX_PROFILES);
    }

    tracing::info!(total = profiles.len(), "Profile loading complete");

    (profiles, errors)
}

/// Resolve `name` to a profile.
///
/// A name that refers to an existing `.toml` file is loaded from disk;
/// anything else is looked up by id among `profiles`.
pub fn resolve_profile(
    name: &str,
    profiles: &[TransformProfile],
) -> Result<TransformProfile, ProfileError> {
    let path = Path::new(name);
    if is_profile_file(path) && path.is_file() {
        tracing::debug!(path = %path.display(), "Loading profile from file");
        return load_profile_file(path);
    }

    profile::find_profile(profiles, name)
        .cloned()
        .ok_or_else(|| ProfileError::NotFound {
            name: name.to_string(),
        })
}

/// Read, size-check, parse and validate a single profile file.
pub fn load_profile_file(path: &Path) -> Result<TransformProfile, ProfileError> {
    let metadata = std::fs::metadata(path).map_err(|e| ProfileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_PROFILE_FILE_SIZE {
        return Err(ProfileError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_PROFILE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    profile::parse_profile_toml(&content, path)
        .and_then(|def| profile::validate_and_compile(def, path, false))
}

fn is_profile_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(constants::PROFILE_EXTENSION)
}

/// Load user-defined profiles from a directory, in file-name order.
fn load_user_profiles(dir: &Path) -> (Vec<TransformProfile>, Vec<ProfileError>) {
    let mut profiles = Vec::new();
    let mut errors = Vec::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(ProfileError::Io {
                path: dir.to_path_buf(),
                source: e,
            });
            return (profiles, errors);
        }
    };

    let mut paths = Vec::new();
    for entry_result in entries {
        match entry_result {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => errors.push(ProfileError::Io {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }
    paths.retain(|p| is_profile_file(p));
    paths.sort();

    for path in paths {
        match load_profile_file(&path) {
            Ok(p) => profiles.push(p),
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping invalid user profile");
                errors.push(e);
            }
        }
    }

    (profiles, errors)
}
