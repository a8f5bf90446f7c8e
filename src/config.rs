/// Runtime configuration
///
/// File locations default to a per-user data directory; the Gemini endpoint
/// and key come from the environment.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::motivation::GeminiConfig;

/// Name of the CLI tracker's data file
pub const HABITS_FILE: &str = "habits.json";

/// Name of the dashboard's data file
pub const DASHBOARD_FILE: &str = "dashboard.json";

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable overriding the Gemini endpoint
pub const API_URL_VAR: &str = "HABIT_TRACKER_GEMINI_URL";

/// Candidate directories for the data files, most preferred first
fn data_dir_candidates() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|home| home.join(".habit_tracker")),
        dirs::data_dir().map(|data| data.join("habit_tracker")),
        dirs::config_dir().map(|config| config.join("habit_tracker")),
        std::env::current_dir().ok().map(|cwd| cwd.join(".habit_tracker")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    let marker = dir.join(".write_check");
    let writable = std::fs::write(&marker, b"").is_ok();
    let _ = std::fs::remove_file(&marker);
    writable
}

/// First writable candidate directory, else one under the system temp dir
pub fn default_data_dir() -> Result<PathBuf, std::io::Error> {
    if let Some(dir) = data_dir_candidates().into_iter().find(|dir| is_writable_dir(dir)) {
        return Ok(dir);
    }

    let fallback = std::env::temp_dir().join("habit_tracker");
    std::fs::create_dir_all(&fallback)?;
    warn!("No writable data directory found, using {}", fallback.display());
    Ok(fallback)
}

/// Resolve a data file: the explicit path if given, else `file_name` in the default directory
pub fn resolve_data_file(explicit: Option<PathBuf>, file_name: &str) -> Result<PathBuf, std::io::Error> {
    match explicit {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(path)
        }
        None => Ok(default_data_dir()?.join(file_name)),
    }
}

/// Gemini settings from the environment
pub fn gemini_config_from_env() -> GeminiConfig {
    let defaults = GeminiConfig::default();
    GeminiConfig {
        api_url: std::env::var(API_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.api_url),
        api_key: std::env::var(API_KEY_VAR).ok().filter(|key| !key.trim().is_empty()),
    }
}
