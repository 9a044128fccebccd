use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "hn_search.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub hits_per_page: u32,
    pub default_query: String,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://hn.algolia.com/api/v1".into(),
            hits_per_page: 100,
            default_query: "redux".into(),
            request_timeout_secs: None,
            log_filter: "info".into(),
            dark_mode: true,
        }
    }
}

/// Defaults, then `hn_search.toml` in the working directory, then environment.
///
/// Runs before the tracing subscriber exists, so a broken settings file is
/// returned alongside the settings for the caller to log.
pub fn load_settings() -> (Settings, Option<anyhow::Error>) {
    let (settings, problem) = match read_settings_file(Path::new(SETTINGS_FILE)) {
        Ok(Some(settings)) => (settings, None),
        Ok(None) => (Settings::default(), None),
        Err(err) => (Settings::default(), Some(err)),
    };

    (apply_env_overrides(settings, |key| std::env::var(key).ok()), problem)
}

/// `Ok(None)` when the file does not exist.
pub fn read_settings_file(path: &Path) -> anyhow::Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let settings = toml::from_str::<Settings>(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    Ok(Some(settings))
}

/// Values that fail to parse are ignored.
pub fn apply_env_overrides<F>(mut settings: Settings, var: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = var("HN_SEARCH_BASE_URL") {
        settings.base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = var("HN_SEARCH_HITS_PER_PAGE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.hits_per_page = parsed;
        }
    }
    if let Some(v) = var("HN_SEARCH_DEFAULT_QUERY") {
        settings.default_query = v;
    }
    if let Some(v) = var("HN_SEARCH_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
    if let Some(v) = var("HN_SEARCH_LOG") {
        settings.log_filter = v;
    }
    if let Some(v) = var("HN_SEARCH_DARK_MODE") {
        if let Ok(parsed) = v.parse::<bool>() {
            settings.dark_mode = parsed;
        }
    }

    settings
}
