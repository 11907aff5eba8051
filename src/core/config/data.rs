use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration stored in `config.toml`.
///
/// Everything here is optional; unset values fall back to the defaults in
/// [`crate::core::config::defaults`]. User-facing toggles (language, personas,
/// base URL override) live in the settings record instead, see
/// [`crate::core::settings::Settings`].
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Model identifier, e.g. "gemini-2.5-flash"
    pub model: Option<String>,
    /// API root used when the settings record has no base URL override
    pub api_base_url: Option<String>,
    /// Sampling temperature for chat replies
    pub temperature: Option<f32>,
    /// Per-request timeout; a request that exceeds it becomes an error reply
    pub request_timeout_secs: Option<u64>,
    /// How many earlier messages are sent as context with each request
    pub history_window: Option<usize>,
    /// Directory holding settings, sessions and the Chair log
    pub data_dir: Option<PathBuf>,
}

/// Keys accepted by `chairchat config set/unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    ApiBaseUrl,
    Temperature,
    RequestTimeout,
    HistoryWindow,
    DataDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Model,
        ConfigKey::ApiBaseUrl,
        ConfigKey::Temperature,
        ConfigKey::RequestTimeout,
        ConfigKey::HistoryWindow,
        ConfigKey::DataDir,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::ApiBaseUrl => "api-base-url",
            ConfigKey::Temperature => "temperature",
            ConfigKey::RequestTimeout => "request-timeout",
            ConfigKey::HistoryWindow => "history-window",
            ConfigKey::DataDir => "data-dir",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl Config {
    /// Set a key from its command-line spelling.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for {}", key.name()));
        }
        match key {
            ConfigKey::Model => self.model = Some(value.to_string()),
            ConfigKey::ApiBaseUrl => self.api_base_url = Some(value.to_string()),
            ConfigKey::Temperature => {
                let parsed: f32 = value
                    .parse()
                    .map_err(|_| format!("Invalid temperature '{value}'"))?;
                if !(0.0..=2.0).contains(&parsed) {
                    return Err("Temperature must be between 0.0 and 2.0".to_string());
                }
                self.temperature = Some(parsed);
            }
            ConfigKey::RequestTimeout => {
                let parsed: u64 = value
                    .parse()
                    .map_err(|_| format!("Invalid timeout '{value}' (seconds expected)"))?;
                if parsed == 0 {
                    return Err("Timeout must be at least one second".to_string());
                }
                self.request_timeout_secs = Some(parsed);
            }
            ConfigKey::HistoryWindow => {
                let parsed: usize = value
                    .parse()
                    .map_err(|_| format!("Invalid history window '{value}'"))?;
                self.history_window = Some(parsed);
            }
            ConfigKey::DataDir => self.data_dir = Some(PathBuf::from(value)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Model => self.model = None,
            ConfigKey::ApiBaseUrl => self.api_base_url = None,
            ConfigKey::Temperature => self.temperature = None,
            ConfigKey::RequestTimeout => self.request_timeout_secs = None,
            ConfigKey::HistoryWindow => self.history_window = None,
            ConfigKey::DataDir => self.data_dir = None,
        }
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/chairchat` → `~/.local/share/chairchat`
/// - Windows: paths are shown unchanged
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
