use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("hearth")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HearthConfig {
    /// Where the task and member documents live.
    #[serde(default = "default_data_dir")]
    pub data_directory: PathBuf,
    /// Anthropic API key for smart task entry. Falls back to the
    /// `ANTHROPIC_API_KEY` environment variable when unset.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for HearthConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_dir(),
            api_key: None,
        }
    }
}

impl HearthConfig {
    /// `~/.config/hearth/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("hearth").join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it is absent or
    /// unreadable. A malformed file is reported but never fatal.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring malformed config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// The effective API key, if any source provides a non-empty one.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}
