use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::navigator::MAX_RANDOM_PAGES;
use crate::style::StyleConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub man: ManConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// Page colours
    #[serde(default)]
    pub style: StyleConfig,
}

/// How the manual lookup tool is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManConfig {
    #[serde(default = "default_command")]
    pub command: String,

    /// Manual tree passed as `-M`; unset uses the tool's search path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Locale override passed as `-L<locale>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Exit status the tool uses for "no such page"
    #[serde(default = "default_not_found_exit_code")]
    pub not_found_exit_code: i32,
}

impl Default for ManConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            directory: None,
            locale: None,
            timeout_secs: default_timeout_secs(),
            not_found_exit_code: default_not_found_exit_code(),
        }
    }
}

fn default_command() -> String {
    "man".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_not_found_exit_code() -> i32 {
    16
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// List the other sections providing each opened page
    #[serde(default = "default_true")]
    pub alternates: bool,

    #[serde(default = "default_true")]
    pub url_links: bool,

    #[serde(default = "default_true")]
    pub email_links: bool,

    /// Random pages opened at startup (at most 20)
    #[serde(default)]
    pub random_pages: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alternates: true,
            url_links: true,
            email_links: true,
            random_pages: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Errors reading or writing the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration directory on this platform
    NoConfigDir,
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io(path, e) => write!(f, "{}: {}", path.display(), e),
            ConfigError::Parse(path, e) => write!(f, "{}: {}", path.display(), e),
            ConfigError::Serialize(e) => write!(f, "Could not serialize config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl Config {
    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/manview/config.toml
    /// - Linux: ~/.config/manview/config.toml
    /// - Windows: %APPDATA%/manview/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("manview").join("config.toml"))
    }

    /// Load config from file, or return default if the file is missing or
    /// malformed
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        Ok(config.normalized())
    }

    /// Save config to the platform path, returning where it was written
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(parent.to_path_buf(), e))?;
        }

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        Ok(())
    }

    /// Clamp out-of-range values and replace invalid colours.
    pub fn normalized(mut self) -> Self {
        if self.display.random_pages > MAX_RANDOM_PAGES {
            warn!(
                "display.random_pages {} exceeds {}, clamping",
                self.display.random_pages, MAX_RANDOM_PAGES
            );
            self.display.random_pages = MAX_RANDOM_PAGES;
        }
        if self.man.timeout_secs == 0 {
            warn!("man.timeout_secs must be positive, using default");
            self.man.timeout_secs = default_timeout_secs();
        }
        self.style = self.style.validated();
        self
    }
}
