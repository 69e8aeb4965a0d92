//! Configuration management for vaultcmd.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Command;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Command registration settings
    pub commands: CommandsConfig,

    /// Context menu settings
    pub menus: MenuConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Plugin id used to prefix command ids
    pub plugin_id: String,
}

/// Command registration settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Command ids (short or `plugin:id`) that are never registered
    pub disabled: Vec<String>,
}

/// Context menu settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Section for single-entry file menu items
    pub file_section: Option<String>,

    /// Section for multi-selection files menu items
    pub files_section: Option<String>,

    /// Section for editor menu items
    pub editor_section: Option<String>,

    /// Command ids kept out of every context menu (palette only)
    pub hidden: Vec<String>,
}

impl CommandsConfig {
    /// Check whether `command` is disabled.
    pub fn is_disabled(&self, command: &Command) -> bool {
        self.disabled.iter().any(|id| command.matches_id(id))
    }
}

impl MenuConfig {
    /// Check whether `command` may appear in context menus.
    pub fn shows(&self, command: &Command) -> bool {
        !self.hidden.iter().any(|id| command.matches_id(id))
    }
}

impl Config {
    /// Name of the config directory and default plugin id.
    pub const APP_DIR: &'static str = "vaultcmd";

    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.vaultcmd.toml` in the current directory
    /// 2. `~/.config/vaultcmd/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".vaultcmd.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(global_config) = Self::config_path() {
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to a specific file.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::APP_DIR))
    }

    /// Get the global config file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { plugin_id: Config::APP_DIR.to_string() }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            file_section: Some("action".to_string()),
            files_section: Some("action".to_string()),
            editor_section: Some("selection".to_string()),
            hidden: Vec::new(),
        }
    }
}
