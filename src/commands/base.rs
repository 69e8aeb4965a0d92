//! Shared pieces of every command kind.

use std::sync::Arc;

use crate::core::{Command, CommandKind, CommandResult, Config, MenuConfig};
use crate::host::{CommandRegistrar, Vault};

/// A command that can register itself with a host.
pub trait CommandBase: Send + Sync + 'static {
    /// The command's descriptor.
    fn command(&self) -> &Command;

    /// Register the palette callback and any menu listeners.
    fn register(self: Arc<Self>, registrar: &mut dyn CommandRegistrar) -> CommandResult<()>;
}

/// What commands of one plugin share: the plugin id, the vault, menu settings.
#[derive(Clone)]
pub struct PluginContext {
    plugin_id: String,
    vault: Arc<dyn Vault>,
    menus: Arc<MenuConfig>,
}

impl PluginContext {
    /// Create a context with default menu settings.
    pub fn new(plugin_id: impl Into<String>, vault: Arc<dyn Vault>) -> Self {
        Self { plugin_id: plugin_id.into(), vault, menus: Arc::new(MenuConfig::default()) }
    }

    /// Create a context from loaded configuration.
    pub fn from_config(config: &Config, vault: Arc<dyn Vault>) -> Self {
        Self::new(config.general.plugin_id.clone(), vault).with_menus(config.menus.clone())
    }

    /// Replace the menu settings.
    #[must_use]
    pub fn with_menus(mut self, menus: MenuConfig) -> Self {
        self.menus = Arc::new(menus);
        self
    }

    /// Owning plugin id.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Vault commands act on.
    pub fn vault(&self) -> &Arc<dyn Vault> {
        &self.vault
    }

    /// Menu settings.
    pub fn menus(&self) -> &MenuConfig {
        &self.menus
    }

    /// Stamp a descriptor with this plugin and a subject kind.
    pub(crate) fn bind(&self, command: Command, kind: CommandKind) -> Command {
        command.with_plugin(self.plugin_id.clone()).with_kind(kind)
    }
}

impl std::fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginContext")
            .field("plugin_id", &self.plugin_id)
            .field("menus", &self.menus)
            .finish()
    }
}
