//! Invocations bound to a file or a folder.

use std::sync::Arc;

use async_trait::async_trait;

use super::Invocation;
use crate::core::{resolve_abstract_file, AbstractFile, Resolution};
use crate::host::Vault;

/// What a command accepting either files or folders does with its entry.
#[async_trait]
pub trait AbstractFileAction: Send + Sync + 'static {
    /// Narrow feasibility for a resolved entry.
    fn can_execute(&self, _entry: &AbstractFile) -> bool {
        true
    }

    /// Whether to offer the command in a menu opened from `source`.
    fn should_add_to_menu(&self, _entry: &AbstractFile, _source: &str) -> bool {
        true
    }

    /// Act on the entry.
    async fn execute(&self, entry: &AbstractFile, vault: &dyn Vault) -> anyhow::Result<()>;
}

/// Invocation of a file-or-folder action. Falls back to the active file.
pub struct AbstractFileInvocation {
    action: Arc<dyn AbstractFileAction>,
    vault: Arc<dyn Vault>,
    explicit: Option<AbstractFile>,
    entry: Option<AbstractFile>,
}

impl AbstractFileInvocation {
    /// Create an invocation that falls back to the active file.
    pub fn new(action: Arc<dyn AbstractFileAction>, vault: Arc<dyn Vault>) -> Self {
        Self { action, vault, explicit: None, entry: None }
    }

    /// Bind the invocation to `entry`.
    #[must_use]
    pub fn with_entry(mut self, entry: AbstractFile) -> Self {
        self.set_entry(entry);
        self
    }

    /// Replace the explicit entry.
    pub fn set_entry(&mut self, entry: AbstractFile) {
        self.explicit = Some(entry);
        self.entry = None;
    }

    /// The entry resolved by the last check.
    pub fn entry(&self) -> Option<&AbstractFile> {
        self.entry.as_ref()
    }
}

#[async_trait]
impl Invocation for AbstractFileInvocation {
    fn can_execute(&mut self) -> bool {
        let Resolution::Resolved(entry) =
            resolve_abstract_file(self.explicit.as_ref(), self.vault.as_ref())
        else {
            self.entry = None;
            return false;
        };
        let feasible = self.action.can_execute(&entry);
        self.entry = Some(entry);
        feasible
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let entry = self.entry.clone().ok_or_else(|| anyhow::anyhow!("no entry resolved"))?;
        self.action.execute(&entry, self.vault.as_ref()).await
    }
}
