//! Invocations bound to a single file.

use std::sync::Arc;

use async_trait::async_trait;

use super::Invocation;
use crate::core::{resolve_file, FileRef, Resolution};
use crate::host::Vault;

/// What a file command does with its file.
#[async_trait]
pub trait FileAction: Send + Sync + 'static {
    /// Narrow feasibility for a resolved file.
    fn can_execute(&self, _file: &FileRef) -> bool {
        true
    }

    /// Whether to offer the command in a menu opened from `source`.
    fn should_add_to_menu(&self, _file: &FileRef, _source: &str) -> bool {
        true
    }

    /// Act on the file.
    async fn execute(&self, file: &FileRef, vault: &dyn Vault) -> anyhow::Result<()>;
}

/// Invocation of a file action.
///
/// The subject is the explicit file if one was supplied, else the vault's
/// active file at check time.
pub struct FileInvocation {
    action: Arc<dyn FileAction>,
    vault: Arc<dyn Vault>,
    explicit: Option<FileRef>,
    file: Option<FileRef>,
}

impl FileInvocation {
    /// Create an invocation that falls back to the active file.
    pub fn new(action: Arc<dyn FileAction>, vault: Arc<dyn Vault>) -> Self {
        Self { action, vault, explicit: None, file: None }
    }

    /// Bind the invocation to `file`.
    #[must_use]
    pub fn with_file(mut self, file: FileRef) -> Self {
        self.set_file(file);
        self
    }

    /// Replace the explicit file. Use through `CommandInvocation::rebind`.
    pub fn set_file(&mut self, file: FileRef) {
        self.explicit = Some(file);
        self.file = None;
    }

    /// The file resolved by the last check.
    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }
}

#[async_trait]
impl Invocation for FileInvocation {
    fn can_execute(&mut self) -> bool {
        let Resolution::Resolved(file) = resolve_file(self.explicit.as_ref(), self.vault.as_ref())
        else {
            self.file = None;
            return false;
        };
        let feasible = self.action.can_execute(&file);
        self.file = Some(file);
        feasible
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let file = self.file.clone().ok_or_else(|| anyhow::anyhow!("no file resolved"))?;
        self.action.execute(&file, self.vault.as_ref()).await
    }
}
