//! Invocations bound to a single folder.

use std::sync::Arc;

use async_trait::async_trait;

use super::Invocation;
use crate::core::{resolve_folder, FolderRef, Resolution};
use crate::host::Vault;

/// What a folder command does with its folder.
#[async_trait]
pub trait FolderAction: Send + Sync + 'static {
    /// Narrow feasibility for a resolved folder.
    fn can_execute(&self, _folder: &FolderRef) -> bool {
        true
    }

    /// Whether to offer the command in a menu opened from `source`.
    fn should_add_to_menu(&self, _folder: &FolderRef, _source: &str) -> bool {
        true
    }

    /// Act on the folder.
    async fn execute(&self, folder: &FolderRef, vault: &dyn Vault) -> anyhow::Result<()>;
}

/// Invocation of a folder action.
///
/// Falls back to the folder of the active file when no folder was supplied.
pub struct FolderInvocation {
    action: Arc<dyn FolderAction>,
    vault: Arc<dyn Vault>,
    explicit: Option<FolderRef>,
    folder: Option<FolderRef>,
}

impl FolderInvocation {
    /// Create an invocation that falls back to the active file's folder.
    pub fn new(action: Arc<dyn FolderAction>, vault: Arc<dyn Vault>) -> Self {
        Self { action, vault, explicit: None, folder: None }
    }

    /// Bind the invocation to `folder`.
    #[must_use]
    pub fn with_folder(mut self, folder: FolderRef) -> Self {
        self.set_folder(folder);
        self
    }

    /// Replace the explicit folder.
    pub fn set_folder(&mut self, folder: FolderRef) {
        self.explicit = Some(folder);
        self.folder = None;
    }

    /// The folder resolved by the last check.
    pub fn folder(&self) -> Option<&FolderRef> {
        self.folder.as_ref()
    }
}

#[async_trait]
impl Invocation for FolderInvocation {
    fn can_execute(&mut self) -> bool {
        let Resolution::Resolved(folder) =
            resolve_folder(self.explicit.as_ref(), self.vault.as_ref())
        else {
            self.folder = None;
            return false;
        };
        let feasible = self.action.can_execute(&folder);
        self.folder = Some(folder);
        feasible
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let folder = self.folder.clone().ok_or_else(|| anyhow::anyhow!("no folder resolved"))?;
        self.action.execute(&folder, self.vault.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryVault;
    use crate::invocation::CommandInvocation;

    struct RejectRoot;

    #[async_trait]
    impl FolderAction for RejectRoot {
        fn can_execute(&self, folder: &FolderRef) -> bool {
            !folder.is_root()
        }

        async fn execute(&self, folder: &FolderRef, vault: &dyn Vault) -> anyhow::Result<()> {
            vault.create(&folder.child_path("marker.md"), "")?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_active_parent_fallback() {
        let vault = Arc::new(MemoryVault::new().with_file("Notes/today.md", "").with_active("Notes/today.md"));
        let body = FolderInvocation::new(Arc::new(RejectRoot), vault.clone());

        assert!(CommandInvocation::new("mark", body).run().await.unwrap());
        assert!(vault.contains_file("Notes/marker.md"));
    }

    #[test]
    fn test_root_active_file_is_rejected_by_action() {
        let vault = Arc::new(MemoryVault::new().with_file("today.md", "").with_active("today.md"));
        let mut invocation =
            CommandInvocation::new("mark", FolderInvocation::new(Arc::new(RejectRoot), vault));

        assert!(!invocation.can_execute());
        assert_eq!(invocation.inner().folder(), Some(&FolderRef::root()));
    }

    #[test]
    fn test_no_active_file_is_infeasible() {
        let vault = Arc::new(MemoryVault::new());
        let mut invocation =
            CommandInvocation::new("mark", FolderInvocation::new(Arc::new(RejectRoot), vault));

        assert!(!invocation.can_execute());
        assert!(invocation.inner().folder().is_none());
    }

    #[test]
    fn test_explicit_folder() {
        let vault = Arc::new(MemoryVault::new().with_active("Elsewhere/x.md"));
        let body = FolderInvocation::new(Arc::new(RejectRoot), vault)
            .with_folder(FolderRef::new("Projects"));
        let mut invocation = CommandInvocation::new("mark", body);

        assert!(invocation.can_execute());
        assert_eq!(invocation.inner().folder(), Some(&FolderRef::new("Projects")));
    }
}
