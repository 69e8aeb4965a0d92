//! Invocations without a subject.

use std::sync::Arc;

use async_trait::async_trait;

use super::Invocation;
use crate::host::Vault;

/// What a global command does.
#[async_trait]
pub trait GlobalAction: Send + Sync + 'static {
    /// Feasibility given the current vault state.
    fn can_execute(&self, _vault: &dyn Vault) -> bool {
        true
    }

    /// Perform the command.
    async fn execute(&self, vault: &dyn Vault) -> anyhow::Result<()>;
}

/// Invocation of a global action.
pub struct GlobalInvocation {
    action: Arc<dyn GlobalAction>,
    vault: Arc<dyn Vault>,
}

impl GlobalInvocation {
    /// Create an invocation.
    pub fn new(action: Arc<dyn GlobalAction>, vault: Arc<dyn Vault>) -> Self {
        Self { action, vault }
    }
}

#[async_trait]
impl Invocation for GlobalInvocation {
    fn can_execute(&mut self) -> bool {
        self.action.can_execute(self.vault.as_ref())
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        self.action.execute(self.vault.as_ref()).await
    }
}
