//! Running one command over an ordered batch of subjects.
//!
//! A `SequentialInvocation` is feasible only when the batch is non-empty and
//! every member is feasible. Members are checked in order and checking stops
//! at the first infeasible member. Execution awaits each member in order; the
//! first error aborts the remaining members and is returned unchanged, so a
//! member's contract violation is still visible on the batch error. Members
//! that already ran are not rolled back.

use async_trait::async_trait;

use super::{CommandInvocation, Invocation};

/// Invocation over an ordered list of per-subject invocations.
pub struct SequentialInvocation<I> {
    items: Vec<CommandInvocation<I>>,
}

impl<I: Invocation> SequentialInvocation<I> {
    /// Wrap already constructed member invocations.
    pub fn new(items: Vec<CommandInvocation<I>>) -> Self {
        Self { items }
    }

    /// Build one member per subject with `factory`.
    pub fn from_subjects<S>(
        command_id: &str,
        subjects: impl IntoIterator<Item = S>,
        mut factory: impl FnMut(S) -> I,
    ) -> Self {
        let items = subjects
            .into_iter()
            .map(|subject| CommandInvocation::new(command_id, factory(subject)))
            .collect();
        Self { items }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Member invocations, in execution order.
    pub fn items(&self) -> &[CommandInvocation<I>] {
        &self.items
    }
}

#[async_trait]
impl<I: Invocation> Invocation for SequentialInvocation<I> {
    fn can_execute(&mut self) -> bool {
        !self.items.is_empty() && self.items.iter_mut().all(CommandInvocation::can_execute)
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let total = self.items.len();
        for (index, item) in self.items.iter_mut().enumerate() {
            tracing::debug!(command = %item.command_id(), index, total, "Executing batch member");
            item.execute().await?;
        }
        Ok(())
    }
}
