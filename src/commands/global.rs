//! Commands without a subject.

use std::sync::Arc;

use super::{CommandBase, PluginContext};
use crate::core::{Command, CommandKind, CommandResult};
use crate::host::{CommandRegistrar, CommandRegistration};
use crate::invocation::{CommandInvocation, GlobalAction, GlobalInvocation, Invoked};

/// A command that only appears in the palette.
pub struct GlobalCommand {
    command: Command,
    context: PluginContext,
    action: Arc<dyn GlobalAction>,
}

impl GlobalCommand {
    /// Create a palette-only command owned by `context`'s plugin.
    pub fn new(context: &PluginContext, command: Command, action: impl GlobalAction) -> Self {
        Self {
            command: context.bind(command, CommandKind::Global),
            context: context.clone(),
            action: Arc::new(action),
        }
    }

    /// Build a fresh invocation.
    pub fn build_invocation(&self) -> CommandInvocation<GlobalInvocation> {
        let body = GlobalInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()));
        CommandInvocation::new(self.command.full_id(), body)
    }

    /// Palette callback.
    pub fn check_callback(&self, checking: bool) -> Invoked {
        self.build_invocation().invoke(checking)
    }
}

impl CommandBase for GlobalCommand {
    fn command(&self) -> &Command {
        &self.command
    }

    fn register(self: Arc<Self>, registrar: &mut dyn CommandRegistrar) -> CommandResult<()> {
        let this = Arc::clone(&self);
        registrar.add_command(CommandRegistration::check(self.command.clone(), move |checking| {
            this.check_callback(checking)
        }))?;
        Ok(())
    }
}
