//! Commands acting on either a file or a folder.

use std::sync::Arc;

use super::menu::add_checked_item;
use super::{CommandBase, PluginContext};
use crate::core::{AbstractFile, Command, CommandKind, CommandResult};
use crate::host::{CommandRegistrar, CommandRegistration, Menu};
use crate::invocation::{
    AbstractFileAction, AbstractFileInvocation, CommandInvocation, Invoked, SequentialInvocation,
};

/// A command whose subject may be a file or a folder.
///
/// From the palette it acts on the active file. Mixed selections are
/// accepted by the files menu.
pub struct AbstractFileCommand {
    command: Command,
    context: PluginContext,
    action: Arc<dyn AbstractFileAction>,
    file_menu: bool,
    files_menu: bool,
}

impl AbstractFileCommand {
    pub fn new(context: &PluginContext, command: Command, action: impl AbstractFileAction) -> Self {
        Self {
            command: context.bind(command, CommandKind::AbstractFile),
            context: context.clone(),
            action: Arc::new(action),
            file_menu: true,
            files_menu: true,
        }
    }

    #[must_use]
    pub fn with_file_menu(mut self, enabled: bool) -> Self {
        self.file_menu = enabled;
        self
    }

    #[must_use]
    pub fn with_files_menu(mut self, enabled: bool) -> Self {
        self.files_menu = enabled;
        self
    }

    /// Build a fresh invocation for `entry`, or for the active file.
    pub fn build_invocation(
        &self,
        entry: Option<AbstractFile>,
    ) -> CommandInvocation<AbstractFileInvocation> {
        let mut body =
            AbstractFileInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()));
        if let Some(entry) = entry {
            body.set_entry(entry);
        }
        CommandInvocation::new(self.command.full_id(), body)
    }

    /// Build a fresh invocation over `entries`, in order.
    pub fn build_batch(
        &self,
        entries: Vec<AbstractFile>,
    ) -> CommandInvocation<SequentialInvocation<AbstractFileInvocation>> {
        let id = self.command.full_id();
        let batch = SequentialInvocation::from_subjects(&id, entries, |entry| {
            AbstractFileInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()))
                .with_entry(entry)
        });
        CommandInvocation::new(id, batch)
    }

    /// Palette callback.
    pub fn check_callback(&self, checking: bool) -> Invoked {
        self.build_invocation(None).invoke(checking)
    }

    /// File menu listener.
    pub fn handle_file_menu(self: &Arc<Self>, menu: &mut Menu, entry: &AbstractFile, source: &str) {
        let this = Arc::clone(self);
        let subject = entry.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().file_section.as_deref(),
            || self.action.should_add_to_menu(entry, source),
            move || this.build_invocation(Some(subject.clone())),
        );
    }

    /// Files menu listener.
    pub fn handle_files_menu(
        self: &Arc<Self>,
        menu: &mut Menu,
        entries: &[AbstractFile],
        source: &str,
    ) {
        let this = Arc::clone(self);
        let subjects = entries.to_vec();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().files_section.as_deref(),
            || entries.iter().all(|entry| self.action.should_add_to_menu(entry, source)),
            move || this.build_batch(subjects.clone()),
        );
    }
}

impl CommandBase for AbstractFileCommand {
    fn command(&self) -> &Command {
        &self.command
    }

    fn register(self: Arc<Self>, registrar: &mut dyn CommandRegistrar) -> CommandResult<()> {
        let this = Arc::clone(&self);
        let registration =
            CommandRegistration::check(self.command.clone(), move |checking| this.check_callback(checking));
        let added = registrar.add_command(registration)?;

        if added && self.context.menus().shows(&self.command) {
            if self.file_menu {
                let this = Arc::clone(&self);
                registrar.on_file_menu(Arc::new(
                    move |menu: &mut Menu, entry: &AbstractFile, source: &str| {
                        this.handle_file_menu(menu, entry, source);
                    },
                ));
            }
            if self.files_menu {
                let this = Arc::clone(&self);
                registrar.on_files_menu(Arc::new(
                    move |menu: &mut Menu, entries: &[AbstractFile], source: &str| {
                        this.handle_files_menu(menu, entries, source);
                    },
                ));
            }
        }
        Ok(())
    }
}
