//! Commands acting on a folder.

use std::sync::Arc;

use super::menu::{add_checked_item, all_folders};
use super::{CommandBase, PluginContext};
use crate::core::{AbstractFile, Command, CommandKind, CommandResult, FolderRef};
use crate::host::{CommandRegistrar, CommandRegistration, Menu};
use crate::invocation::{
    CommandInvocation, FolderAction, FolderInvocation, Invoked, SequentialInvocation,
};

/// A command whose subject is a folder.
///
/// From the palette it acts on the folder of the active file.
pub struct FolderCommand {
    command: Command,
    context: PluginContext,
    action: Arc<dyn FolderAction>,
    file_menu: bool,
    files_menu: bool,
}

impl FolderCommand {
    pub fn new(context: &PluginContext, command: Command, action: impl FolderAction) -> Self {
        Self {
            command: context.bind(command, CommandKind::Folder),
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

    /// Build a fresh invocation for `folder`, or for the active file's folder.
    pub fn build_invocation(&self, folder: Option<FolderRef>) -> CommandInvocation<FolderInvocation> {
        let mut body =
            FolderInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()));
        if let Some(folder) = folder {
            body.set_folder(folder);
        }
        CommandInvocation::new(self.command.full_id(), body)
    }

    /// Build a fresh invocation over `folders`, in order.
    pub fn build_batch(
        &self,
        folders: Vec<FolderRef>,
    ) -> CommandInvocation<SequentialInvocation<FolderInvocation>> {
        let id = self.command.full_id();
        let batch = SequentialInvocation::from_subjects(&id, folders, |folder| {
            FolderInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()))
                .with_folder(folder)
        });
        CommandInvocation::new(id, batch)
    }

    /// Palette callback.
    pub fn check_callback(&self, checking: bool) -> Invoked {
        self.build_invocation(None).invoke(checking)
    }

    /// File menu listener; ignores files.
    pub fn handle_file_menu(self: &Arc<Self>, menu: &mut Menu, entry: &AbstractFile, source: &str) {
        let AbstractFile::Folder(folder) = entry else {
            return;
        };
        let this = Arc::clone(self);
        let subject = folder.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().file_section.as_deref(),
            || self.action.should_add_to_menu(folder, source),
            move || this.build_invocation(Some(subject.clone())),
        );
    }

    /// Files menu listener; only for selections made entirely of folders.
    pub fn handle_files_menu(
        self: &Arc<Self>,
        menu: &mut Menu,
        entries: &[AbstractFile],
        source: &str,
    ) {
        let Some(folders) = all_folders(entries) else {
            return;
        };
        let this = Arc::clone(self);
        let subjects = folders.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().files_section.as_deref(),
            || folders.iter().all(|folder| self.action.should_add_to_menu(folder, source)),
            move || this.build_batch(subjects.clone()),
        );
    }
}

impl CommandBase for FolderCommand {
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
