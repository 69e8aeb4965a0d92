//! Commands acting on a single file.

use std::sync::Arc;

use super::menu::{add_checked_item, all_files};
use super::{CommandBase, PluginContext};
use crate::core::{AbstractFile, Command, CommandKind, CommandResult, FileRef};
use crate::host::{CommandRegistrar, CommandRegistration, Menu};
use crate::invocation::{CommandInvocation, FileAction, FileInvocation, Invoked, SequentialInvocation};

/// A command whose subject is a file.
///
/// The palette entry acts on the active file. The file menu offers the
/// command for a single file; the files menu offers one entry that runs
/// the command over the whole selection, in order.
pub struct FileCommand {
    command: Command,
    context: PluginContext,
    action: Arc<dyn FileAction>,
    file_menu: bool,
    files_menu: bool,
}

impl FileCommand {
    /// Create a file command shown in both file menus.
    pub fn new(context: &PluginContext, command: Command, action: impl FileAction) -> Self {
        Self {
            command: context.bind(command, CommandKind::File),
            context: context.clone(),
            action: Arc::new(action),
            file_menu: true,
            files_menu: true,
        }
    }

    /// Enable or disable the single-file menu entry.
    #[must_use]
    pub fn with_file_menu(mut self, enabled: bool) -> Self {
        self.file_menu = enabled;
        self
    }

    /// Enable or disable the multi-selection menu entry.
    #[must_use]
    pub fn with_files_menu(mut self, enabled: bool) -> Self {
        self.files_menu = enabled;
        self
    }

    /// Build a fresh invocation for `file`, or for the active file.
    pub fn build_invocation(&self, file: Option<FileRef>) -> CommandInvocation<FileInvocation> {
        let mut body = FileInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()));
        if let Some(file) = file {
            body.set_file(file);
        }
        CommandInvocation::new(self.command.full_id(), body)
    }

    /// Build a fresh invocation over `files`, in order.
    pub fn build_batch(
        &self,
        files: Vec<FileRef>,
    ) -> CommandInvocation<SequentialInvocation<FileInvocation>> {
        let id = self.command.full_id();
        let batch = SequentialInvocation::from_subjects(&id, files, |file| {
            FileInvocation::new(Arc::clone(&self.action), Arc::clone(self.context.vault()))
                .with_file(file)
        });
        CommandInvocation::new(id, batch)
    }

    /// Palette callback.
    pub fn check_callback(&self, checking: bool) -> Invoked {
        self.build_invocation(None).invoke(checking)
    }

    /// File menu listener.
    pub fn handle_file_menu(self: &Arc<Self>, menu: &mut Menu, entry: &AbstractFile, source: &str) {
        let AbstractFile::File(file) = entry else {
            return;
        };
        let this = Arc::clone(self);
        let subject = file.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().file_section.as_deref(),
            || self.action.should_add_to_menu(file, source),
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
        let Some(files) = all_files(entries) else {
            return;
        };
        let this = Arc::clone(self);
        let subjects = files.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().files_section.as_deref(),
            || files.iter().all(|file| self.action.should_add_to_menu(file, source)),
            move || this.build_batch(subjects.clone()),
        );
    }
}

impl CommandBase for FileCommand {
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
