//! Command registration surface.
//!
//! Plugins hand `CommandRegistration`s and menu listeners to a
//! `CommandRegistrar`. The host later calls back into them when the palette
//! is opened or a context menu is being built.

use std::sync::Arc;

use super::{EditorView, Menu};
use crate::core::{AbstractFile, Command, CommandResult};
use crate::invocation::Invoked;

/// Palette callback for commands without an editor: `(checking) -> Invoked`.
pub type CheckCallback = Arc<dyn Fn(bool) -> Invoked + Send + Sync>;

/// Palette callback for editor commands: `(checking, view) -> Invoked`.
pub type EditorCheckCallback = Arc<dyn Fn(bool, &EditorView) -> Invoked + Send + Sync>;

/// Listener for the single-entry file menu: `(menu, entry, source)`.
pub type FileMenuHandler = Arc<dyn Fn(&mut Menu, &AbstractFile, &str) + Send + Sync>;

/// Listener for the multi-selection files menu: `(menu, entries, source)`.
pub type FilesMenuHandler = Arc<dyn Fn(&mut Menu, &[AbstractFile], &str) + Send + Sync>;

/// Listener for the editor context menu.
pub type EditorMenuHandler = Arc<dyn Fn(&mut Menu, &EditorView) + Send + Sync>;

/// The palette callback a command registers.
#[derive(Clone)]
pub enum Callback {
    /// Global, file and folder commands.
    Check(CheckCallback),
    /// Editor commands.
    EditorCheck(EditorCheckCallback),
}

/// A command as handed to the host palette.
#[derive(Clone)]
pub struct CommandRegistration {
    /// Descriptor
    pub command: Command,

    /// Palette callback
    pub callback: Callback,
}

impl CommandRegistration {
    /// Registration with a plain check callback.
    pub fn check(command: Command, callback: impl Fn(bool) -> Invoked + Send + Sync + 'static) -> Self {
        Self { command, callback: Callback::Check(Arc::new(callback)) }
    }

    /// Registration with an editor check callback.
    pub fn editor_check(
        command: Command,
        callback: impl Fn(bool, &EditorView) -> Invoked + Send + Sync + 'static,
    ) -> Self {
        Self { command, callback: Callback::EditorCheck(Arc::new(callback)) }
    }
}

impl std::fmt::Debug for CommandRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callback = match self.callback {
            Callback::Check(_) => "check",
            Callback::EditorCheck(_) => "editor-check",
        };
        f.debug_struct("CommandRegistration")
            .field("command", &self.command)
            .field("callback", &callback)
            .finish()
    }
}

/// Host interface for registering commands and menu listeners.
pub trait CommandRegistrar {
    /// Add a command to the palette.
    ///
    /// Returns `Ok(false)` when the host declines the command. The command
    /// must then not register any menu listeners either.
    fn add_command(&mut self, registration: CommandRegistration) -> CommandResult<bool>;

    /// Listen for single-entry file menus.
    fn on_file_menu(&mut self, handler: FileMenuHandler);

    /// Listen for multi-selection files menus.
    fn on_files_menu(&mut self, handler: FilesMenuHandler);

    /// Listen for editor context menus.
    fn on_editor_menu(&mut self, handler: EditorMenuHandler);
}
