//! Built-in note commands.
//!
//! One command per subject kind, registered by the `vaultcmd` binary and
//! usable as a reference for plugin authors.

use std::sync::Arc;

use async_trait::async_trait;

use crate::commands::{
    AbstractFileCommand, CommandBase, EditorCommand, FileCommand, FolderCommand, GlobalCommand,
    PluginContext,
};
use crate::core::{AbstractFile, Command, FileRef, FolderRef};
use crate::host::{EditorView, Vault};
use crate::invocation::{AbstractFileAction, EditorAction, FileAction, FolderAction, GlobalAction};

/// Folder archived notes are moved into.
pub const ARCHIVE_FOLDER: &str = "Archive";

/// Folder trashed entries are moved into.
pub const TRASH_FOLDER: &str = ".trash";

/// Name new notes start from.
const UNTITLED: &str = "Untitled.md";

/// All built-in commands bound to `context`.
pub fn builtin_commands(context: &PluginContext) -> Vec<Arc<dyn CommandBase>> {
    vec![
        Arc::new(GlobalCommand::new(
            context,
            Command::new("new-note", "New note").with_icon("file-plus"),
            NewNote,
        )),
        Arc::new(FileCommand::new(
            context,
            Command::new("archive-note", "Archive Note").with_icon("archive"),
            ArchiveNote,
        )),
        Arc::new(FolderCommand::new(
            context,
            Command::new("new-note-in-folder", "New note in folder").with_icon("file-plus"),
            NewNoteInFolder,
        )),
        Arc::new(AbstractFileCommand::new(
            context,
            Command::new("move-to-trash", "Move to trash").with_icon("trash"),
            MoveToTrash,
        )),
        Arc::new(EditorCommand::new(
            context,
            Command::new("uppercase-selection", "Uppercase selection").with_icon("case-upper"),
            UppercaseSelection,
        )),
    ]
}

/// Creates an untitled note at the vault root.
pub struct NewNote;

#[async_trait]
impl GlobalAction for NewNote {
    async fn execute(&self, vault: &dyn Vault) -> anyhow::Result<()> {
        let path = available_path(vault, &FolderRef::root(), UNTITLED);
        let file = vault.create(&path, "")?;
        tracing::info!(file = %file, "Created note");
        Ok(())
    }
}

/// Moves a markdown note into the archive folder.
pub struct ArchiveNote;

#[async_trait]
impl FileAction for ArchiveNote {
    fn can_execute(&self, file: &FileRef) -> bool {
        file.extension() == Some("md") && !file.is_in(&FolderRef::new(ARCHIVE_FOLDER))
    }

    async fn execute(&self, file: &FileRef, vault: &dyn Vault) -> anyhow::Result<()> {
        let target = available_path(vault, &FolderRef::new(ARCHIVE_FOLDER), file.name());
        vault.rename(&AbstractFile::File(file.clone()), &target)?;
        tracing::info!(from = %file, to = %target, "Archived note");
        Ok(())
    }
}

/// Creates an untitled note inside a folder.
pub struct NewNoteInFolder;

#[async_trait]
impl FolderAction for NewNoteInFolder {
    fn can_execute(&self, folder: &FolderRef) -> bool {
        !is_trashed(folder.path())
    }

    async fn execute(&self, folder: &FolderRef, vault: &dyn Vault) -> anyhow::Result<()> {
        let path = available_path(vault, folder, UNTITLED);
        let file = vault.create(&path, "")?;
        tracing::info!(file = %file, "Created note");
        Ok(())
    }
}

/// Moves a file or folder into the trash folder.
pub struct MoveToTrash;

#[async_trait]
impl AbstractFileAction for MoveToTrash {
    fn can_execute(&self, entry: &AbstractFile) -> bool {
        match entry {
            AbstractFile::File(_) => true,
            AbstractFile::Folder(folder) => !folder.is_root() && folder.path() != TRASH_FOLDER,
        }
    }

    fn should_add_to_menu(&self, entry: &AbstractFile, _source: &str) -> bool {
        !is_trashed(entry.path())
    }

    async fn execute(&self, entry: &AbstractFile, vault: &dyn Vault) -> anyhow::Result<()> {
        let trash = FolderRef::new(TRASH_FOLDER);
        let target = match entry {
            AbstractFile::File(file) => available_path(vault, &trash, file.name()),
            AbstractFile::Folder(folder) => available_folder_path(vault, &trash, folder.name()),
        };
        vault.rename(entry, &target)?;
        tracing::info!(from = %entry, to = %target, "Moved to trash");
        Ok(())
    }
}

/// Uppercases the editor selection.
pub struct UppercaseSelection;

#[async_trait]
impl EditorAction for UppercaseSelection {
    fn can_execute(&self, view: &EditorView, _file: &FileRef) -> bool {
        !view.editor().selection().is_empty()
    }

    async fn execute(&self, view: &EditorView, _file: &FileRef) -> anyhow::Result<()> {
        let editor = view.editor();
        let upper = editor.selection().to_uppercase();
        editor.replace_selection(&upper);
        Ok(())
    }
}

fn is_trashed(path: &str) -> bool {
    path == TRASH_FOLDER || FolderRef::new(TRASH_FOLDER).contains_path(path)
}

/// First free file path in `folder`: `name`, then `stem 1.ext`, `stem 2.ext`, ...
fn available_path(vault: &dyn Vault, folder: &FolderRef, name: &str) -> String {
    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    first_free(vault, folder, name, |n| format!("{stem} {n}{extension}"))
}

fn available_folder_path(vault: &dyn Vault, folder: &FolderRef, name: &str) -> String {
    first_free(vault, folder, name, |n| format!("{name} {n}"))
}

fn first_free(
    vault: &dyn Vault,
    folder: &FolderRef,
    name: &str,
    numbered: impl Fn(usize) -> String,
) -> String {
    let mut candidate = folder.child_path(name);
    let mut n = 1;
    while vault.get_abstract_file_by_path(&candidate).is_some() {
        candidate = folder.child_path(&numbered(n));
        n += 1;
    }
    candidate
}
