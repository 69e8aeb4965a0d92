//! Menu item wiring shared by all command kinds.

use crate::core::{AbstractFile, Command, FileRef, FolderRef};
use crate::host::Menu;
use crate::invocation::{CommandInvocation, Invocation};

/// Add an item for `command` if a fresh invocation passes its check and
/// `should_add` agrees.
///
/// The checking invocation is discarded. Each click builds a new invocation
/// with `build` so the subject is validated again at click time.
pub(crate) fn add_checked_item<I, F>(
    menu: &mut Menu,
    command: &Command,
    section: Option<&str>,
    should_add: impl FnOnce() -> bool,
    build: F,
) where
    I: Invocation,
    F: Fn() -> CommandInvocation<I> + Send + Sync + 'static,
{
    if !build().invoke(true).feasible() {
        tracing::trace!(command = %command.full_id(), "Not in menu: check failed");
        return;
    }
    if !should_add() {
        tracing::trace!(command = %command.full_id(), "Not in menu: declined by command");
        return;
    }

    let title = command.name.clone();
    let icon = command.icon.clone();
    let section = section.map(str::to_string);
    menu.add_item(move |item| {
        item.set_title(title).set_icon(icon).set_section(section).on_click(move || build().invoke(false));
    });
}

/// All entries as files, or `None` if any entry is a folder.
pub(crate) fn all_files(entries: &[AbstractFile]) -> Option<Vec<FileRef>> {
    entries.iter().map(|entry| entry.as_file().cloned()).collect()
}

/// All entries as folders, or `None` if any entry is a file.
pub(crate) fn all_folders(entries: &[AbstractFile]) -> Option<Vec<FolderRef>> {
    entries.iter().map(|entry| entry.as_folder().cloned()).collect()
}
