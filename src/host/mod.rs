//! Host surface for commands.
//!
//! This module defines the interface the host application provides to
//! command plugins: vault and editor state, context menus, and the
//! registration hooks for the palette and menu extension points.
//!
//! The traits keep the command core independent of any real host.
//! `MemoryVault`, `DiskVault` and `MemoryEditor` are adapters for tests
//! and for the `vaultcmd` binary.

mod disk;
mod editor;
mod menu;
mod registrar;
mod vault;

pub use disk::DiskVault;
pub use editor::{Editor, EditorView, MemoryEditor};
pub use menu::{ClickHandler, Menu, MenuItem};
pub use registrar::{
    Callback, CheckCallback, CommandRegistrar, CommandRegistration, EditorCheckCallback,
    EditorMenuHandler, FileMenuHandler, FilesMenuHandler,
};
pub use vault::{MemoryVault, Vault};
