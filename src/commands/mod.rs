//! Command kinds a plugin can register.
//!
//! Each kind binds an action to a subject and wires it into the host:
//!
//! - `GlobalCommand`: palette only
//! - `EditorCommand`: palette while an editor is active, editor menu
//! - `FileCommand`: palette on the active file, file and files menus
//! - `FolderCommand`: palette on the active file's folder, file and files menus
//! - `AbstractFileCommand`: palette on the active file, file and files menus
//!
//! Menu entries are only added when a fresh invocation for the entry passes
//! its check. Clicking an entry builds and checks yet another invocation.

mod abstract_file;
mod base;
mod editor;
mod file;
mod folder;
mod global;
mod menu;

pub use abstract_file::AbstractFileCommand;
pub use base::{CommandBase, PluginContext};
pub use editor::EditorCommand;
pub use file::FileCommand;
pub use folder::FolderCommand;
pub use global::GlobalCommand;
