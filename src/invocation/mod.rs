//! Command invocations.
//!
//! Every trigger of a command (palette, menu open, menu click) builds a
//! fresh `CommandInvocation`. The invocation is checked first; only a
//! passing check allows the single `execute` that follows.
//!
//! # Subject kinds
//!
//! - **Global**: no subject
//! - **Editor**: an editor view that must be backed by a file
//! - **File**: an explicit file, else the active file
//! - **Folder**: an explicit folder, else the active file's folder
//! - **AbstractFile**: an explicit file or folder, else the active file
//!
//! `SequentialInvocation` runs any of these over an ordered batch.

mod abstract_file;
mod editor;
mod file;
mod folder;
mod global;
mod protocol;
mod sequential;

pub use abstract_file::{AbstractFileAction, AbstractFileInvocation};
pub use editor::{EditorAction, EditorInvocation};
pub use file::{FileAction, FileInvocation};
pub use folder::{FolderAction, FolderInvocation};
pub use global::{GlobalAction, GlobalInvocation};
pub use protocol::{CommandInvocation, ExecutionHandle, Invocation, InvocationState, Invoked};
pub use sequential::SequentialInvocation;
