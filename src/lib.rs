//! # vaultcmd
//!
//! Command invocation lifecycle and menu registration for note-vault plugins.
//!
//! A plugin describes its commands once and binds each to a subject kind:
//! nothing, the active editor, a file, a folder, or either of the latter.
//! Every trigger builds a fresh invocation that is checked before it may
//! execute, so palette entries and context menu items are only offered when
//! the command can actually run.
//!
//! ## Features
//!
//! - **Check-then-execute**: a single-use invocation protocol with contract checks
//! - **Subject resolution**: explicit subjects with active-file fallback
//! - **Batches**: one command over an ordered multi-selection
//! - **Menus**: file, files and editor menu items built from passing checks
//! - **Fuzzy Search**: palette lookup powered by nucleo
//!
//! ## Quick Start
//!
//! ```bash
//! # List palette commands for a vault
//! vaultcmd --vault ~/notes list
//!
//! # Archive the active note
//! vaultcmd --vault ~/notes --active today.md run archive-note
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::redundant_clone)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::new_without_default)]

pub mod builtin;
pub mod commands;
pub mod core;
pub mod host;
pub mod invocation;

// Re-export commonly used types
pub use commands::{
    AbstractFileCommand, CommandBase, EditorCommand, FileCommand, FolderCommand, GlobalCommand,
    PluginContext,
};
pub use core::{
    AbstractFile, Command, CommandError, CommandKind, CommandRegistry, CommandResult, Config,
    ContractViolation, FileRef, FolderRef,
};
pub use host::{DiskVault, EditorView, Menu, MemoryEditor, MemoryVault, Vault};
pub use invocation::{CommandInvocation, Invocation, InvocationState, Invoked};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "vaultcmd";
