//! Core types for vaultcmd.
//!
//! This module contains the fundamental data structures used throughout
//! the crate: command descriptors, subjects, the registry, configuration,
//! and errors.

mod command;
mod config;
mod error;
mod registry;
mod subject;

pub use command::{Command, CommandKind};
pub use config::{CommandsConfig, Config, GeneralConfig, MenuConfig};
pub use error::{CommandError, CommandResult, ContractViolation};
pub use registry::CommandRegistry;
pub use subject::{
    resolve_abstract_file, resolve_file, resolve_folder, AbstractFile, FileRef, FolderRef,
    Resolution,
};
