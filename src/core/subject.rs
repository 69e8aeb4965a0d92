//! Command subjects and their resolution.
//!
//! A subject is the thing a command acts on. Subjects are snapshots of
//! host state taken once, when an invocation is checked.

use serde::{Deserialize, Serialize};

use crate::host::Vault;

/// A file inside the vault, addressed by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileRef {
    path: String,
}

impl FileRef {
    /// Create a file reference. Leading and trailing slashes are dropped.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self { path: normalize_path(path.as_ref()) }
    }

    /// Vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name including the extension.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// File name without the extension.
    pub fn basename(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(dot) => &name[..dot],
        }
    }

    /// Extension without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(dot) => Some(&name[dot + 1..]),
        }
    }

    /// Folder containing this file.
    pub fn parent(&self) -> FolderRef {
        match self.path.rfind('/') {
            Some(slash) => FolderRef::new(&self.path[..slash]),
            None => FolderRef::root(),
        }
    }

    /// Check if this file lives under `folder`, at any depth.
    pub fn is_in(&self, folder: &FolderRef) -> bool {
        folder.contains_path(&self.path)
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// A folder inside the vault. The root folder has an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FolderRef {
    path: String,
}

impl FolderRef {
    /// Create a folder reference. `""` and `"/"` name the root.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self { path: normalize_path(path.as_ref()) }
    }

    /// The vault root.
    pub fn root() -> Self {
        Self { path: String::new() }
    }

    /// Check if this is the vault root.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Vault-relative path (empty for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Folder name (empty for the root).
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Parent folder, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.path.rfind('/') {
            Some(slash) => Self::new(&self.path[..slash]),
            None => Self::root(),
        })
    }

    /// Path of a direct child entry named `name`.
    pub fn child_path(&self, name: &str) -> String {
        if self.is_root() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        }
    }

    /// Check if `path` is inside this folder, at any depth.
    pub fn contains_path(&self, path: &str) -> bool {
        if self.is_root() {
            return !path.is_empty();
        }
        path.strip_prefix(self.path.as_str()).is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Display for FolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.path)
        }
    }
}

/// Either a file or a folder, as delivered by file-explorer menus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbstractFile {
    /// A file
    File(FileRef),
    /// A folder
    Folder(FolderRef),
}

impl AbstractFile {
    /// Vault-relative path.
    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => file.path(),
            Self::Folder(folder) => folder.path(),
        }
    }

    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => file.name(),
            Self::Folder(folder) => folder.name(),
        }
    }

    /// Get the file, if this is one.
    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    /// Get the folder, if this is one.
    pub fn as_folder(&self) -> Option<&FolderRef> {
        match self {
            Self::File(_) => None,
            Self::Folder(folder) => Some(folder),
        }
    }
}

impl From<FileRef> for AbstractFile {
    fn from(file: FileRef) -> Self {
        Self::File(file)
    }
}

impl From<FolderRef> for AbstractFile {
    fn from(folder: FolderRef) -> Self {
        Self::Folder(folder)
    }
}

impl std::fmt::Display for AbstractFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(file) => file.fmt(f),
            Self::Folder(folder) => folder.fmt(f),
        }
    }
}

/// Outcome of resolving a subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// A subject was found
    Resolved(T),
    /// No source could supply a subject
    Unresolved,
}

impl<T> Resolution<T> {
    /// Try the next source only when nothing has been resolved yet.
    pub fn or_else(self, next: impl FnOnce() -> Option<T>) -> Self {
        match self {
            Self::Resolved(subject) => Self::Resolved(subject),
            Self::Unresolved => next().into(),
        }
    }

    /// Check if a subject was found.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Convert into an `Option`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Resolved(subject) => Some(subject),
            Self::Unresolved => None,
        }
    }
}

impl<T> From<Option<T>> for Resolution<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unresolved, Self::Resolved)
    }
}

/// Resolve a file subject: the explicit file, else the active file.
pub fn resolve_file(explicit: Option<&FileRef>, vault: &dyn Vault) -> Resolution<FileRef> {
    Resolution::from(explicit.cloned()).or_else(|| vault.active_file())
}

/// Resolve a folder subject: the explicit folder, else the active file's folder.
pub fn resolve_folder(explicit: Option<&FolderRef>, vault: &dyn Vault) -> Resolution<FolderRef> {
    Resolution::from(explicit.cloned()).or_else(|| vault.active_folder())
}

/// Resolve a file-or-folder subject: the explicit entry, else the active file.
pub fn resolve_abstract_file(
    explicit: Option<&AbstractFile>,
    vault: &dyn Vault,
) -> Resolution<AbstractFile> {
    Resolution::from(explicit.cloned()).or_else(|| vault.active_file().map(AbstractFile::File))
}

fn normalize_path(path: &str) -> String {
    path.trim_matches('/').to_string()
}
