//! Vault access for commands.
//!
//! The `Vault` trait is the subject-resolution surface the host provides:
//! active-file lookups, path lookups and the few mutations built-in commands
//! perform. `MemoryVault` keeps everything in memory.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use crate::core::{AbstractFile, CommandError, CommandResult, FileRef, FolderRef};

/// Host interface for vault state.
///
/// Lookups are synchronous and return `None` when nothing matches.
pub trait Vault: Send + Sync {
    /// Get the file shown in the active view.
    fn active_file(&self) -> Option<FileRef>;

    /// Get the folder containing the active file.
    fn active_folder(&self) -> Option<FolderRef> {
        self.active_file().map(|file| file.parent())
    }

    /// Look up a file or folder by vault-relative path.
    fn get_abstract_file_by_path(&self, path: &str) -> Option<AbstractFile>;

    /// Look up a file by vault-relative path.
    fn get_file_by_path(&self, path: &str) -> Option<FileRef> {
        match self.get_abstract_file_by_path(path) {
            Some(AbstractFile::File(file)) => Some(file),
            _ => None,
        }
    }

    /// Look up a folder by vault-relative path.
    fn get_folder_by_path(&self, path: &str) -> Option<FolderRef> {
        match self.get_abstract_file_by_path(path) {
            Some(AbstractFile::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    /// List all files, sorted by path.
    fn files(&self) -> Vec<FileRef>;

    /// Read a file's contents.
    fn read(&self, file: &FileRef) -> CommandResult<String>;

    /// Create a new file. Missing parent folders are created.
    fn create(&self, path: &str, contents: &str) -> CommandResult<FileRef>;

    /// Create a folder and its missing parents.
    fn create_folder(&self, path: &str) -> CommandResult<FolderRef>;

    /// Move a file or folder to `new_path`.
    fn rename(&self, entry: &AbstractFile, new_path: &str) -> CommandResult<AbstractFile>;
}

/// Check a vault-relative path for components that would leave the vault.
pub(crate) fn validate_path(path: &str) -> CommandResult<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(CommandError::Vault("empty path".to_string()));
    }
    if trimmed.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
        return Err(CommandError::Vault(format!("invalid path: {path}")));
    }
    Ok(trimmed.to_string())
}

/// In-memory vault.
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: RwLock<BTreeMap<String, String>>,
    folders: RwLock<BTreeSet<String>>,
    active: RwLock<Option<FileRef>>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent folders.
    #[must_use]
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        let file = FileRef::new(path);
        self.add_parents(&file.parent());
        self.files.write().insert(file.path().to_string(), contents.to_string());
        self
    }

    /// Add an empty folder.
    #[must_use]
    pub fn with_folder(self, path: &str) -> Self {
        self.add_parents(&FolderRef::new(path));
        self
    }

    /// Set the active file.
    #[must_use]
    pub fn with_active(self, path: &str) -> Self {
        self.set_active_file(Some(FileRef::new(path)));
        self
    }

    /// Change the active file, as the host does when the user navigates.
    pub fn set_active_file(&self, file: Option<FileRef>) {
        *self.active.write() = file;
    }

    /// Check whether a file exists.
    pub fn contains_file(&self, path: &str) -> bool {
        self.files.read().contains_key(path.trim_matches('/'))
    }

    /// Check whether a folder exists.
    pub fn contains_folder(&self, path: &str) -> bool {
        self.folders.read().contains(path.trim_matches('/'))
    }

    fn add_parents(&self, folder: &FolderRef) {
        let mut folders = self.folders.write();
        let mut current = Some(folder.clone());
        while let Some(folder) = current {
            if folder.is_root() {
                break;
            }
            current = folder.parent();
            folders.insert(folder.path().to_string());
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().contains_key(path) || self.folders.read().contains(path)
    }
}

impl Vault for MemoryVault {
    fn active_file(&self) -> Option<FileRef> {
        self.active.read().clone()
    }

    fn get_abstract_file_by_path(&self, path: &str) -> Option<AbstractFile> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Some(AbstractFile::Folder(FolderRef::root()));
        }
        if self.files.read().contains_key(path) {
            return Some(AbstractFile::File(FileRef::new(path)));
        }
        if self.folders.read().contains(path) {
            return Some(AbstractFile::Folder(FolderRef::new(path)));
        }
        None
    }

    fn files(&self) -> Vec<FileRef> {
        self.files.read().keys().map(FileRef::new).collect()
    }

    fn read(&self, file: &FileRef) -> CommandResult<String> {
        self.files
            .read()
            .get(file.path())
            .cloned()
            .ok_or_else(|| CommandError::Vault(format!("file not found: {file}")))
    }

    fn create(&self, path: &str, contents: &str) -> CommandResult<FileRef> {
        let path = validate_path(path)?;
        if self.exists(&path) {
            return Err(CommandError::Vault(format!("already exists: {path}")));
        }
        let file = FileRef::new(&path);
        self.add_parents(&file.parent());
        self.files.write().insert(path, contents.to_string());
        Ok(file)
    }

    fn create_folder(&self, path: &str) -> CommandResult<FolderRef> {
        let path = validate_path(path)?;
        if self.files.read().contains_key(&path) {
            return Err(CommandError::Vault(format!("a file exists at {path}")));
        }
        let folder = FolderRef::new(&path);
        self.add_parents(&folder);
        Ok(folder)
    }

    fn rename(&self, entry: &AbstractFile, new_path: &str) -> CommandResult<AbstractFile> {
        let new_path = validate_path(new_path)?;
        if self.exists(&new_path) {
            return Err(CommandError::Vault(format!("already exists: {new_path}")));
        }

        match entry {
            AbstractFile::File(file) => {
                let contents = self
                    .files
                    .write()
                    .remove(file.path())
                    .ok_or_else(|| CommandError::Vault(format!("file not found: {file}")))?;
                let renamed = FileRef::new(&new_path);
                self.add_parents(&renamed.parent());
                self.files.write().insert(new_path, contents);

                // The host keeps the moved file open
                let mut active = self.active.write();
                if active.as_ref() == Some(file) {
                    *active = Some(renamed.clone());
                }
                Ok(AbstractFile::File(renamed))
            }
            AbstractFile::Folder(folder) => {
                if folder.is_root() || !self.folders.read().contains(folder.path()) {
                    return Err(CommandError::Vault(format!("folder not found: {folder}")));
                }
                if FolderRef::new(folder.path()).contains_path(&new_path) {
                    return Err(CommandError::Vault(format!(
                        "cannot move {folder} into itself"
                    )));
                }

                let rebase = |path: &str| format!("{}{}", new_path, &path[folder.path().len()..]);
                let is_moved = |path: &str| path == folder.path() || folder.contains_path(path);

                let moved_folders: Vec<String> =
                    self.folders.read().iter().filter(|p| is_moved(p.as_str())).cloned().collect();
                {
                    let mut folders = self.folders.write();
                    for path in &moved_folders {
                        folders.remove(path);
                        folders.insert(rebase(path.as_str()));
                    }
                }

                let moved_files: Vec<String> =
                    self.files.read().keys().filter(|p| is_moved(p.as_str())).cloned().collect();
                {
                    let mut files = self.files.write();
                    for path in &moved_files {
                        if let Some(contents) = files.remove(path) {
                            files.insert(rebase(path.as_str()), contents);
                        }
                    }
                }

                let renamed = FolderRef::new(&new_path);
                self.add_parents(&renamed);

                let mut active = self.active.write();
                let moved_active = active
                    .as_ref()
                    .filter(|file| file.is_in(folder))
                    .map(|file| FileRef::new(rebase(file.path())));
                if moved_active.is_some() {
                    *active = moved_active;
                }
                Ok(AbstractFile::Folder(renamed))
            }
        }
    }
}
