//! Vault backed by a directory on disk.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use walkdir::WalkDir;

use super::vault::{validate_path, Vault};
use crate::core::{AbstractFile, CommandError, CommandResult, FileRef, FolderRef};

/// A vault rooted at a directory.
///
/// Entries whose name starts with a dot (`.obsidian`, `.trash`, ...) are
/// reachable by path but skipped when listing files.
#[derive(Debug)]
pub struct DiskVault {
    root: PathBuf,
    active: RwLock<Option<FileRef>>,
}

impl DiskVault {
    /// Open a vault rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> CommandResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CommandError::Vault(format!("not a directory: {}", root.display())));
        }
        Ok(Self { root, active: RwLock::new(None) })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Change the active file.
    pub fn set_active_file(&self, file: Option<FileRef>) {
        *self.active.write() = file;
    }

    fn full_path(&self, path: &str) -> CommandResult<PathBuf> {
        Ok(self.root.join(validate_path(path)?))
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
        Some(parts.join("/"))
    }
}

impl Vault for DiskVault {
    fn active_file(&self) -> Option<FileRef> {
        self.active.read().clone()
    }

    fn get_abstract_file_by_path(&self, path: &str) -> Option<AbstractFile> {
        if path.trim_matches('/').is_empty() {
            return Some(AbstractFile::Folder(FolderRef::root()));
        }
        let full = self.full_path(path).ok()?;
        let metadata = std::fs::metadata(full).ok()?;
        if metadata.is_dir() {
            Some(AbstractFile::Folder(FolderRef::new(path)))
        } else {
            Some(AbstractFile::File(FileRef::new(path)))
        }
    }

    fn files(&self) -> Vec<FileRef> {
        let mut files: Vec<FileRef> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.relative(entry.path()))
            .map(FileRef::new)
            .collect();
        files.sort();
        files
    }

    fn read(&self, file: &FileRef) -> CommandResult<String> {
        Ok(std::fs::read_to_string(self.full_path(file.path())?)?)
    }

    fn create(&self, path: &str, contents: &str) -> CommandResult<FileRef> {
        let full = self.full_path(path)?;
        if full.exists() {
            return Err(CommandError::Vault(format!("already exists: {path}")));
        }
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, contents)?;
        tracing::debug!(path = %path, "Created file");
        Ok(FileRef::new(path))
    }

    fn create_folder(&self, path: &str) -> CommandResult<FolderRef> {
        let full = self.full_path(path)?;
        if full.is_file() {
            return Err(CommandError::Vault(format!("a file exists at {path}")));
        }
        std::fs::create_dir_all(full)?;
        Ok(FolderRef::new(path))
    }

    fn rename(&self, entry: &AbstractFile, new_path: &str) -> CommandResult<AbstractFile> {
        if let AbstractFile::Folder(folder) = entry {
            if folder.is_root() {
                return Err(CommandError::Vault("cannot move the vault root".to_string()));
            }
        }
        let from = self.full_path(entry.path())?;
        let to = self.full_path(new_path)?;
        if to.exists() {
            return Err(CommandError::Vault(format!("already exists: {new_path}")));
        }
        if to.starts_with(&from) {
            return Err(CommandError::Vault(format!("cannot move {entry} into itself")));
        }
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::rename(&from, &to)?;
        tracing::debug!(from = %entry, to = %new_path, "Moved entry");

        let renamed = match entry {
            AbstractFile::File(_) => AbstractFile::File(FileRef::new(new_path)),
            AbstractFile::Folder(_) => AbstractFile::Folder(FolderRef::new(new_path)),
        };

        let mut active = self.active.write();
        let moved_active = active.as_ref().and_then(|file| match entry {
            AbstractFile::File(moved) if moved == file => Some(FileRef::new(new_path)),
            AbstractFile::Folder(folder) if file.is_in(folder) => Some(FileRef::new(format!(
                "{}{}",
                renamed.path(),
                &file.path()[folder.path().len()..]
            ))),
            _ => None,
        });
        if moved_active.is_some() {
            *active = moved_active;
        }
        Ok(renamed)
    }
}
