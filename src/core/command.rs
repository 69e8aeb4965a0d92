//! Command descriptors.
//!
//! Defines the `Command` struct that describes a command a plugin
//! registers with the host: its identifier, display name and icon.

use serde::{Deserialize, Serialize};

/// Declarative description of a registered command.
///
/// Built once at plugin startup and never mutated after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Identifier, unique within the owning plugin
    pub id: String,

    /// Display name shown in the palette and in menus
    pub name: String,

    /// Optional icon identifier
    pub icon: Option<String>,

    /// Id of the plugin that owns this command
    pub plugin_id: String,

    /// Subject kind this command acts on
    #[serde(default)]
    pub kind: CommandKind,
}

impl Command {
    /// Create a new command with an explicit id.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
            plugin_id: String::new(),
            kind: CommandKind::Global,
        }
    }

    /// Create a command whose id is derived from its display name.
    ///
    /// `"Archive Note"` becomes `archive-note`.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = Self::generate_id(&name);
        Self::new(id, name)
    }

    /// Set the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the owning plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = plugin_id.into();
        self
    }

    /// Set the subject kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CommandKind) -> Self {
        self.kind = kind;
        self
    }

    /// Get the host-wide id (`plugin:id`).
    pub fn full_id(&self) -> String {
        if self.plugin_id.is_empty() {
            self.id.clone()
        } else {
            format!("{}:{}", self.plugin_id, self.id)
        }
    }

    /// Check if this command answers to the given id, full or short.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.full_id() == id
    }

    /// Get the text to use for fuzzy matching.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.name, self.id)
    }

    fn generate_id(name: &str) -> String {
        let mut id = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_alphanumeric() {
                id.extend(c.to_lowercase());
            } else if !id.is_empty() && !id.ends_with('-') {
                id.push('-');
            }
        }
        while id.ends_with('-') {
            id.pop();
        }
        id
    }
}

/// The kind of subject a command acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    /// No subject
    #[default]
    Global,

    /// Active editor and its backing file
    Editor,

    /// A single file
    File,

    /// A single folder
    Folder,

    /// A file or a folder
    AbstractFile,
}

impl CommandKind {
    /// Get the type name for display.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Editor => "editor",
            Self::File => "file",
            Self::Folder => "folder",
            Self::AbstractFile => "file-or-folder",
        }
    }

    /// Whether the palette callback needs an editor view.
    pub const fn needs_editor(&self) -> bool {
        matches!(self, Self::Editor)
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
