//! Command registry for palette entries and menu listeners.
//!
//! The registry is an in-process host adapter: it accepts registrations
//! through `CommandRegistrar`, answers palette checks, builds context menus
//! by running every menu listener, and provides fuzzy palette search using
//! the nucleo library.

use std::sync::Arc;

use nucleo::{
    pattern::{CaseMatching, Normalization},
    Config as MatcherConfig, Nucleo,
};
use parking_lot::Mutex;

use super::{AbstractFile, Command, CommandError, CommandResult, CommandsConfig, Config};
use crate::commands::CommandBase;
use crate::host::{
    Callback, CommandRegistrar, CommandRegistration, EditorMenuHandler, EditorView,
    FileMenuHandler, FilesMenuHandler, Menu,
};
use crate::invocation::Invoked;

/// Registry of commands and menu listeners.
pub struct CommandRegistry {
    /// Palette registrations, in registration order
    registrations: Vec<CommandRegistration>,

    file_menu_handlers: Vec<FileMenuHandler>,
    files_menu_handlers: Vec<FilesMenuHandler>,
    editor_menu_handlers: Vec<EditorMenuHandler>,

    /// Commands that must not be registered
    settings: CommandsConfig,

    /// Nucleo fuzzy matcher over command names
    matcher: Arc<Mutex<Nucleo<String>>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.registrations.len())
            .field("file_menu_handlers", &self.file_menu_handlers.len())
            .field("files_menu_handlers", &self.files_menu_handlers.len())
            .field("editor_menu_handlers", &self.editor_menu_handlers.len())
            .finish()
    }
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            file_menu_handlers: Vec::new(),
            files_menu_handlers: Vec::new(),
            editor_menu_handlers: Vec::new(),
            settings: CommandsConfig::default(),
            matcher: Arc::new(Mutex::new(Self::new_matcher())),
        }
    }

    /// Create a registry honouring the `[commands]` section of `config`.
    pub fn with_config(config: &Config) -> Self {
        let mut registry = Self::new();
        registry.settings = config.commands.clone();
        registry
    }

    fn new_matcher() -> Nucleo<String> {
        Nucleo::new(MatcherConfig::DEFAULT, Arc::new(|| {}), None, 1)
    }

    /// Register a command and its menu listeners.
    ///
    /// Returns `Ok(false)` when the command is disabled by configuration.
    pub fn register(&mut self, command: Arc<dyn CommandBase>) -> CommandResult<bool> {
        if self.settings.is_disabled(command.command()) {
            tracing::info!(command = %command.command().full_id(), "Skipping disabled command");
            return Ok(false);
        }
        command.register(self)?;
        Ok(true)
    }

    /// Register several commands, stopping at the first error.
    pub fn register_all(
        &mut self,
        commands: impl IntoIterator<Item = Arc<dyn CommandBase>>,
    ) -> CommandResult<usize> {
        let mut registered = 0;
        for command in commands {
            if self.register(command)? {
                registered += 1;
            }
        }
        Ok(registered)
    }

    /// Get total number of palette commands.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Get a registration by its index.
    pub fn get_by_index(&self, index: usize) -> Option<&CommandRegistration> {
        self.registrations.get(index)
    }

    /// Get a registration by full id, or by short id when that is unambiguous.
    pub fn get(&self, id: &str) -> Option<&CommandRegistration> {
        if let Some(exact) = self.registrations.iter().find(|r| r.command.full_id() == id) {
            return Some(exact);
        }
        let mut short = self.registrations.iter().filter(|r| r.command.id == id);
        match (short.next(), short.next()) {
            (Some(found), None) => Some(found),
            _ => None,
        }
    }

    /// All registered command descriptors.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.registrations.iter().map(|r| &r.command)
    }

    /// Run a palette callback without an editor.
    ///
    /// Editor commands are never feasible without an editor view.
    pub fn check(&self, id: &str, checking: bool) -> CommandResult<Invoked> {
        let registration = self.get(id).ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        Ok(match &registration.callback {
            Callback::Check(callback) => callback(checking),
            Callback::EditorCheck(_) => Invoked::rejected(),
        })
    }

    /// Run a palette callback while `view` is the active editor.
    pub fn check_editor(&self, id: &str, checking: bool, view: &EditorView) -> CommandResult<Invoked> {
        let registration = self.get(id).ok_or_else(|| CommandError::NotFound(id.to_string()))?;
        Ok(match &registration.callback {
            Callback::Check(callback) => callback(checking),
            Callback::EditorCheck(callback) => callback(checking, view),
        })
    }

    /// Commands whose palette check currently passes.
    pub fn available(&self, view: Option<&EditorView>) -> Vec<&Command> {
        self.registrations
            .iter()
            .filter(|r| match (&r.callback, view) {
                (Callback::Check(callback), _) => callback(true).feasible(),
                (Callback::EditorCheck(callback), Some(view)) => callback(true, view).feasible(),
                (Callback::EditorCheck(_), None) => false,
            })
            .map(|r| &r.command)
            .collect()
    }

    /// Build the context menu for a single file or folder.
    pub fn file_menu(&self, entry: &AbstractFile, source: &str) -> Menu {
        let mut menu = Menu::new();
        for handler in &self.file_menu_handlers {
            handler(&mut menu, entry, source);
        }
        menu
    }

    /// Build the context menu for a multi-selection.
    pub fn files_menu(&self, entries: &[AbstractFile], source: &str) -> Menu {
        let mut menu = Menu::new();
        for handler in &self.files_menu_handlers {
            handler(&mut menu, entries, source);
        }
        menu
    }

    /// Build the editor context menu.
    pub fn editor_menu(&self, view: &EditorView) -> Menu {
        let mut menu = Menu::new();
        for handler in &self.editor_menu_handlers {
            handler(&mut menu, view);
        }
        menu
    }

    /// Search commands with fuzzy matching.
    ///
    /// Returns indices of matching commands, sorted by match score.
    pub fn search(&self, pattern: &str) -> Vec<usize> {
        if pattern.is_empty() {
            return (0..self.registrations.len()).collect();
        }

        let mut matcher = self.matcher.lock();
        matcher.pattern.reparse(0, pattern, CaseMatching::Smart, Normalization::Smart, false);

        let status = matcher.tick(10);
        if status.running {
            matcher.tick(100);
        }

        // Matched items come back best first
        let snapshot = matcher.snapshot();
        (0..snapshot.matched_item_count())
            .filter_map(|i| snapshot.get_matched_item(i))
            .filter_map(|item| item.data.parse::<usize>().ok())
            .collect()
    }

    /// Remove every registration and listener.
    pub fn clear(&mut self) {
        self.registrations.clear();
        self.file_menu_handlers.clear();
        self.files_menu_handlers.clear();
        self.editor_menu_handlers.clear();
        self.matcher = Arc::new(Mutex::new(Self::new_matcher()));
    }
}

impl CommandRegistrar for CommandRegistry {
    fn add_command(&mut self, registration: CommandRegistration) -> CommandResult<bool> {
        let full_id = registration.command.full_id();
        if self.settings.is_disabled(&registration.command) {
            tracing::info!(command = %full_id, "Skipping disabled command");
            return Ok(false);
        }
        if self.registrations.iter().any(|r| r.command.full_id() == full_id) {
            return Err(CommandError::AlreadyRegistered(full_id));
        }

        let index = self.registrations.len();
        let match_text = registration.command.match_text();
        {
            let matcher = self.matcher.lock();
            let injector = matcher.injector();
            injector.push(index.to_string(), move |_, cols| {
                cols[0] = match_text.as_str().into();
            });
        }

        tracing::debug!(command = %full_id, kind = %registration.command.kind, "Registered command");
        self.registrations.push(registration);
        Ok(true)
    }

    fn on_file_menu(&mut self, handler: FileMenuHandler) {
        self.file_menu_handlers.push(handler);
    }

    fn on_files_menu(&mut self, handler: FilesMenuHandler) {
        self.files_menu_handlers.push(handler);
    }

    fn on_editor_menu(&mut self, handler: EditorMenuHandler) {
        self.editor_menu_handlers.push(handler);
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, feasible: bool) -> CommandRegistration {
        let command = Command::new(id, name).with_plugin("test");
        CommandRegistration::check(command, move |_| {
            if feasible {
                crate::invocation::CommandInvocation::new("noop", Noop).invoke(true)
            } else {
                Invoked::rejected()
            }
        })
    }

    struct Noop;

    impl crate::invocation::Invocation for Noop {}

    fn create_test_registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.add_command(entry("archive-note", "Archive Note", true)).unwrap();
        registry.add_command(entry("new-note", "New note", true)).unwrap();
        registry.add_command(entry("move-to-trash", "Move to trash", false)).unwrap();
        registry
    }

    #[test]
    fn test_registry_creation() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_lookup_by_full_and_short_id() {
        let registry = create_test_registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("test:archive-note").is_some());
        assert!(registry.get("archive-note").is_some());
        assert!(registry.get("other:archive-note").is_none());
        assert_eq!(registry.get_by_index(1).map(|r| r.command.name.as_str()), Some("New note"));
    }

    #[test]
    fn test_ambiguous_short_id() {
        let mut registry = CommandRegistry::new();
        registry.add_command(entry("sync", "Sync", true)).unwrap();
        let other = CommandRegistration::check(
            Command::new("sync", "Sync").with_plugin("other"),
            |_| Invoked::rejected(),
        );
        registry.add_command(other).unwrap();

        assert!(registry.get("sync").is_none());
        assert!(registry.get("other:sync").is_some());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = create_test_registry();
        let err = registry.add_command(entry("new-note", "New note", true)).unwrap_err();
        assert!(matches!(err, CommandError::AlreadyRegistered(id) if id == "test:new-note"));
    }

    #[test]
    fn test_disabled_commands_are_skipped() {
        let mut config = Config::default();
        config.commands.disabled.push("new-note".to_string());
        let mut registry = CommandRegistry::with_config(&config);

        assert!(!registry.add_command(entry("new-note", "New note", true)).unwrap());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_check_and_available() {
        let registry = create_test_registry();
        assert!(registry.check("archive-note", true).unwrap().feasible());
        assert!(!registry.check("move-to-trash", true).unwrap().feasible());
        assert!(matches!(registry.check("missing", true), Err(CommandError::NotFound(_))));

        let available: Vec<&str> = registry.available(None).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(available, vec!["archive-note", "new-note"]);
    }

    #[test]
    fn test_search_empty_pattern() {
        let registry = create_test_registry();
        assert_eq!(registry.search(""), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_with_pattern() {
        let registry = create_test_registry();
        let results = registry.search("archive");
        assert_eq!(results.first(), Some(&0));
        assert!(!results.contains(&1));
    }

    #[test]
    fn test_clear() {
        let mut registry = create_test_registry();
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.search("archive").is_empty());
    }
}
