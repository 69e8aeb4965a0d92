//! Commands acting on the active editor.

use std::sync::Arc;

use super::menu::add_checked_item;
use super::{CommandBase, PluginContext};
use crate::core::{Command, CommandKind, CommandResult};
use crate::host::{CommandRegistrar, CommandRegistration, EditorView, Menu};
use crate::invocation::{CommandInvocation, EditorAction, EditorInvocation, Invoked};

/// A command whose subject is an editor view backed by a file.
///
/// Listed in the palette while an editor is active and in the editor
/// context menu.
pub struct EditorCommand {
    command: Command,
    context: PluginContext,
    action: Arc<dyn EditorAction>,
}

impl EditorCommand {
    /// Create an editor command shown in the editor menu.
    pub fn new(context: &PluginContext, command: Command, action: impl EditorAction) -> Self {
        Self {
            command: context.bind(command, CommandKind::Editor),
            context: context.clone(),
            action: Arc::new(action),
        }
    }

    /// Build a fresh invocation for `view`.
    pub fn build_invocation(&self, view: EditorView) -> CommandInvocation<EditorInvocation> {
        let body = EditorInvocation::new(Arc::clone(&self.action), view);
        CommandInvocation::new(self.command.full_id(), body)
    }

    /// Palette callback.
    pub fn check_callback(&self, checking: bool, view: &EditorView) -> Invoked {
        self.build_invocation(view.clone()).invoke(checking)
    }

    /// Editor menu listener.
    pub fn handle_editor_menu(self: &Arc<Self>, menu: &mut Menu, view: &EditorView) {
        let this = Arc::clone(self);
        let subject = view.clone();
        add_checked_item(
            menu,
            &self.command,
            self.context.menus().editor_section.as_deref(),
            || view.file().is_some_and(|file| self.action.should_add_to_menu(view, file)),
            move || this.build_invocation(subject.clone()),
        );
    }
}

impl CommandBase for EditorCommand {
    fn command(&self) -> &Command {
        &self.command
    }

    fn register(self: Arc<Self>, registrar: &mut dyn CommandRegistrar) -> CommandResult<()> {
        let this = Arc::clone(&self);
        let added = registrar.add_command(CommandRegistration::editor_check(
            self.command.clone(),
            move |checking, view: &EditorView| this.check_callback(checking, view),
        ))?;

        if added && self.context.menus().shows(&self.command) {
            let this = Arc::clone(&self);
            registrar.on_editor_menu(Arc::new(move |menu: &mut Menu, view: &EditorView| {
                this.handle_editor_menu(menu, view);
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::{CommandRegistry, FileRef};
    use crate::host::{Editor, MemoryEditor, MemoryVault};

    struct Reverse;

    #[async_trait]
    impl EditorAction for Reverse {
        fn can_execute(&self, view: &EditorView, _file: &FileRef) -> bool {
            !view.editor().selection().is_empty()
        }

        async fn execute(&self, view: &EditorView, _file: &FileRef) -> anyhow::Result<()> {
            let text: String = view.editor().selection().chars().rev().collect();
            view.editor().replace_selection(&text);
            Ok(())
        }
    }

    fn registry() -> CommandRegistry {
        let context = PluginContext::new("test", Arc::new(MemoryVault::new()));
        let command =
            Arc::new(EditorCommand::new(&context, Command::from_name("Reverse selection"), Reverse));
        let mut registry = CommandRegistry::new();
        registry.register(command).unwrap();
        registry
    }

    #[test]
    fn test_editor_command_needs_view() {
        let registry = registry();
        assert!(!registry.check("reverse-selection", true).unwrap().feasible());
        assert!(registry.available(None).is_empty());

        let editor = Arc::new(MemoryEditor::new("abc").with_selection(0..3));
        let view = EditorView::new(editor, Some(FileRef::new("a.md")));
        assert!(registry.check_editor("reverse-selection", true, &view).unwrap().feasible());
        assert_eq!(registry.available(Some(&view)).len(), 1);
    }

    #[test]
    fn test_editor_menu_requires_backing_file() {
        let registry = registry();
        let editor: Arc<dyn Editor> = Arc::new(MemoryEditor::new("abc").with_selection(0..3));

        let unsaved = EditorView::new(Arc::clone(&editor), None);
        assert!(registry.editor_menu(&unsaved).is_empty());

        let saved = EditorView::new(editor, Some(FileRef::new("a.md")));
        let menu = registry.editor_menu(&saved);
        assert_eq!(menu.section_titles("selection"), vec!["Reverse selection"]);
    }

    #[tokio::test]
    async fn test_click_runs_against_view() {
        let registry = registry();
        let editor = Arc::new(MemoryEditor::new("abc").with_selection(0..3));
        let view = EditorView::new(editor.clone(), Some(FileRef::new("a.md")));

        let menu = registry.editor_menu(&view);
        let invoked = menu.find("Reverse selection").and_then(|item| item.click()).unwrap();
        assert!(invoked.wait().await.unwrap());
        assert_eq!(editor.value(), "cba");
    }
}
