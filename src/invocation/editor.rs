//! Invocations bound to an editor view.

use std::sync::Arc;

use async_trait::async_trait;

use super::Invocation;
use crate::core::FileRef;
use crate::host::EditorView;

/// What an editor command does with the editor.
#[async_trait]
pub trait EditorAction: Send + Sync + 'static {
    /// Narrow feasibility for a view backed by `file`.
    fn can_execute(&self, _view: &EditorView, _file: &FileRef) -> bool {
        true
    }

    /// Whether to offer the command in the editor menu.
    fn should_add_to_menu(&self, _view: &EditorView, _file: &FileRef) -> bool {
        true
    }

    /// Act on the editor.
    async fn execute(&self, view: &EditorView, file: &FileRef) -> anyhow::Result<()>;
}

/// Invocation of an editor action.
///
/// Infeasible when the view has no backing file.
pub struct EditorInvocation {
    action: Arc<dyn EditorAction>,
    view: EditorView,
    file: Option<FileRef>,
}

impl EditorInvocation {
    /// Create an invocation for `view`.
    pub fn new(action: Arc<dyn EditorAction>, view: EditorView) -> Self {
        Self { action, view, file: None }
    }

    /// The view this invocation acts on.
    pub fn view(&self) -> &EditorView {
        &self.view
    }

    /// The backing file resolved by the last check.
    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }
}

#[async_trait]
impl Invocation for EditorInvocation {
    fn can_execute(&mut self) -> bool {
        let Some(file) = self.view.file().cloned() else {
            self.file = None;
            return false;
        };
        let feasible = self.action.can_execute(&self.view, &file);
        self.file = Some(file);
        feasible
    }

    async fn execute(&mut self) -> anyhow::Result<()> {
        let file = self.file.clone().ok_or_else(|| anyhow::anyhow!("editor has no file"))?;
        self.action.execute(&self.view, &file).await
    }
}
