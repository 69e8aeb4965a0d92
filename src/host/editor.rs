//! Editor access for editor-scoped commands.

use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::FileRef;

/// Host interface to a text editor.
pub trait Editor: Send + Sync {
    /// Full document text.
    fn value(&self) -> String;

    /// Currently selected text (empty when nothing is selected).
    fn selection(&self) -> String;

    /// Replace the current selection, leaving the cursor after the new text.
    fn replace_selection(&self, text: &str);
}

/// An editor together with its rendering context.
///
/// The backing file is absent for unsaved or virtual views.
#[derive(Clone)]
pub struct EditorView {
    editor: Arc<dyn Editor>,
    file: Option<FileRef>,
}

impl EditorView {
    /// Create a view over `editor`, optionally backed by `file`.
    pub fn new(editor: Arc<dyn Editor>, file: Option<FileRef>) -> Self {
        Self { editor, file }
    }

    /// The editor.
    pub fn editor(&self) -> &dyn Editor {
        self.editor.as_ref()
    }

    /// The file backing this view, if any.
    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }
}

impl std::fmt::Debug for EditorView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorView").field("file", &self.file).finish()
    }
}

/// In-memory editor with a byte-range selection.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    state: Mutex<EditorState>,
}

#[derive(Debug, Default)]
struct EditorState {
    text: String,
    selection: Range<usize>,
}

impl MemoryEditor {
    /// Create an editor holding `text` with the cursor at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self { state: Mutex::new(EditorState { text: text.into(), selection: 0..0 }) }
    }

    /// Select a byte range. Out-of-range or non-boundary offsets are clamped
    /// back to the nearest character boundary.
    #[must_use]
    pub fn with_selection(self, selection: Range<usize>) -> Self {
        {
            let mut state = self.state.lock();
            let start = floor_boundary(&state.text, selection.start);
            let end = floor_boundary(&state.text, selection.end).max(start);
            state.selection = start..end;
        }
        self
    }
}

impl Editor for MemoryEditor {
    fn value(&self) -> String {
        self.state.lock().text.clone()
    }

    fn selection(&self) -> String {
        let state = self.state.lock();
        state.text[state.selection.clone()].to_string()
    }

    fn replace_selection(&self, text: &str) {
        let mut state = self.state.lock();
        let range = state.selection.clone();
        state.text.replace_range(range.clone(), text);
        let cursor = range.start + text.len();
        state.selection = cursor..cursor;
    }
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
