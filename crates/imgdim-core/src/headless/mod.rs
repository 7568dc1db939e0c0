//! In-memory host for headless pipelines, the CLI and tests.
//!
//! Holds a set of open documents, a single focused editor, the menu layout
//! built by extension activation and the status messages reported so far.

mod menus;
mod tokenizer;

pub use menus::MenuEntry;

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::host::{DocumentModel, HostError, MenuId, Tokenizer};
use crate::inserter::Invocation;
use crate::model::{CursorPosition, DocumentId, DocumentRef, EditorState, Selection, Token};

use menus::MenuState;

struct OpenDocument {
    path: String,
    text: String,
    selection: Selection,
}

impl OpenDocument {
    fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
    }

    fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Byte offset of `pos`; a position at column 0 of the line after the
    /// last one maps to `None` (append).
    fn offset_of(&self, id: DocumentId, pos: CursorPosition) -> Result<Option<usize>, HostError> {
        let out_of_range = HostError::OutOfRange { document: id, pos };
        if pos.line == self.line_count() && pos.column == 0 {
            return Ok(None);
        }
        let mut line_start = 0;
        for (idx, raw) in self.text.split('\n').enumerate() {
            if idx == pos.line {
                if pos.column == 0 {
                    return Ok(Some(line_start));
                }
                let content = raw.strip_suffix('\r').unwrap_or(raw);
                return match content.char_indices().nth(pos.column) {
                    Some((byte, _)) => Ok(Some(line_start + byte)),
                    None if content.chars().count() == pos.column => {
                        Ok(Some(line_start + content.len()))
                    }
                    None => Err(out_of_range),
                };
            }
            line_start += raw.len() + 1;
        }
        Err(out_of_range)
    }
}

#[derive(Default)]
struct State {
    next_id: u64,
    documents: BTreeMap<DocumentId, OpenDocument>,
    focused: Option<DocumentId>,
    status: Vec<String>,
}

#[derive(Default)]
pub struct HeadlessHost {
    state: Mutex<State>,
    menus: MenuState,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document and focuses it with the caret at the start.
    pub fn open_document(&self, path: &str, text: &str) -> DocumentRef {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = DocumentId(state.next_id);
        state.documents.insert(
            id,
            OpenDocument {
                path: path.to_string(),
                text: text.to_string(),
                selection: Selection::default(),
            },
        );
        state.focused = Some(id);
        DocumentRef {
            id,
            full_path: path.to_string(),
        }
    }

    /// Closes the document. Focus is dropped when it was focused.
    pub fn close_document(&self, id: DocumentId) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.focused == Some(id) {
            state.focused = None;
        }
        state.documents.remove(&id).is_some()
    }

    pub fn focus(&self, id: DocumentId) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if !state.documents.contains_key(&id) {
            return Err(HostError::DocumentClosed(id));
        }
        state.focused = Some(id);
        Ok(())
    }

    /// Leaves documents open but no editor focused.
    pub fn blur(&self) {
        self.state.lock().unwrap().focused = None;
    }

    pub fn set_selection(&self, id: DocumentId, selection: Selection) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let doc = state
            .documents
            .get_mut(&id)
            .ok_or(HostError::DocumentClosed(id))?;
        doc.selection = selection;
        Ok(())
    }

    pub fn text(&self, id: DocumentId) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.documents.get(&id).map(|d| d.text.clone())
    }

    pub fn status_messages(&self) -> Vec<String> {
        self.state.lock().unwrap().status.clone()
    }

    pub fn menu_entries(&self, menu: MenuId) -> Vec<MenuEntry> {
        self.menus.entries(menu)
    }

    pub fn registered_commands(&self) -> Vec<(String, String)> {
        self.menus.commands()
    }

    /// Runs the command registered under `id`, as picking its menu item would.
    pub fn execute_command(&self, id: &str) -> anyhow::Result<Invocation> {
        self.menus.execute(id)
    }
}

impl Tokenizer for HeadlessHost {
    fn token_at(&self, document: DocumentId, pos: CursorPosition) -> Option<Token> {
        let line = self.line_text(document, pos.line)?;
        tokenizer::token_before(&line, pos.column)
    }
}

impl DocumentModel for HeadlessHost {
    fn current_document(&self) -> Option<DocumentRef> {
        let state = self.state.lock().unwrap();
        let id = state.focused?;
        state.documents.get(&id).map(|d| DocumentRef {
            id,
            full_path: d.path.clone(),
        })
    }

    fn focused_editor(&self) -> Option<EditorState> {
        let state = self.state.lock().unwrap();
        let id = state.focused?;
        let doc = state.documents.get(&id)?;
        Some(EditorState {
            document: DocumentRef {
                id,
                full_path: doc.path.clone(),
            },
            selection: doc.selection,
            cursor: doc.selection.end,
        })
    }

    fn line_text(&self, document: DocumentId, line: usize) -> Option<String> {
        let state = self.state.lock().unwrap();
        let doc = state.documents.get(&document)?;
        // Bound to a local so the line iterator drops before the guard.
        let text = doc.lines().nth(line).map(str::to_string);
        text
    }

    fn insert_text(
        &self,
        document: DocumentId,
        pos: CursorPosition,
        text: &str,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let doc = state
            .documents
            .get_mut(&document)
            .ok_or(HostError::DocumentClosed(document))?;
        match doc.offset_of(document, pos)? {
            Some(offset) => doc.text.insert_str(offset, text),
            None => {
                if !doc.text.ends_with('\n') {
                    doc.text.push('\n');
                }
                doc.text.push_str(text);
            }
        }
        Ok(())
    }

    fn set_cursor(&self, document: DocumentId, pos: CursorPosition) -> Result<(), HostError> {
        self.set_selection(document, Selection::caret(pos))
    }

    fn is_open(&self, document: DocumentId) -> bool {
        self.state.lock().unwrap().documents.contains_key(&document)
    }

    fn report_status(&self, message: &str) {
        tracing::info!("status: {}", message);
        self.state.lock().unwrap().status.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_at_line_start() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "one\ntwo\nthree");
        host.insert_text(doc.id, CursorPosition::new(1, 0), "X\n")
            .unwrap();
        assert_eq!(host.text(doc.id).unwrap(), "one\nX\ntwo\nthree");
    }

    #[test]
    fn insert_mid_line_uses_char_columns() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "héllo");
        host.insert_text(doc.id, CursorPosition::new(0, 2), "_")
            .unwrap();
        assert_eq!(host.text(doc.id).unwrap(), "hé_llo");
    }

    #[test]
    fn insert_after_last_line_appends() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "only");
        host.insert_text(doc.id, CursorPosition::new(1, 0), "tail\n")
            .unwrap();
        assert_eq!(host.text(doc.id).unwrap(), "only\ntail\n");

        let doc2 = host.open_document("/a/c.css", "only\n");
        host.insert_text(doc2.id, CursorPosition::new(1, 0), "tail\n")
            .unwrap();
        assert_eq!(host.text(doc2.id).unwrap(), "only\ntail\n");
    }

    #[test]
    fn append_after_trailing_newline_adds_no_blank_line() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "a: 'x.png';\n");
        host.insert_text(doc.id, CursorPosition::new(2, 0), "\twidth: 1px;\n\theight:1px;\n")
            .unwrap();
        assert_eq!(
            host.text(doc.id).unwrap(),
            "a: 'x.png';\n\twidth: 1px;\n\theight:1px;\n"
        );
    }

    #[test]
    fn insert_out_of_range() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "x");
        assert!(matches!(
            host.insert_text(doc.id, CursorPosition::new(4, 0), "y"),
            Err(HostError::OutOfRange { .. })
        ));
        assert!(matches!(
            host.insert_text(doc.id, CursorPosition::new(0, 3), "y"),
            Err(HostError::OutOfRange { .. })
        ));
    }

    #[test]
    fn close_drops_focus_and_rejects_insert() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "x");
        assert!(host.close_document(doc.id));
        assert!(host.focused_editor().is_none());
        assert!(!host.is_open(doc.id));
        assert!(matches!(
            host.insert_text(doc.id, CursorPosition::new(0, 0), "y"),
            Err(HostError::DocumentClosed(_))
        ));
    }

    #[test]
    fn focused_editor_cursor_is_selection_end() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "abc\ndef");
        let sel = Selection::between(CursorPosition::new(0, 1), CursorPosition::new(0, 3));
        host.set_selection(doc.id, sel).unwrap();
        let editor = host.focused_editor().unwrap();
        assert_eq!(editor.cursor, CursorPosition::new(0, 3));
        assert_eq!(editor.selection.start, CursorPosition::new(0, 1));
    }

    #[test]
    fn line_text_strips_carriage_return() {
        let host = HeadlessHost::new();
        let doc = host.open_document("/a/b.css", "a\r\nb");
        assert_eq!(host.line_text(doc.id, 0).as_deref(), Some("a"));
        assert_eq!(host.line_text(doc.id, 1).as_deref(), Some("b"));
        assert_eq!(host.line_text(doc.id, 2), None);
    }
}
