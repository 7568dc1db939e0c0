//! Choosing the document and line the snippet goes into at completion time.

use std::fmt;

use crate::config::ContextPolicy;
use crate::host::DocumentModel;
use crate::model::{CursorPosition, DocumentId, EditorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub document: DocumentId,
    pub cursor: CursorPosition,
}

impl Target {
    /// Column 0 of the line below the cursor.
    pub fn insertion_point(&self) -> CursorPosition {
        CursorPosition::new(self.cursor.line.saturating_add(1), 0)
    }
}

/// Why a completed load was not inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// The document the load was issued against has been closed.
    DocumentClosed(DocumentId),
    /// Another document is active now.
    DocumentChanged {
        issued: DocumentId,
        current: DocumentId,
    },
    NoCurrentDocument,
    NoFocusedEditor,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::DocumentClosed(id) => write!(f, "{} was closed", id),
            StaleReason::DocumentChanged { issued, current } => {
                write!(f, "active document changed from {} to {}", issued, current)
            }
            StaleReason::NoCurrentDocument => write!(f, "no active document"),
            StaleReason::NoFocusedEditor => write!(f, "no focused editor"),
        }
    }
}

pub fn choose<H: DocumentModel + ?Sized>(
    host: &H,
    policy: ContextPolicy,
    guard_stale: bool,
    issued: &EditorState,
) -> Result<Target, StaleReason> {
    match policy {
        ContextPolicy::CaptureAtInvocation => {
            if guard_stale && !host.is_open(issued.document.id) {
                return Err(StaleReason::DocumentClosed(issued.document.id));
            }
            Ok(Target {
                document: issued.document.id,
                cursor: issued.cursor,
            })
        }
        ContextPolicy::ResolveAtCompletion => {
            let current = host
                .current_document()
                .ok_or(StaleReason::NoCurrentDocument)?;
            let editor = host.focused_editor().ok_or(StaleReason::NoFocusedEditor)?;
            if guard_stale && current.id != issued.document.id {
                return Err(StaleReason::DocumentChanged {
                    issued: issued.document.id,
                    current: current.id,
                });
            }
            Ok(Target {
                document: current.id,
                cursor: editor.cursor,
            })
        }
    }
}
