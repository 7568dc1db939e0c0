//! Request-scoped values passed between the host and the inserter.

use std::fmt;

/// Zero-based line/column position inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Same line, one column to the right.
    pub fn next_column(self) -> Self {
        Self {
            line: self.line,
            column: self.column.saturating_add(1),
        }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Selection as reported by the editor. `start` is the anchor closest to the
/// beginning of the document regardless of selection direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

impl Selection {
    /// Collapsed selection at `pos`.
    pub fn caret(pos: CursorPosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Builds a selection from two anchors in either order.
    pub fn between(a: CursorPosition, b: CursorPosition) -> Self {
        if (b.line, b.column) < (a.line, a.column) {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StringLiteral,
    Other,
}

/// Lexical unit reported by the host tokenizer for a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Whitespace-only or a bare `.`: the tokenizer most likely reported the
    /// character just before a name.
    pub fn is_gap(&self) -> bool {
        self.text.trim().is_empty() || self.text == "."
    }
}

/// Opaque host-assigned document identity. Two documents with the same path
/// opened at different times get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: DocumentId,
    /// Absolute path using `/` separators.
    pub full_path: String,
}

/// Snapshot of the focused editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub document: DocumentRef,
    pub selection: Selection,
    pub cursor: CursorPosition,
}

/// Natural pixel size of a decoded image. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
