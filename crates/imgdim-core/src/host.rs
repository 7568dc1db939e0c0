//! Services the host editor supplies. The inserter depends only on these
//! traits, never on a concrete editor.

use std::path::Path;
use std::sync::Arc;

use crate::inserter::Invocation;
use crate::model::{CursorPosition, DocumentId, DocumentRef, EditorState, ImageDimensions, Token};

/// Error reported by a host when a document operation cannot be carried out.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("document {0} is not open")]
    DocumentClosed(DocumentId),
    #[error("position {pos} is outside {document}")]
    OutOfRange {
        document: DocumentId,
        pos: CursorPosition,
    },
}

/// Error from decoding an image header.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("decode {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("{path}: no usable svg width/height or viewBox")]
    SvgSize { path: String },
    #[error("{path}: image has zero width or height")]
    Empty { path: String },
}

pub trait Tokenizer: Send + Sync {
    /// Token covering `pos` in `document`, or `None` when the position lies
    /// outside the document.
    fn token_at(&self, document: DocumentId, pos: CursorPosition) -> Option<Token>;
}

pub trait DocumentModel: Send + Sync {
    /// Active document, if any.
    fn current_document(&self) -> Option<DocumentRef>;

    /// Focused editor with its selection and cursor.
    fn focused_editor(&self) -> Option<EditorState>;

    /// Raw text of `line` without its line break.
    fn line_text(&self, document: DocumentId, line: usize) -> Option<String>;

    /// Pure insertion at `pos`. A position one past the last line appends.
    fn insert_text(
        &self,
        document: DocumentId,
        pos: CursorPosition,
        text: &str,
    ) -> Result<(), HostError>;

    fn set_cursor(&self, document: DocumentId, pos: CursorPosition) -> Result<(), HostError>;

    fn is_open(&self, document: DocumentId) -> bool;

    /// Transient message for the user (status bar or similar).
    fn report_status(&self, message: &str) {
        tracing::info!("status: {}", message);
    }
}

/// Blocking image probe. Called from `spawn_blocking`.
pub trait ImageDecoder: Send + Sync {
    fn dimensions(&self, path: &Path) -> Result<ImageDimensions, DecodeError>;
}

/// Menus the command is exposed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MenuId {
    /// Global edit menu in the menu bar.
    Edit,
    /// Context menu of the text editor.
    EditorContext,
}

/// Identifier a host returns for a divider so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DividerId(pub u64);

/// Action a host runs when the user picks a registered command.
pub type CommandHandler = Arc<dyn Fn() -> Invocation + Send + Sync>;

pub trait MenuHost {
    /// Binds `id` to `handler` under the user-visible `label`.
    fn register_command(
        &self,
        id: &str,
        label: &str,
        handler: CommandHandler,
    ) -> anyhow::Result<()>;
    fn unregister_command(&self, id: &str);
    fn add_menu_divider(&self, menu: MenuId) -> DividerId;
    fn remove_menu_divider(&self, menu: MenuId, divider: DividerId);
    fn add_menu_item(&self, menu: MenuId, command_id: &str) -> anyhow::Result<()>;
    fn remove_menu_item(&self, menu: MenuId, command_id: &str);
}

/// Tokenizer and document model supplied by one editor.
pub trait Host: Tokenizer + DocumentModel {}

impl<T: Tokenizer + DocumentModel + ?Sized> Host for T {}
