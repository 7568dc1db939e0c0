//! Command entry point: decide whether the cursor sits on an image reference
//! and, if so, start the load that inserts its dimensions.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ImgdimConfig;
use crate::extract::string_at_position;
use crate::host::{CommandHandler, Host, ImageDecoder};
use crate::load::{spawn_load, LoadControl, LoadRequest, LoadSettings, PendingLoad};
use crate::model::{CursorPosition, DocumentId, EditorState};
use crate::resolve::{is_image_filename, resolve_image_path};

/// Why an invocation did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoFocusedEditor,
    MultiLineSelection,
    NoFilename,
    UnsupportedExtension(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoFocusedEditor => write!(f, "no focused editor"),
            SkipReason::MultiLineSelection => write!(f, "selection spans multiple lines"),
            SkipReason::NoFilename => write!(f, "no filename at cursor"),
            SkipReason::UnsupportedExtension(name) => {
                write!(f, "{} is not a png, jpg, jpeg, gif or svg file", name)
            }
        }
    }
}

#[derive(Debug)]
pub enum Invocation {
    Skipped(SkipReason),
    Started(PendingLoad),
}

impl Invocation {
    pub fn pending(self) -> Option<PendingLoad> {
        match self {
            Invocation::Started(p) => Some(p),
            Invocation::Skipped(_) => None,
        }
    }
}

pub struct DimensionInserter<H: ?Sized, D: ?Sized> {
    host: Arc<H>,
    decoder: Arc<D>,
    config: ImgdimConfig,
    loads: Arc<LoadControl>,
}

impl<H, D> DimensionInserter<H, D>
where
    H: Host + ?Sized + 'static,
    D: ImageDecoder + ?Sized + 'static,
{
    pub fn new(host: Arc<H>, decoder: Arc<D>, config: ImgdimConfig) -> Self {
        Self {
            host,
            decoder,
            config,
            loads: Arc::new(LoadControl::new()),
        }
    }

    pub fn config(&self) -> &ImgdimConfig {
        &self.config
    }

    /// Checks the editor state and starts the load. Must be called from
    /// within a tokio runtime; returns without waiting for the load.
    ///
    /// `_pos` is the nominal cursor the host passes (usually the selection
    /// end). The filename is always taken at the selection start.
    pub fn provide(&self, editor: &EditorState, _pos: CursorPosition) -> Invocation {
        if !editor.selection.is_single_line() {
            return self.skip(SkipReason::MultiLineSelection);
        }

        let candidate = string_at_position(
            &*self.host,
            &*self.host,
            &editor.document,
            editor.selection.start,
        );
        if candidate.is_empty() {
            return self.skip(SkipReason::NoFilename);
        }
        if !is_image_filename(&candidate.text) {
            return self.skip(SkipReason::UnsupportedExtension(candidate.text));
        }

        let active = self
            .host
            .current_document()
            .unwrap_or_else(|| editor.document.clone());
        let path = resolve_image_path(&active.full_path, &candidate);
        tracing::debug!("loading {} for {}", path, editor.document.id);

        let pending = spawn_load(
            Arc::clone(&self.host),
            Arc::clone(&self.decoder),
            Arc::clone(&self.loads),
            LoadSettings::from(&self.config),
            LoadRequest {
                path: PathBuf::from(path),
                issued: editor.clone(),
            },
        );
        Invocation::Started(pending)
    }

    /// Menu/command target: runs against the focused editor at its cursor.
    pub fn run_command(&self) -> Invocation {
        match self.host.focused_editor() {
            Some(editor) => {
                let pos = editor.cursor;
                self.provide(&editor, pos)
            }
            None => self.skip(SkipReason::NoFocusedEditor),
        }
    }

    /// Handler to register under the command id. Keeps the inserter alive
    /// until the host drops it on unregistration.
    pub fn command_handler(self: &Arc<Self>) -> CommandHandler {
        let this = Arc::clone(self);
        Arc::new(move || this.run_command())
    }

    /// Cancels loads issued against `document`, e.g. when it is closed.
    pub fn cancel_for_document(&self, document: DocumentId) -> usize {
        let n = self.loads.cancel_for_document(document);
        if n > 0 {
            tracing::debug!("cancelled {} pending load(s) for {}", n, document);
        }
        n
    }

    /// Cancels every pending load, e.g. on extension deactivation.
    pub fn cancel_all(&self) -> usize {
        self.loads.cancel_all()
    }

    pub fn pending_loads(&self) -> usize {
        self.loads.pending()
    }

    fn skip(&self, reason: SkipReason) -> Invocation {
        tracing::debug!("get image dimension: {}", reason);
        Invocation::Skipped(reason)
    }
}
