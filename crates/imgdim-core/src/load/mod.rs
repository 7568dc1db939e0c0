//! Asynchronous image load and snippet insertion.
//!
//! The decoder runs on the blocking pool; the insertion happens on completion
//! against the target chosen by the configured [`ContextPolicy`]. A failed,
//! cancelled or stale load leaves every document untouched.

mod control;
mod target;

pub use control::LoadControl;
pub use target::{StaleReason, Target};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{ContextPolicy, ImgdimConfig};
use crate::format::insertion_text;
use crate::host::{DecodeError, DocumentModel, HostError, ImageDecoder};
use crate::model::{CursorPosition, DocumentId, EditorState, ImageDimensions};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("decoder task failed: {0}")]
    Panicked(String),
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug)]
pub enum LoadOutcome {
    Inserted {
        document: DocumentId,
        at: CursorPosition,
        dimensions: ImageDimensions,
    },
    Failed(LoadError),
    Stale(StaleReason),
    Cancelled,
    InsertFailed(HostError),
}

impl LoadOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, LoadOutcome::Inserted { .. })
    }
}

/// Settings a load needs, copied out of [`ImgdimConfig`] at invocation.
#[derive(Debug, Clone, Copy)]
pub struct LoadSettings {
    pub policy: ContextPolicy,
    pub guard_stale: bool,
    pub report_failures: bool,
    pub timeout: Option<Duration>,
}

impl From<&ImgdimConfig> for LoadSettings {
    fn from(cfg: &ImgdimConfig) -> Self {
        Self {
            policy: cfg.context_policy,
            guard_stale: cfg.guard_stale_documents,
            report_failures: cfg.report_load_failures,
            timeout: cfg.load_timeout(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub path: PathBuf,
    /// Editor state when the command ran.
    pub issued: EditorState,
}

/// Handle to a load started by [`spawn_load`].
#[derive(Debug)]
pub struct PendingLoad {
    id: u64,
    path: PathBuf,
    document: DocumentId,
    abort: Arc<AtomicBool>,
    handle: JoinHandle<LoadOutcome>,
}

impl PendingLoad {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document the load was issued against.
    pub fn document(&self) -> DocumentId {
        self.document
    }

    /// Completion becomes a no-op. Has no effect once the snippet is inserted.
    pub fn cancel(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> LoadOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => LoadOutcome::Failed(LoadError::Panicked(e.to_string())),
        }
    }
}

/// Starts the load on the current tokio runtime and returns immediately.
pub fn spawn_load<H, D>(
    host: Arc<H>,
    decoder: Arc<D>,
    control: Arc<LoadControl>,
    settings: LoadSettings,
    request: LoadRequest,
) -> PendingLoad
where
    H: DocumentModel + ?Sized + 'static,
    D: ImageDecoder + ?Sized + 'static,
{
    let document = request.issued.document.id;
    let (id, abort) = control.register(document);
    let path = request.path.clone();
    let handle = tokio::spawn({
        let abort = Arc::clone(&abort);
        async move {
            let outcome = run_load(&*host, decoder, settings, &request, &abort).await;
            control.unregister(id);
            outcome
        }
    });
    PendingLoad {
        id,
        path,
        document,
        abort,
        handle,
    }
}

async fn decode<D: ImageDecoder + ?Sized + 'static>(
    decoder: Arc<D>,
    path: &Path,
    timeout: Option<Duration>,
) -> Result<ImageDimensions, LoadError> {
    let task = tokio::task::spawn_blocking({
        let path = path.to_path_buf();
        move || decoder.dimensions(&path)
    });
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| LoadError::TimedOut(limit))?,
        None => task.await,
    };
    match joined {
        Ok(result) => Ok(result?),
        Err(e) => Err(LoadError::Panicked(e.to_string())),
    }
}

async fn run_load<H, D>(
    host: &H,
    decoder: Arc<D>,
    settings: LoadSettings,
    request: &LoadRequest,
    abort: &AtomicBool,
) -> LoadOutcome
where
    H: DocumentModel + ?Sized,
    D: ImageDecoder + ?Sized + 'static,
{
    let path = request.path.display();
    let result = decode(decoder, &request.path, settings.timeout).await;

    if abort.load(Ordering::Relaxed) {
        tracing::debug!("load of {} cancelled", path);
        return LoadOutcome::Cancelled;
    }

    let dimensions = match result {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("could not load image {}: {}", path, e);
            if settings.report_failures {
                host.report_status(&format!("Could not load image {}: {}", path, e));
            }
            return LoadOutcome::Failed(e);
        }
    };

    let target = match target::choose(host, settings.policy, settings.guard_stale, &request.issued)
    {
        Ok(t) => t,
        Err(reason) => {
            tracing::warn!("not inserting {} for {}: {}", dimensions, path, reason);
            return LoadOutcome::Stale(reason);
        }
    };

    let at = target.insertion_point();
    match host.insert_text(target.document, at, &insertion_text(dimensions)) {
        Ok(()) => {
            tracing::info!(
                "inserted {} for {} into {} at {}",
                dimensions,
                path,
                target.document,
                at
            );
            LoadOutcome::Inserted {
                document: target.document,
                at,
                dimensions,
            }
        }
        Err(e) => {
            tracing::warn!("insert into {} failed: {}", target.document, e);
            LoadOutcome::InsertFailed(e)
        }
    }
}
