//! Tracing setup for the `imgdim` binary.
//!
//! Events go to an append-only file in the XDG state directory. When that
//! file cannot be opened the CLI switches to stderr instead. `RUST_LOG`
//! overrides the built-in filter in both cases.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,imgdim=debug,imgdim_core=debug";
const LOG_FILE_NAME: &str = "imgdim.log";

/// One event's destination. Falls back to stderr for a single event when the
/// shared log file handle cannot be duplicated.
enum LogSink {
    File(fs::File),
    Stderr,
}

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// Hands each event its own handle onto the opened log file.
struct SharedLogFile(fs::File);

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(file) => LogSink::File(file),
            Err(_) => LogSink::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/imgdim/imgdim.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgdim")?;
    Ok(xdg_dirs.get_state_home().join(LOG_FILE_NAME))
}

fn open_log_file() -> Result<(PathBuf, fs::File)> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok((path, file))
}

/// Installs the file subscriber. An error leaves no subscriber installed,
/// so the caller can still use [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let (path, file) = open_log_file()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(SharedLogFile(file)))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init tracing subscriber: {e}"))?;

    tracing::info!("imgdim logging to {}", path.display());
    Ok(())
}

pub fn init_logging_stderr() {
    // Already-installed subscribers win; nothing to report here.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}
