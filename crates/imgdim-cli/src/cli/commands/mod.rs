//! CLI command handlers, one file per command.

mod completions;
mod dimensions;
mod extract;
mod insert;
mod menus;

pub use completions::{run_completions, run_man};
pub use dimensions::run_dimensions;
pub use extract::run_extract;
pub use insert::{run_insert, InsertArgs};
pub use menus::run_menus;

use anyhow::{Context, Result};
use imgdim_core::headless::HeadlessHost;
use imgdim_core::model::DocumentRef;
use std::path::Path;

/// Reads `file` and opens it in `host` under its absolute path.
fn open_file(host: &HeadlessHost, file: &Path) -> Result<DocumentRef> {
    let abs = std::fs::canonicalize(file).with_context(|| format!("resolve {}", file.display()))?;
    let text =
        std::fs::read_to_string(&abs).with_context(|| format!("read {}", abs.display()))?;
    let path = abs
        .to_str()
        .with_context(|| format!("{} is not valid UTF-8", abs.display()))?;
    Ok(host.open_document(path, &text))
}
