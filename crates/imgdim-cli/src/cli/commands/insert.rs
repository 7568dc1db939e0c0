//! `imgdim insert` – run the command against a file on disk.

use anyhow::{bail, Context, Result};
use imgdim_core::command::{Extension, GET_DIMENSIONS};
use imgdim_core::config::ImgdimConfig;
use imgdim_core::decode::FsImageDecoder;
use imgdim_core::headless::HeadlessHost;
use imgdim_core::inserter::{DimensionInserter, Invocation};
use imgdim_core::load::LoadOutcome;
use imgdim_core::model::{CursorPosition, DocumentRef, Selection};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct InsertArgs {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    pub dry_run: bool,
}

impl InsertArgs {
    /// Selection from the start anchor to the optional end anchor.
    pub fn selection(&self) -> Selection {
        let anchor = CursorPosition::new(self.line, self.column);
        let head = CursorPosition::new(
            self.end_line.unwrap_or(self.line),
            self.end_column.unwrap_or(self.column),
        );
        Selection::between(anchor, head)
    }
}

pub async fn run_insert(cfg: &ImgdimConfig, args: &InsertArgs) -> Result<()> {
    let host = Arc::new(HeadlessHost::new());
    let inserter = Arc::new(DimensionInserter::new(
        Arc::clone(&host),
        Arc::new(FsImageDecoder::new()),
        cfg.clone(),
    ));
    let mut extension = Extension::new();
    extension.activate(&*host, inserter.command_handler())?;

    let outcome = execute(&host, args).await;
    extension.deactivate(&*host);
    let (doc, outcome) = outcome?;

    match outcome {
        LoadOutcome::Inserted { at, dimensions, .. } => {
            let text = host
                .text(doc.id)
                .context("document closed before it could be saved")?;
            if args.dry_run {
                print!("{}", text);
            } else {
                std::fs::write(&args.file, text)
                    .with_context(|| format!("write {}", args.file.display()))?;
                println!(
                    "{}: inserted {} at line {}",
                    args.file.display(),
                    dimensions,
                    at.line
                );
            }
            Ok(())
        }
        LoadOutcome::Failed(e) => Err(e).context("load image"),
        LoadOutcome::Stale(reason) => bail!("nothing inserted: {}", reason),
        LoadOutcome::Cancelled => bail!("nothing inserted: load cancelled"),
        LoadOutcome::InsertFailed(e) => Err(e).context("insert snippet"),
    }
}

/// Opens the file, places the selection and picks the command by id.
async fn execute(host: &HeadlessHost, args: &InsertArgs) -> Result<(DocumentRef, LoadOutcome)> {
    let doc = super::open_file(host, &args.file)?;
    host.set_selection(doc.id, args.selection())?;

    match host.execute_command(GET_DIMENSIONS)? {
        Invocation::Started(pending) => {
            tracing::debug!("waiting for {}", pending.path().display());
            Ok((doc, pending.wait().await))
        }
        Invocation::Skipped(reason) => bail!("nothing inserted: {}", reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(dir: &std::path::Path, line: usize, column: usize) -> InsertArgs {
        InsertArgs {
            file: dir.join("main.css"),
            line,
            column,
            end_line: None,
            end_column: None,
            dry_run: false,
        }
    }

    #[test]
    fn selection_defaults_to_caret() {
        let a = args(std::path::Path::new("/x"), 2, 7);
        let sel = a.selection();
        assert_eq!(sel.start, sel.end);
        assert!(sel.is_single_line());
    }

    #[test]
    fn selection_with_end_anchor_before_start() {
        let mut a = args(std::path::Path::new("/x"), 3, 1);
        a.end_line = Some(1);
        a.end_column = Some(0);
        let sel = a.selection();
        assert_eq!(sel.start, CursorPosition::new(1, 0));
        assert!(!sel.is_single_line());
    }

    #[tokio::test]
    async fn inserts_into_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.css"),
            "a {\n  content: \"logo.svg\";\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("logo.svg"),
            r#"<svg width="40" height="30"/>"#,
        )
        .unwrap();

        run_insert(&ImgdimConfig::default(), &args(dir.path(), 1, 13))
            .await
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join("main.css")).unwrap();
        assert_eq!(
            text,
            "a {\n  content: \"logo.svg\";\n\twidth: 40px;\n\theight:30px;\n}\n"
        );
    }

    #[tokio::test]
    async fn skip_is_an_error_and_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.css"), "a { color: red; }\n").unwrap();
        let err = run_insert(&ImgdimConfig::default(), &args(dir.path(), 0, 6))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing inserted"), "{err}");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("main.css")).unwrap(),
            "a { color: red; }\n"
        );
    }
}
