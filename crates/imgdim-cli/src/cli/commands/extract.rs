//! `imgdim extract` – show what the command would load at a position.

use anyhow::Result;
use imgdim_core::extract::{string_at_position, CandidateOrigin};
use imgdim_core::headless::HeadlessHost;
use imgdim_core::model::CursorPosition;
use imgdim_core::resolve::{is_image_filename, resolve_image_path};
use std::path::Path;

pub fn run_extract(file: &Path, line: usize, column: usize) -> Result<()> {
    let host = HeadlessHost::new();
    let doc = super::open_file(&host, file)?;
    let candidate = string_at_position(&host, &host, &doc, CursorPosition::new(line, column));
    if candidate.is_empty() {
        println!("no filename at {}:{}", line, column);
        return Ok(());
    }

    let origin = match candidate.origin {
        CandidateOrigin::StringLiteral => "string",
        CandidateOrigin::UrlFunction => "url()",
    };
    println!("{:<10} {}", "candidate", candidate.text);
    println!("{:<10} {}", "origin", origin);
    if is_image_filename(&candidate.text) {
        println!("{:<10} {}", "resolved", resolve_image_path(&doc.full_path, &candidate));
    } else {
        println!("{:<10} not a recognized image extension", "skipped");
    }
    Ok(())
}
