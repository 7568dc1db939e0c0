//! Document-relative path resolution and the image extension check.

use regex::Regex;
use std::sync::OnceLock;

use crate::extract::{Candidate, CandidateOrigin};

/// Recognized image extensions. Fixed; not read from config.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

fn image_extension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = IMAGE_EXTENSIONS.join("|");
        Regex::new(&format!(r"(?i)\.(?:{alternation})$")).expect("static regex")
    })
}

/// Directory part of a `/`-separated document path: everything before the
/// last separator. Empty when there is no separator.
pub fn document_directory(full_path: &str) -> &str {
    match full_path.rfind('/') {
        Some(idx) => &full_path[..idx],
        None => "",
    }
}

/// True when `name` ends in one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_filename(name: &str) -> bool {
    image_extension_re().is_match(name)
}

/// Joins the candidate with the document directory. Candidates taken from a
/// `url(...)` already carry the directory and are returned unchanged.
pub fn resolve_image_path(document_path: &str, candidate: &Candidate) -> String {
    match candidate.origin {
        CandidateOrigin::UrlFunction => candidate.text.clone(),
        CandidateOrigin::StringLiteral => {
            format!("{}/{}", document_directory(document_path), candidate.text)
        }
    }
}
