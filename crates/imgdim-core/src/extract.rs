//! Filename extraction at a cursor position.
//!
//! A string-literal token under the cursor yields its contents with the
//! surrounding quotes removed. Any other token falls back to the first
//! `url(...)` on the line, which is taken relative to the document directory.

use regex::Regex;
use std::sync::OnceLock;

use crate::host::{DocumentModel, Tokenizer};
use crate::model::{CursorPosition, DocumentRef, TokenKind};
use crate::resolve::document_directory;

/// Where a candidate filename came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Contents of a quoted string token, relative to the document.
    StringLiteral,
    /// Contents of `url(...)`, already joined with the document directory.
    UrlFunction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub origin: CandidateOrigin,
}

impl Candidate {
    pub fn string_literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: CandidateOrigin::StringLiteral,
        }
    }

    pub fn url_function(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: CandidateOrigin::UrlFunction,
        }
    }

    /// No filename found.
    pub fn none() -> Self {
        Self::string_literal("")
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn url_function_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"url\s*\(([^)]*)\)").expect("static regex"))
}

/// Removes one leading and one trailing quote (`"` or `'`). The two sides are
/// checked independently and escapes are not interpreted.
pub fn strip_quotes(s: &str) -> &str {
    let s = s
        .strip_prefix('"')
        .or_else(|| s.strip_prefix('\''))
        .unwrap_or(s);
    s.strip_suffix('"')
        .or_else(|| s.strip_suffix('\''))
        .unwrap_or(s)
}

/// Contents of the first `url(...)` on `line`, if non-empty.
pub fn url_argument(line: &str) -> Option<&str> {
    let caps = url_function_re().captures(line)?;
    let arg = caps.get(1)?.as_str();
    if arg.is_empty() {
        None
    } else {
        Some(arg)
    }
}

/// Best-effort filename at `pos`. Returns [`Candidate::none`] when nothing
/// usable is under the cursor.
pub fn string_at_position<T, D>(
    tokenizer: &T,
    documents: &D,
    document: &DocumentRef,
    pos: CursorPosition,
) -> Candidate
where
    T: Tokenizer + ?Sized,
    D: DocumentModel + ?Sized,
{
    let mut token = tokenizer.token_at(document.id, pos);

    // At the start of a name the tokenizer reports the preceding gap.
    if token.as_ref().map_or(true, |t| t.is_gap()) {
        token = tokenizer.token_at(document.id, pos.next_column());
    }

    if let Some(token) = token.as_ref().filter(|t| t.kind == TokenKind::StringLiteral) {
        return Candidate::string_literal(strip_quotes(&token.text));
    }

    let Some(line) = documents.line_text(document.id, pos.line) else {
        return Candidate::none();
    };
    match url_argument(&line) {
        Some(arg) => Candidate::url_function(format!(
            "{}/{}",
            document_directory(&document.full_path),
            arg
        )),
        None => Candidate::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessHost;

    fn host_with(text: &str) -> (HeadlessHost, DocumentRef) {
        let host = HeadlessHost::new();
        let doc = host.open_document("/site/css/main.css", text);
        (host, doc)
    }

    #[test]
    fn strip_quotes_variants() {
        assert_eq!(strip_quotes("\"name.png\""), "name.png");
        assert_eq!(strip_quotes("'name.png'"), "name.png");
        assert_eq!(strip_quotes("\"name.png"), "name.png");
        assert_eq!(strip_quotes("name.png'"), "name.png");
        assert_eq!(strip_quotes("\"mixed.png'"), "mixed.png");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn escaped_quote_is_not_interpreted() {
        assert_eq!(strip_quotes(r#""a\"b.png""#), r#"a\"b.png"#);
    }

    #[test]
    fn url_argument_matches() {
        assert_eq!(url_argument("background: url(foo/bar.svg);"), Some("foo/bar.svg"));
        assert_eq!(url_argument("background: url  ( a.png )"), Some(" a.png "));
        assert_eq!(url_argument("background: url()"), None);
        assert_eq!(url_argument("color: red;"), None);
    }

    #[test]
    fn double_quoted_string_token() {
        let (host, doc) = host_with(r#"<img src="name.png">"#);
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 13));
        assert_eq!(c, Candidate::string_literal("name.png"));
    }

    #[test]
    fn single_quoted_string_token() {
        let (host, doc) = host_with("var src = 'name.png';");
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 14));
        assert_eq!(c, Candidate::string_literal("name.png"));
    }

    #[test]
    fn requery_one_column_right_at_start_of_string() {
        // Cursor right after the space: the tokenizer reports the whitespace.
        let (host, doc) = host_with(r#"src = "a.gif""#);
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 6));
        assert_eq!(c, Candidate::string_literal("a.gif"));
    }

    #[test]
    fn url_function_on_line() {
        let (host, doc) = host_with("  background: url(foo/bar.svg);");
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 4));
        assert_eq!(c, Candidate::url_function("/site/css/foo/bar.svg"));
    }

    #[test]
    fn nothing_found() {
        let (host, doc) = host_with("color: red;");
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 2));
        assert!(c.is_empty());
    }

    #[test]
    fn position_past_end_of_document() {
        let (host, doc) = host_with("a");
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(5, 0));
        assert!(c.is_empty());
    }

    #[test]
    fn dot_before_string_requeries_to_the_right() {
        let (host, doc) = host_with(r#"src = base."logo.png";"#);
        // Column 11 sits right after the `.`, before the opening quote.
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, 11));
        assert_eq!(c, Candidate::string_literal("logo.png"));
    }

    #[test]
    fn maximal_column_yields_nothing() {
        let (host, doc) = host_with("a: 'x.png';");
        let c = string_at_position(&host, &host, &doc, CursorPosition::new(0, usize::MAX));
        assert!(c.is_empty());
    }
}
