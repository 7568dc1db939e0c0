//! Line tokenizer for the headless host.
//!
//! Good enough for CSS, HTML attributes and JS string literals: quoted
//! strings (backslash escapes skip the next char), whitespace runs, single
//! separator characters and word runs.

use crate::model::{Token, TokenKind};

const SEPARATORS: &[char] = &[
    '(', ')', '[', ']', '{', '}', ';', ':', ',', '=', '<', '>', '.',
];

/// Token span in char indices, `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

pub(crate) fn tokenize_line(chars: &[char]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let c = chars[i];
        let kind = if c == '"' || c == '\'' {
            i += 1;
            while i < chars.len() {
                match chars[i] {
                    '\\' => i += 2,
                    q if q == c => {
                        i += 1;
                        break;
                    }
                    _ => i += 1,
                }
            }
            i = i.min(chars.len());
            TokenKind::StringLiteral
        } else if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            TokenKind::Other
        } else if SEPARATORS.contains(&c) {
            i += 1;
            TokenKind::Other
        } else {
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            TokenKind::Other
        };
        spans.push(Span {
            start,
            end: i,
            kind,
        });
    }
    spans
}

fn is_word_char(c: char) -> bool {
    !(c.is_whitespace() || c == '"' || c == '\'' || SEPARATORS.contains(&c))
}

/// Token before `column`: the span containing the char at `column - 1`.
/// Column 0 yields an empty token, like an editor reporting the start of a
/// line. `None` when `column` is past the end of the line.
pub(crate) fn token_before(line: &str, column: usize) -> Option<Token> {
    let chars: Vec<char> = line.chars().collect();
    if column > chars.len() {
        return None;
    }
    if column == 0 {
        return Some(Token::new("", TokenKind::Other));
    }
    let target = column - 1;
    tokenize_line(&chars)
        .into_iter()
        .find(|s| s.start <= target && target < s.end)
        .map(|s| Token::new(chars[s.start..s.end].iter().collect::<String>(), s.kind))
}
