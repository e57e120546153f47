//! Tokenizer for the bracketed tag language.
//!
//! Only the first `[...]` segment of a tag is read. Words are folded to
//! lowercase without accents; numbers keep track of an explicit sign.

use crate::text::fold;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Number { value: i32, signed: bool },
    Word(String),
    Slash,
}

/// A token with its byte span inside the bracket body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Text between the first `[` and the following `]`.
pub fn bracket_body(tag: &str) -> Option<&str> {
    let open = tag.find('[')?;
    let rest = &tag[open + 1..];
    let close = rest.find(']')?;
    Some(&rest[..close])
}

pub fn tokenize(body: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '/' {
            chars.next();
            tokens.push(Token {
                kind: TokenKind::Slash,
                start,
                end: start + 1,
            });
            continue;
        }
        if c.is_ascii_digit() || starts_signed_number(&body[start..]) {
            let signed = !c.is_ascii_digit();
            chars.next();
            let mut end = start + c.len_utf8();
            while let Some(&(idx, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                chars.next();
                end = idx + d.len_utf8();
            }
            let value = body[start..end]
                .parse::<i64>()
                .map(|v| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
                .unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Number { value, signed },
                start,
                end,
            });
            continue;
        }

        let mut end = start;
        while let Some(&(idx, d)) = chars.peek() {
            if d.is_whitespace() || d == '/' || d.is_ascii_digit() || starts_signed_number(&body[idx..]) {
                break;
            }
            chars.next();
            end = idx + d.len_utf8();
        }
        tokens.push(Token {
            kind: TokenKind::Word(fold(&body[start..end])),
            start,
            end,
        });
    }

    tokens
}

fn starts_signed_number(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some('+' | '-')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}
