use std::sync::LazyLock;
use regex::Regex;
use sha2::{Digest, Sha256};

static LITERAL_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\?(?:\s*,\s*\?)*\s*\)").expect("valid regex"));

/// Strip the quotes a trace recorder leaves around a logged query.
pub fn sanitize(query: &str) -> &str {
    if query.starts_with('\'') {
        let mut chars = query.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    } else {
        query
    }
}

/// Reduce a query to its shape: literals become `?`, keywords and
/// identifiers are lowercased, whitespace collapses and literal lists
/// fold to `(?)`.
pub fn normalize_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut chars = query.chars().peekable();
    // Last source character, to tell `t1` from `1`.
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                skip_string(&mut chars, c);
                out.push('?');
            }
            c if c.is_ascii_digit() && !prev.is_some_and(is_ident_char) => {
                while chars.peek().is_some_and(|n| n.is_ascii_alphanumeric() || *n == '.') {
                    chars.next();
                }
                out.push('?');
            }
            c if c.is_whitespace() => {
                if !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c => out.extend(c.to_lowercase()),
        }
        prev = Some(c);
    }

    let trimmed = out.trim_end();
    LITERAL_LIST.replace_all(trimmed, "(?)").into_owned()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Consume a quoted literal up to its closing quote, honoring backslash
/// escapes and doubled quotes.
fn skip_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
            } else {
                return;
            }
        }
    }
}

/// Content hash of a query's normalized shape, as lowercase hex SHA-256.
pub fn query_hash(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_query(query).as_bytes());
    format!("{:x}", hasher.finalize())
}
