//! Placeholder scanning and rewriting.
//!
//! Callers write parameters as bare `?`, numbered `?N` or Postgres-style `$N`. The scanner
//! numbers them the way `SQLite` does (a bare `?` takes the index after the largest seen so
//! far) and can rewrite them for the backend that will run the statement.

use std::borrow::Cow;

mod scanner;

use scanner::{State, closes_dollar_quote, scan_number, starts_with_at, try_start_dollar_quote};

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?` and `?1`.
    Sqlite,
}

/// Result of a single scan over a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders<'a> {
    /// Statement text in the requested style; borrowed when nothing changed.
    pub sql: Cow<'a, str>,
    /// Number of parameters the statement binds.
    pub expected_params: usize,
}

/// Number of parameters `sql` expects.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    scan(sql, None).expected_params
}

/// Rewrite placeholders into `target` style.
///
/// Quoted strings, quoted identifiers, comments and dollar-quoted blocks are skipped by a
/// small state machine; dialect-heavy SQL (PL/pgSQL bodies, the `jsonb ?` operator) should
/// be written in the backend's native style instead.
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle) -> Cow<'_, str> {
    scan(sql, Some(target)).sql
}

/// Count and rewrite in one pass.
#[must_use]
pub fn prepare_placeholders(sql: &str, target: PlaceholderStyle) -> Placeholders<'_> {
    scan(sql, Some(target))
}

fn scan(sql: &str, target: Option<PlaceholderStyle>) -> Placeholders<'_> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut highest = 0usize;
    let mut state = State::Normal;
    let mut idx = 0;

    let mut replace = |out: &mut Option<String>, start: usize, end: usize, with: String| {
        let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
        buf.push_str(&sql[copied..start]);
        buf.push_str(&with);
        copied = end;
    };

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backtick,
                _ if starts_with_at(bytes, idx, b"--") => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if starts_with_at(bytes, idx, b"/*") => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, close)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = close;
                    } else if let Some((end, n)) = scan_number(bytes, idx + 1) {
                        highest = highest.max(n);
                        if target == Some(PlaceholderStyle::Sqlite) {
                            replace(&mut out, idx, end, format!("?{n}"));
                        }
                        idx = end;
                        continue;
                    }
                }
                b'?' => {
                    if let Some((end, n)) = scan_number(bytes, idx + 1) {
                        highest = highest.max(n);
                        if target == Some(PlaceholderStyle::Postgres) {
                            replace(&mut out, idx, end, format!("${n}"));
                        }
                        idx = end;
                        continue;
                    }
                    highest += 1;
                    if target == Some(PlaceholderStyle::Postgres) {
                        replace(&mut out, idx, idx + 1, format!("${highest}"));
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Backtick => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if starts_with_at(bytes, idx, b"/*") {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if starts_with_at(bytes, idx, b"*/") {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && closes_dollar_quote(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }

    let sql = match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    };
    Placeholders {
        sql,
        expected_params: highest,
    }
}
