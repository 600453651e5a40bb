//! Line tokenization.
//!
//! Every decoder admits a line through [`chunk_line`] (or its whitespace
//! flavour) before looking at individual columns, so a truncated line is
//! rejected up front instead of being indexed out of bounds.

use crate::error::{Error, Result};

/// Strip a trailing `\n` / `\r\n` left over from line splitting.
pub fn trim_line_end(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Split `line` on `sep`, dropping empty items.
///
/// Repeated separators collapse, so `"a   b"` yields `["a", "b"]`. Fails with
/// [`Error::Format`] when fewer than `min` items remain. Missing fields are
/// never padded.
pub fn chunk_line<'a>(line: &'a str, sep: &str, min: usize) -> Result<Vec<&'a str>> {
    let line = trim_line_end(line);
    let chunks: Vec<&str> = line.split(sep).filter(|c| !c.is_empty()).collect();
    check_len(line, chunks, min)
}

/// Split `line` on any run of whitespace.
///
/// Same contract as [`chunk_line`]; tool output mixes spaces and tabs, so the
/// decoders use this form.
pub fn chunk_whitespace(line: &str, min: usize) -> Result<Vec<&str>> {
    let line = trim_line_end(line);
    let chunks: Vec<&str> = line.split_whitespace().collect();
    check_len(line, chunks, min)
}

fn check_len<'a>(line: &str, chunks: Vec<&'a str>, min: usize) -> Result<Vec<&'a str>> {
    if chunks.len() < min {
        return Err(Error::format(
            format!(
                "unable to chunk line: expected at least {} items, found {}",
                min,
                chunks.len()
            ),
            line,
        ));
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_separators() {
        let chunks = chunk_line("a   b c  ", " ", 3).unwrap();
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rejects_short_line() {
        let err = chunk_line("a b", " ", 3).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_min_zero_accepts_empty() {
        assert!(chunk_line("", " ", 0).unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_strips_terminator() {
        let chunks = chunk_whitespace("TCP\t0.0.0.0:135  0.0.0.0:0\r\n", 3).unwrap();
        assert_eq!(chunks, vec!["TCP", "0.0.0.0:135", "0.0.0.0:0"]);
    }

    #[test]
    fn test_custom_separator() {
        let chunks = chunk_line("=== ==,,=", ",", 2).unwrap();
        assert_eq!(chunks, vec!["=== ==", "="]);
    }
}
