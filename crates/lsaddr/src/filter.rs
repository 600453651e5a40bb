//! Selector based record filtering.
//!
//! A selector is compiled once into a [`FilterSpec`] and then applied either
//! to raw tool output lines, before decoding, or to decoded records.

use std::borrow::Cow;

use regex::Regex;

use crate::error::Result;
use crate::record::OpenConnection;

/// A compiled selector.
#[derive(Debug, Clone)]
pub enum FilterSpec {
    /// Matches everything.
    All,
    /// Regular expression over the raw line a record was decoded from.
    Line(Regex),
    /// Anchored alternation of process identifiers.
    Pids(Regex),
}

impl FilterSpec {
    /// Compile `selector`.
    ///
    /// An empty selector and `*` match everything; anything else must be a
    /// valid regular expression.
    pub fn compile(selector: &str) -> Result<Self> {
        if selector.is_empty() || selector == "*" {
            return Ok(Self::All);
        }
        Ok(Self::Line(Regex::new(selector)?))
    }

    /// Build a filter accepting exactly the given process identifiers.
    ///
    /// An empty list accepts nothing.
    pub fn pids(pids: &[u32]) -> Result<Self> {
        let alternation = pids
            .iter()
            .map(|pid| pid.to_string())
            .collect::<Vec<_>>()
            .join("|");
        Ok(Self::Pids(Regex::new(&format!("^(?:{})$", alternation))?))
    }

    /// Check if this filter accepts everything.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Match against raw text.
    ///
    /// A pid filter matches when any whitespace separated token of `text` is
    /// one of its pids.
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::All => true,
            Self::Line(re) => re.is_match(text),
            Self::Pids(re) => text.split_whitespace().any(|tok| re.is_match(tok)),
        }
    }

    /// Match against a decoded record.
    ///
    /// Line filters look at the record's source line, or at its display form
    /// when the record was not decoded from text.
    pub fn matches(&self, conn: &OpenConnection) -> bool {
        match self {
            Self::All => true,
            Self::Line(re) if conn.source.is_empty() => re.is_match(&conn.to_string()),
            Self::Line(re) => re.is_match(&conn.source),
            Self::Pids(re) => re.is_match(&conn.pid.to_string()),
        }
    }

    /// Keep only the records this filter matches.
    pub fn retain(&self, set: &mut Vec<OpenConnection>) {
        if self.is_all() {
            return;
        }
        set.retain(|conn| {
            let keep = self.matches(conn);
            if !keep {
                tracing::debug!(%conn, "filtering out connection");
            }
            keep
        });
    }

    /// Like [`retain`](Self::retain), by value.
    pub fn apply(&self, mut set: Vec<OpenConnection>) -> Vec<OpenConnection> {
        self.retain(&mut set);
        set
    }

    /// Drop the lines of a raw capture this filter rejects.
    ///
    /// Only meaningful for line oriented formats; tasklist relies on its
    /// header rows and must not be prefiltered.
    pub fn prefilter<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.is_all() {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        for line in text.lines().filter(|line| self.is_match(line)) {
            out.push_str(line);
            out.push('\n');
        }
        Cow::Owned(out)
    }
}

/// Compile `selector` and keep the matching records of `set`.
///
/// The only failure is an invalid selector.
pub fn filter(selector: &str, set: Vec<OpenConnection>) -> Result<Vec<OpenConnection>> {
    Ok(FilterSpec::compile(selector)?.apply(set))
}
