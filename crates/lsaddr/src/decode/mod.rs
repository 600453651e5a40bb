//! Tool output decoders.
//!
//! Each supported tool has its own grammar; [`Format`] selects one and turns
//! a raw, fully buffered capture into [`OpenConnection`] records in input
//! order.

pub mod lsof;
pub mod netstat;
pub mod tasklist;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::record::OpenConnection;

/// Tool output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `lsof -i -n -P` (macOS, Linux).
    Lsof,
    /// `netstat -ano` (Windows).
    Netstat,
    /// `tasklist` (Windows). Lists processes, not connections.
    Tasklist,
}

impl Format {
    /// Connection listing format of the running platform.
    pub fn platform_default() -> Self {
        if cfg!(windows) { Self::Netstat } else { Self::Lsof }
    }

    /// Short name, also the program name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lsof => "lsof",
            Self::Netstat => "netstat",
            Self::Tasklist => "tasklist",
        }
    }

    /// Program and arguments producing this format.
    pub fn command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Lsof => ("lsof", &["-i", "-n", "-P"]),
            Self::Netstat => ("netstat", &["-ano"]),
            Self::Tasklist => ("tasklist", &[]),
        }
    }

    /// Check if records of this format describe connections.
    pub fn is_connection_listing(&self) -> bool {
        !matches!(self, Self::Tasklist)
    }

    /// Decode a raw capture.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Malformed lines are
    /// skipped; only a tasklist block without a usable header fails.
    pub fn decode(&self, raw: &[u8]) -> Result<Vec<OpenConnection>> {
        let text = String::from_utf8_lossy(raw);
        match self {
            Self::Lsof => Ok(lsof::decode(&text)),
            Self::Netstat => Ok(netstat::decode(&text)),
            Self::Tasklist => tasklist::decode(&text),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lsof" => Ok(Self::Lsof),
            "netstat" => Ok(Self::Netstat),
            "tasklist" => Ok(Self::Tasklist),
            _ => Err(Error::format("unknown input format", s)),
        }
    }
}

/// Decode `raw` as `format`.
pub fn decode(format: Format, raw: &[u8]) -> Result<Vec<OpenConnection>> {
    format.decode(raw)
}

/// Decode every line of `text` with `f`, skipping blank and malformed lines.
pub(crate) fn decode_lines<F>(tool: &str, text: &str, f: F) -> Vec<OpenConnection>
where
    F: Fn(&str) -> Result<OpenConnection>,
{
    let mut set = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match f(line) {
            Ok(conn) => set.push(conn),
            Err(err) => {
                skipped += 1;
                tracing::debug!(tool, %err, "skipping line");
            }
        }
    }

    if skipped > 0 && set.is_empty() {
        tracing::warn!(tool, skipped, "no line of the output could be decoded");
    }
    tracing::debug!(tool, decoded = set.len(), skipped, "decoded output");
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("lsof".parse::<Format>().unwrap(), Format::Lsof);
        assert_eq!("NETSTAT".parse::<Format>().unwrap(), Format::Netstat);
        assert_eq!("tasklist".parse::<Format>().unwrap(), Format::Tasklist);
        assert!("ss".parse::<Format>().is_err());
    }

    #[test]
    fn test_command() {
        assert_eq!(Format::Lsof.command(), ("lsof", &["-i", "-n", "-P"][..]));
        assert_eq!(Format::Netstat.command(), ("netstat", &["-ano"][..]));
        assert!(Format::Tasklist.command().1.is_empty());
    }

    #[test]
    fn test_platform_default_lists_connections() {
        assert!(Format::platform_default().is_connection_listing());
        assert!(!Format::Tasklist.is_connection_listing());
    }

    #[test]
    fn test_decode_lossy_utf8() {
        let raw = b"caf\xe9    614 dan 236u IPv4 0x25 0t0 TCP 10.0.0.1:1->10.0.0.2:2\n";
        let set = decode(Format::Lsof, raw).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].command, "caf\u{fffd}");
    }

    #[test]
    fn test_decode_empty() {
        for format in [Format::Lsof, Format::Netstat, Format::Tasklist] {
            assert!(decode(format, b"").unwrap().is_empty());
        }
    }

    #[test]
    fn test_decode_lines_skips_blank() {
        let set = decode_lines("test", "\n   \n\r\n", |_| unreachable!());
        assert!(set.is_empty());
    }
}
