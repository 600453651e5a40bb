//! CSV table output.

use std::io::Write;

use super::{Encoder, KeyColumn};
use crate::error::{Error, Result};
use crate::record::OpenConnection;

/// Writes `KEY,NET,SRC,DST` rows.
pub struct TableEncoder<W: Write> {
    writer: W,
    key: KeyColumn,
}

impl<W: Write> TableEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            key: KeyColumn::default(),
        }
    }

    /// Set the key column.
    pub fn key(mut self, key: KeyColumn) -> Self {
        self.key = key;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, fields: &[&str]) -> Result<()> {
        let row = fields
            .iter()
            .map(|f| csv_escape(f))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.writer, "{}", row).map_err(Error::Encoding)
    }
}

impl<W: Write> Encoder for TableEncoder<W> {
    fn encode(&mut self, set: &[OpenConnection]) -> Result<()> {
        self.write_row(&[self.key.header(), "NET", "SRC", "DST"])?;

        for conn in set {
            let key = match self.key {
                KeyColumn::Pid => conn.pid.to_string(),
                KeyColumn::Command => conn.command.clone(),
            };
            let src = conn.local.to_string();
            let dst = conn.remote.as_ref().map(|r| r.to_string()).unwrap_or_default();
            self.write_row(&[key.as_str(), conn.local.network.as_str(), src.as_str(), dst.as_str()])?;
        }

        self.writer.flush().map_err(Error::Encoding)
    }
}

/// Quote a CSV field when it contains a separator, quote or line break.
pub fn csv_escape(value: &str) -> String {
    let needs_quotes = value.contains(',')
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
