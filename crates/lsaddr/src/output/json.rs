//! JSON output.

use std::io::Write;

use super::Encoder;
use crate::error::{Error, Result};
use crate::record::OpenConnection;

/// Writes the record set as a JSON array.
pub struct JsonEncoder<W: Write> {
    writer: W,
    pretty: bool,
}

impl<W: Write> JsonEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: false,
        }
    }

    /// Enable pretty printing.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for JsonEncoder<W> {
    fn encode(&mut self, set: &[OpenConnection]) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, set)?;
        } else {
            serde_json::to_writer(&mut self.writer, set)?;
        }
        writeln!(self.writer).map_err(Error::Encoding)?;
        self.writer.flush().map_err(Error::Encoding)
    }
}
