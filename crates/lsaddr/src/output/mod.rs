//! Output encoding (CSV table, packet filter, JSON).
//!
//! Every encoder wraps a writer and turns a slice of records into one
//! complete document. Output is not transactional: when the writer fails
//! midway, whatever was already written stays written and the error is
//! returned as [`Error::Encoding`](crate::Error::Encoding).

mod bpf;
mod json;
mod table;

pub use bpf::BpfEncoder;
pub use json::JsonEncoder;
pub use table::{TableEncoder, csv_escape};

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::record::OpenConnection;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// CSV table, one row per connection.
    #[default]
    Csv,
    /// Packet filter expression.
    Bpf,
    /// JSON array of records.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Bpf => "bpf",
            Self::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "bpf" => Ok(Self::Bpf),
            "json" => Ok(Self::Json),
            _ => Err(Error::format("unrecognised output format", s)),
        }
    }
}

/// First column of the CSV table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyColumn {
    #[default]
    Pid,
    Command,
}

impl KeyColumn {
    /// Header cell.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Pid => "PID",
            Self::Command => "COMMAND",
        }
    }
}

/// Packet filter options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BpfOptions {
    /// Only emit host primitives, de-duplicated.
    pub hosts_only: bool,
    /// Qualify local endpoints with `src` and remote ones with `dst`.
    pub directed: bool,
}

/// Options for all encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// CSV key column.
    pub key: KeyColumn,
    /// Packet filter options.
    pub bpf: BpfOptions,
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// An encoder writing a record set to its sink.
pub trait Encoder {
    /// Encode `set` as one complete document and flush the sink.
    fn encode(&mut self, set: &[OpenConnection]) -> Result<()>;
}

/// Build the encoder for `format` over `writer`.
pub fn encoder<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
    opts: &OutputOptions,
) -> Box<dyn Encoder + 'a> {
    match format {
        OutputFormat::Csv => Box::new(TableEncoder::new(writer).key(opts.key)),
        OutputFormat::Bpf => Box::new(BpfEncoder::new(writer).options(opts.bpf)),
        OutputFormat::Json => {
            let enc = JsonEncoder::new(writer);
            Box::new(if opts.pretty { enc.pretty() } else { enc })
        }
    }
}

/// Encode `set` as `format` with default options.
pub fn encode<W: Write>(format: OutputFormat, set: &[OpenConnection], writer: W) -> Result<()> {
    encode_with(format, set, writer, &OutputOptions::default())
}

/// Encode `set` as `format`.
pub fn encode_with<W: Write>(
    format: OutputFormat,
    set: &[OpenConnection],
    writer: W,
    opts: &OutputOptions,
) -> Result<()> {
    tracing::debug!(%format, records = set.len(), "encoding output");
    encoder(format, writer, opts).encode(set)
}
