//! Error types for lookup, decoding and encoding.

use std::io;
use std::time::Duration;

/// Result type for lsaddr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while looking up open connections.
///
/// `Format` and `Address` are recovered locally by the decoders (the
/// offending line is skipped or the endpoint kept opaque). Every other
/// variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A line or record does not follow the expected grammar.
    #[error("format error: {reason}: line \"{line}\"")]
    Format {
        /// Why the line was rejected.
        reason: String,
        /// The offending line, without its terminator.
        line: String,
    },

    /// An endpoint token could not be split into host and port.
    #[error("invalid address \"{addr}\": {reason}")]
    Address {
        /// The raw endpoint token.
        addr: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The selector is not a valid regular expression.
    #[error("invalid selector: {0}")]
    Selector(#[from] regex::Error),

    /// The external tool could not be run or exited unsuccessfully.
    #[error("unable to run {tool}: {message}")]
    ToolInvocation {
        /// Program name.
        tool: String,
        /// Failure description.
        message: String,
    },

    /// The external tool did not finish in time.
    #[error("{tool} did not complete within {timeout:?}")]
    Timeout {
        /// Program name.
        tool: String,
        /// The timeout that expired.
        timeout: Duration,
    },

    /// Writing the encoded output failed.
    #[error("unable to encode output: {0}")]
    Encoding(#[source] io::Error),

    /// Reading an input capture failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a format error for `line`.
    pub fn format(reason: impl Into<String>, line: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
            line: line.into(),
        }
    }

    /// Create an address error for `addr`.
    pub fn address(reason: impl Into<String>, addr: impl Into<String>) -> Self {
        Self::Address {
            reason: reason.into(),
            addr: addr.into(),
        }
    }

    /// Create a tool invocation error.
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Check if this error aborts a lookup run.
    ///
    /// Format and address errors only ever affect a single line.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Format { .. } | Self::Address { .. })
    }

    /// Check if this is a tool timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.into())
    }
}
