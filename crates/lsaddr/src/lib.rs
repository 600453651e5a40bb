//! Show the network addresses your applications are using.
//!
//! lsaddr runs the platform's socket listing tool (`lsof` on macOS and
//! Linux, `netstat` on Windows), decodes its output into
//! [`OpenConnection`] records, keeps the ones matching a selector and
//! encodes them as a CSV table, a JSON array or a packet filter expression
//! ready to hand to `tcpdump`.
//!
//! # Selectors
//!
//! - `""` or `*`: every connection.
//! - a regular expression, matched against the raw tool output line
//!   (`Spotify`, `(?i)chrome`, `748|4`).
//! - an executable image name (`chrome.exe`), resolved to the pids running
//!   it through `tasklist`.
//!
//! # Example
//!
//! ```ignore
//! use lsaddr::{Lookup, LookupConfig, OutputFormat};
//!
//! #[tokio::main]
//! async fn main() -> lsaddr::Result<()> {
//!     let set = Lookup::new(LookupConfig::default()).run("Spotify").await?;
//!     lsaddr::encode(OutputFormat::Bpf, &set, std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! Captured output can be decoded without running any tool:
//!
//! ```
//! use lsaddr::{Format, decode, filter};
//!
//! let raw = b"UDP [::1]:62261 *:* 1036\nTCP 0.0.0.0:135 0.0.0.0:0 LISTENING 748\n";
//! let set = filter("748", decode(Format::Netstat, raw)?)?;
//! assert_eq!(set.len(), 1);
//! assert_eq!(set[0].state.as_deref(), Some("LISTENING"));
//! # Ok::<(), lsaddr::Error>(())
//! ```

pub mod bpf;
pub mod config;
pub mod decode;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod output;
pub mod record;
pub mod resolve;
pub mod tool;
pub mod util;

pub use config::LookupConfig;
pub use decode::{Format, decode};
pub use error::{Error, Result};
pub use filter::{FilterSpec, filter};
pub use lookup::{Lookup, lookup};
pub use output::{BpfOptions, KeyColumn, OutputFormat, OutputOptions, encode, encode_with};
pub use record::{Endpoint, OpenConnection};
