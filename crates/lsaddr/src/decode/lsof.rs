//! Decoder for `lsof -i -n -P` output.
//!
//! ```text
//! COMMAND   PID USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
//! Dropbox   614 dan   247u  IPv4 0x25c5bf09a393d583      0t0  TCP 192.168.0.61:58282->162.125.18.133:443 (ESTABLISHED)
//! postgres  676 dan    10u  IPv6 0x25c5bf0997ca88e3      0t0  UDP [::1]:60051->[::1]:60051
//! ```
//!
//! With `-n` and `-P` the NAME column is `addr:port[->addr:port]`. Endpoints
//! that still cannot be split are kept opaque rather than failing the line.

use crate::error::{Error, Result};
use crate::record::{Endpoint, OpenConnection};
use crate::util::{chunk_whitespace, get_pid, parse_endpoint_lossy};

/// Minimum number of columns in a connection line.
pub const MIN_ITEMS: usize = 9;

const COMMAND: usize = 0;
const PID: usize = 1;
const NODE: usize = 7;
const NAME: usize = 8;
const STATE: usize = 9;

/// Decode a single lsof line.
///
/// The header row fails pid parsing and is rejected like any other
/// malformed line.
pub fn decode_line(line: &str) -> Result<OpenConnection> {
    let chunks = chunk_whitespace(line, MIN_ITEMS)?;

    let pid = get_pid(chunks[PID])
        .map_err(|e| Error::format(format!("error parsing pid: {}", e), line))?;
    let protocol = chunks[NODE].to_lowercase();
    let (local, remote) = split_name(&protocol, chunks[NAME]);
    let state = chunks.get(STATE).map(|s| strip_parens(s).to_string());

    Ok(OpenConnection {
        command: chunks[COMMAND].to_string(),
        pid,
        protocol,
        local,
        remote,
        state,
        source: line.to_string(),
    })
}

/// Split the NAME column into local and optional remote endpoint.
pub fn split_name(network: &str, name: &str) -> (Endpoint, Option<Endpoint>) {
    match name.split_once("->") {
        Some((local, remote)) => {
            let remote = (!remote.is_empty()).then(|| parse_endpoint_lossy(network, remote));
            (parse_endpoint_lossy(network, local), remote)
        }
        None => (parse_endpoint_lossy(network, name), None),
    }
}

fn strip_parens(state: &str) -> &str {
    state
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(state)
}

/// Decode a complete lsof output, skipping lines that do not parse.
pub fn decode(text: &str) -> Vec<OpenConnection> {
    super::decode_lines("lsof", text, decode_line)
}
