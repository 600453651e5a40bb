//! Decoder for Windows `netstat -ano` output.
//!
//! ```text
//! Active Connections
//!
//!   Proto  Local Address          Foreign Address        State           PID
//!   TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       748
//!  [svchost.exe]
//!   UDP    [::1]:62261            *:*                                    1036
//! ```
//!
//! netstat interleaves banners and owner hints with the table, so unlike
//! lsof both address columns must be real `ip:port` pairs for a line to be
//! accepted.

use crate::error::{Error, Result};
use crate::record::OpenConnection;
use crate::util::{chunk_whitespace, get_pid, parse_endpoint_strict};

/// Minimum number of columns in a connection line.
pub const MIN_ITEMS: usize = 4;

/// Decode a single netstat line.
///
/// Four columns mean there is no state (UDP); with five or more the fourth
/// column is the state and the fifth the pid.
pub fn decode_line(line: &str) -> Result<OpenConnection> {
    let chunks = chunk_whitespace(line, MIN_ITEMS)?;

    let protocol = chunks[0].to_lowercase();
    let local = parse_endpoint_strict(&protocol, chunks[1])
        .map_err(|e| Error::format(format!("unable to parse local address: {}", e), line))?;
    let remote = parse_endpoint_strict(&protocol, chunks[2])
        .map_err(|e| Error::format(format!("unable to parse remote address: {}", e), line))?;

    let (state, pid) = if chunks.len() == MIN_ITEMS {
        (None, chunks[3])
    } else {
        (Some(chunks[3].to_string()), chunks[4])
    };
    let pid =
        get_pid(pid).map_err(|e| Error::format(format!("error parsing pid: {}", e), line))?;

    Ok(OpenConnection {
        command: String::new(),
        pid,
        protocol,
        local,
        remote: (!remote.is_unspecified()).then_some(remote),
        state,
        source: line.to_string(),
    })
}

/// Decode a complete netstat output, skipping banner and malformed lines.
pub fn decode(text: &str) -> Vec<OpenConnection> {
    super::decode_lines("netstat", text, decode_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Endpoint;

    const OUTPUT: &str = "
Active Connections

  Proto  Local Address          Foreign Address        State           PID
  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       748
  RpcSs
 [svchost.exe]
  TCP    0.0.0.0:445            0.0.0.0:0              LISTENING       4
 Can not obtain ownership information
  TCP    0.0.0.0:5357           0.0.0.0:0              LISTENING       4
 [svchost.exe]
  UDP    [::1]:62261            *:*                                    1036
";

    #[test]
    fn test_decode_with_state() {
        let conn =
            decode_line("  TCP    0.0.0.0:135            0.0.0.0:0              LISTENING       748")
                .unwrap();

        assert_eq!(conn.protocol, "tcp");
        assert_eq!(conn.local, Endpoint::new("tcp", "0.0.0.0", Some("135".into())));
        assert_eq!(conn.remote, None);
        assert_eq!(conn.state.as_deref(), Some("LISTENING"));
        assert_eq!(conn.pid, 748);
        assert!(conn.command.is_empty());
    }

    #[test]
    fn test_decode_without_state() {
        let conn = decode_line("UDP [::1]:62261 *:* 1036").unwrap();

        assert_eq!(conn.protocol, "udp");
        assert_eq!(conn.local, Endpoint::new("udp", "::1", Some("62261".into())));
        assert_eq!(conn.remote, None);
        assert_eq!(conn.state, None);
        assert_eq!(conn.pid, 1036);
    }

    #[test]
    fn test_decode_established() {
        let conn =
            decode_line("  TCP    192.168.1.20:50112     140.82.112.25:443      ESTABLISHED     5120")
                .unwrap();

        assert_eq!(
            conn.remote,
            Some(Endpoint::new("tcp", "140.82.112.25", Some("443".into())))
        );
    }

    #[test]
    fn test_rejects_noise() {
        assert!(decode_line("  Proto  Local Address          Foreign Address        State           PID").is_err());
        assert!(decode_line(" Can not obtain ownership information").is_err());
        assert!(decode_line(" [svchost.exe]").is_err());
        assert!(decode_line("Active Connections").is_err());
    }

    #[test]
    fn test_rejects_bad_pid() {
        let err = decode_line("TCP 0.0.0.0:135 0.0.0.0:0 LISTENING svchost").unwrap_err();
        assert!(err.to_string().contains("error parsing pid"));
    }

    #[test]
    fn test_decode_output() {
        let set = decode(OUTPUT);
        assert_eq!(set.len(), 4);
        assert_eq!(set.iter().map(|c| c.pid).collect::<Vec<_>>(), vec![748, 4, 4, 1036]);
    }
}
