//! Canonical open connection record.
//!
//! Every decoder, whatever the tool it reads, produces [`OpenConnection`]
//! values. Records are immutable once decoded and live for a single lookup.

use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

/// One side of a connection.
///
/// Host and port are kept as text: lsof may print service names in place of
/// port numbers and unparsable tokens are preserved verbatim as an opaque
/// host with no port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    /// Lower-case network, taken from the decoder context (`tcp`, `udp`, ...).
    pub network: String,
    /// Host literal, `*` for any, or the raw token for opaque endpoints.
    pub host: String,
    /// Port literal, `*` for any.
    pub port: Option<String>,
}

impl Endpoint {
    /// Create an endpoint from its parts.
    pub fn new(network: impl Into<String>, host: impl Into<String>, port: Option<String>) -> Self {
        Self {
            network: network.into(),
            host: host.into(),
            port,
        }
    }

    /// Create an endpoint that keeps `raw` untouched as its host.
    pub fn opaque(network: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(network, raw, None)
    }

    /// Check if neither host nor port is set.
    pub fn is_empty(&self) -> bool {
        self.host.is_empty() && self.port.is_none()
    }

    /// The host, unless it is empty, `*`, an unspecified address or a raw
    /// token that is neither an address nor a host name.
    pub fn host_literal(&self) -> Option<&str> {
        let host = self.host.as_str();
        if host.is_empty() || host == "*" || !is_host_token(host) || is_unspecified_ip(host) {
            return None;
        }
        Some(host)
    }

    /// The port, unless it is absent, `*` or `0`.
    pub fn port_literal(&self) -> Option<&str> {
        match self.port.as_deref() {
            None | Some("") | Some("*") | Some("0") => None,
            Some(port) => Some(port),
        }
    }

    /// Check if this endpoint names no concrete host and no concrete port,
    /// e.g. netstat's `0.0.0.0:0` or `*:*` peer of a listening socket.
    pub fn is_unspecified(&self) -> bool {
        self.host_literal().is_none() && self.port_literal().is_none()
    }
}

/// Address, host name or zoned IPv6 address characters only.
fn is_host_token(host: &str) -> bool {
    host.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '%'))
}

fn is_unspecified_ip(host: &str) -> bool {
    host.parse::<IpAddr>()
        .map(|ip| ip.is_unspecified())
        .unwrap_or(false)
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.port {
            Some(port) if self.host.contains(':') => write!(f, "[{}]:{}", self.host, port),
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// An open network connection owned by a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenConnection {
    /// Command owning the connection. Empty when the tool does not report it.
    pub command: String,
    /// Process identifier of the owner.
    pub pid: u32,
    /// Lower-case protocol, taken from the decoder context.
    pub protocol: String,
    /// Local endpoint.
    pub local: Endpoint,
    /// Remote endpoint; absent for listening or unconnected sockets.
    pub remote: Option<Endpoint>,
    /// Connection state as reported by the tool (`ESTABLISHED`, `LISTENING`).
    pub state: Option<String>,
    /// Raw line the record was decoded from.
    #[serde(skip)]
    pub source: String,
}

impl OpenConnection {
    /// Check if the socket has no peer.
    pub fn is_listening(&self) -> bool {
        self.remote.is_none()
    }

    /// The local and, when present, remote endpoint.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        std::iter::once(&self.local).chain(self.remote.as_ref())
    }
}

impl fmt::Display for OpenConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {} {}", self.command, self.pid, self.protocol, self.local)?;
        if let Some(remote) = &self.remote {
            write!(f, "->{}", remote)?;
        }
        if let Some(state) = &self.state {
            write!(f, " {}", state)?;
        }
        Ok(())
    }
}
