//! Endpoint parsing.
//!
//! Tools print endpoints as `host:port`, `[ipv6]:port`, a bare host, or with
//! `*` standing for "any" in either position. [`split_host_port`] separates
//! the two halves; the `parse_endpoint*` functions wrap the result into an
//! [`Endpoint`] with different strictness.

use std::net::IpAddr;

use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_till;

use crate::error::{Error, Result};
use crate::record::Endpoint;

/// Result type for winnow parsers.
type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

/// `[` host `]`
fn bracketed<'a>(input: &mut &'a str) -> PResult<&'a str> {
    '['.parse_next(input)?;
    let host = take_till(0.., ']').parse_next(input)?;
    ']'.parse_next(input)?;
    Ok(host)
}

/// Optional `:` port, which must run to the end of input.
fn port<'a>(input: &mut &'a str) -> PResult<Option<&'a str>> {
    if input.is_empty() {
        return Ok(None);
    }
    ':'.parse_next(input)?;
    let port = take_till(1.., [':', '[', ']']).parse_next(input)?;
    if !input.is_empty() {
        return Err(ErrMode::Cut(ContextError::new()));
    }
    Ok(Some(port))
}

fn host_port<'a>(input: &mut &'a str) -> PResult<(&'a str, Option<&'a str>)> {
    let host = if input.starts_with('[') {
        bracketed(input)?
    } else {
        take_till(0.., [':', '[', ']']).parse_next(input)?
    };
    let port = port(input)?;
    Ok((host, port))
}

/// Split `addr` into host and optional port.
///
/// Brackets around IPv6 literals are removed. An unbracketed host containing
/// `:` is ambiguous and rejected, as is an empty port.
pub fn split_host_port(addr: &str) -> Result<(&str, Option<&str>)> {
    if addr.is_empty() {
        return Err(Error::address("empty address", addr));
    }
    host_port
        .parse(addr)
        .map_err(|_| Error::address("not a host:port pair", addr))
}

/// Parse an IP address, accepting an IPv6 zone suffix (`fe80::1%12`).
pub fn parse_ip(host: &str) -> Result<IpAddr> {
    let unzoned = match host.split_once('%') {
        Some((ip, _zone)) if ip.contains(':') => ip,
        _ => host,
    };
    unzoned
        .parse()
        .map_err(|_| Error::address("not an IP address", host))
}

/// Parse `addr` into an endpoint on `network`.
pub fn parse_endpoint(network: &str, addr: &str) -> Result<Endpoint> {
    let (host, port) = split_host_port(addr)?;
    Ok(Endpoint::new(network, host, port.map(String::from)))
}

/// Parse `addr`, keeping it as an opaque endpoint when it cannot be split.
pub fn parse_endpoint_lossy(network: &str, addr: &str) -> Endpoint {
    parse_endpoint(network, addr).unwrap_or_else(|err| {
        tracing::trace!(%err, "keeping opaque endpoint");
        Endpoint::opaque(network, addr)
    })
}

/// Parse `addr`, requiring an IP (or `*`) host and a numeric (or `*`) port.
pub fn parse_endpoint_strict(network: &str, addr: &str) -> Result<Endpoint> {
    let (host, port) = split_host_port(addr)?;
    if host != "*" {
        parse_ip(host)?;
    }
    match port {
        Some("*") => {}
        Some(p) => {
            p.parse::<u16>()
                .map_err(|_| Error::address("invalid port", addr))?;
        }
        None => return Err(Error::address("missing port", addr)),
    }
    Ok(Endpoint::new(network, host, port.map(String::from)))
}
