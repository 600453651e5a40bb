//! Packet filter output.

use std::collections::HashSet;
use std::io::Write;

use super::{BpfOptions, Encoder};
use crate::bpf::{Dir, Expr};
use crate::error::{Error, Result};
use crate::record::OpenConnection;

/// Writes a single packet filter expression matching the traffic of every
/// record, terminated by a newline.
pub struct BpfEncoder<W: Write> {
    writer: W,
    opts: BpfOptions,
}

impl<W: Write> BpfEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            opts: BpfOptions::default(),
        }
    }

    pub fn options(mut self, opts: BpfOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Encoder for BpfEncoder<W> {
    fn encode(&mut self, set: &[OpenConnection]) -> Result<()> {
        let expr = if self.opts.hosts_only {
            hosts_expr(set)
        } else {
            connections_expr(set, self.opts.directed)
        };
        writeln!(self.writer, "{}", expr).map_err(Error::Encoding)?;
        self.writer.flush().map_err(Error::Encoding)
    }
}

/// OR of the local and remote clause of every connection. Repeated clauses
/// are kept once, at their first position.
pub(crate) fn connections_expr(set: &[OpenConnection], directed: bool) -> Expr {
    let (src, dst) = if directed { (Dir::Src, Dir::Dst) } else { (Dir::None, Dir::None) };

    let mut seen = HashSet::new();
    let mut expr = Expr::default();
    for conn in set {
        let remote = conn.remote.iter().map(|ep| Expr::from_endpoint(dst, ep));
        for clause in std::iter::once(Expr::from_endpoint(src, &conn.local)).chain(remote) {
            let clause = clause.group();
            if clause.is_empty() || !seen.insert(clause.clone()) {
                continue;
            }
            expr = expr.or(clause);
        }
    }
    expr
}

/// `host A or B or C` over every distinct host, in first-seen order.
pub(crate) fn hosts_expr(set: &[OpenConnection]) -> Expr {
    let mut seen = HashSet::new();
    let hosts: Vec<&str> = set
        .iter()
        .flat_map(|conn| conn.endpoints())
        .filter_map(|ep| ep.host_literal())
        .filter(|host| seen.insert(*host))
        .collect();

    if hosts.is_empty() {
        return Expr::default();
    }
    Expr::new(format!("host {}", hosts.join(" or ")))
}
