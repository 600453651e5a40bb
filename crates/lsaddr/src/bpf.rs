//! Berkeley Packet Filter expression building.
//!
//! Expressions are plain strings combined with [`Expr::join`]. Joining never
//! adds parentheses; producers call [`Expr::wrap`] or [`Expr::group`] on a
//! compound sub-expression before combining it with a different operator.

use std::fmt;

use crate::record::Endpoint;

/// Boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Traffic direction qualifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dir {
    Src,
    Dst,
    #[default]
    None,
}

impl Dir {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Src => "src ",
            Self::Dst => "dst ",
            Self::None => "",
        }
    }
}

/// A packet filter expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expr(String);

const EMPTY_GROUP: &str = "()";

impl Expr {
    pub fn new(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the expression contains a boolean operator.
    pub fn is_compound(&self) -> bool {
        self.0.contains(" and ") || self.0.contains(" or ")
    }

    /// Combine `self` and `other` with `op`.
    ///
    /// An empty side, or a `()` right side, is absorbed and the other side
    /// is returned unchanged.
    pub fn join(self, op: Op, other: Expr) -> Expr {
        if other.is_empty() || other.0 == EMPTY_GROUP {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Expr(format!("{} {} {}", self.0, op.as_str(), other.0))
    }

    pub fn and(self, other: Expr) -> Expr {
        self.join(Op::And, other)
    }

    pub fn or(self, other: Expr) -> Expr {
        self.join(Op::Or, other)
    }

    /// Enclose in parentheses. An empty expression becomes `()`.
    pub fn wrap(&self) -> Expr {
        Expr(format!("({})", self.0))
    }

    /// Wrap only when compound, so the result can safely be joined with any
    /// operator.
    pub fn group(self) -> Expr {
        if self.is_compound() { self.wrap() } else { self }
    }

    /// Build the clause selecting traffic of `ep`.
    ///
    /// Hosts and ports that name nothing in particular (`*`, unspecified
    /// addresses, port `0`) are left out; an endpoint with neither yields an
    /// empty expression. The direction qualifies the leading primitive only:
    /// `src host H and port P`, or `src port P` when there is no host.
    pub fn from_endpoint(dir: Dir, ep: &Endpoint) -> Expr {
        let prefix = dir.prefix();
        match (ep.host_literal(), ep.port_literal()) {
            (Some(host), Some(port)) => Expr(format!("{}host {} and port {}", prefix, host, port)),
            (Some(host), None) => Expr(format!("{}host {}", prefix, host)),
            (None, Some(port)) => Expr(format!("{}port {}", prefix, port)),
            (None, None) => Expr::default(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Self(s)
    }
}
