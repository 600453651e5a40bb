//! Shared utilities for lsaddr.

pub mod addr;
pub mod chunk;
pub mod parse;

pub use addr::{parse_endpoint, parse_endpoint_lossy, parse_endpoint_strict, split_host_port};
pub use chunk::{chunk_line, chunk_whitespace};
pub use parse::{get_pid, get_time};
