//! Lookup configuration.

use std::time::Duration;

use crate::decode::Format;

/// Default limit on how long the external tool may run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for a [`Lookup`](crate::Lookup).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lsaddr::{Format, LookupConfig};
///
/// let config = LookupConfig::new()
///     .format(Format::Netstat)
///     .timeout(Duration::from_millis(500));
/// assert_eq!(config.format, Format::Netstat);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// Tool output format to request and decode.
    pub format: Format,
    /// Limit on each external tool run.
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            format: Format::platform_default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Create a configuration for the running platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tool output format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set the tool timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = LookupConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.format.is_connection_listing());
    }

    #[test]
    fn test_builder() {
        let config = LookupConfig::new()
            .format(Format::Lsof)
            .timeout(Duration::from_secs(1));
        assert_eq!(config.format, Format::Lsof);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
