//! Decode, filter pipeline.

use crate::config::LookupConfig;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::record::OpenConnection;
use crate::{resolve, tool};

/// Looks up the open connections matching a selector.
///
/// # Example
///
/// ```ignore
/// use lsaddr::{Lookup, LookupConfig};
///
/// let lookup = Lookup::new(LookupConfig::default());
/// for conn in lookup.run("Spotify").await? {
///     println!("{}", conn);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    config: LookupConfig,
}

impl Lookup {
    pub fn new(config: LookupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Run the configured tool and return the connections matching
    /// `selector`.
    ///
    /// The selector is compiled before the tool runs, so an invalid one
    /// never costs a tool invocation.
    pub async fn run(&self, selector: &str) -> Result<Vec<OpenConnection>> {
        let spec = resolve::resolve(selector, self.config.timeout).await?;
        tracing::debug!(?spec, "selector compiled");

        let raw = tool::run(self.config.format, self.config.timeout).await?;
        self.process(&spec, &raw)
    }

    /// Decode an existing capture of the configured format and return the
    /// connections matching `selector`.
    pub fn from_bytes(&self, raw: &[u8], selector: &str) -> Result<Vec<OpenConnection>> {
        let spec = FilterSpec::compile(selector)?;
        self.process(&spec, raw)
    }

    /// Decode `raw` and keep the records `spec` matches.
    ///
    /// Line oriented formats are prefiltered before decoding, so most lines
    /// are rejected without being parsed.
    pub fn process(&self, spec: &FilterSpec, raw: &[u8]) -> Result<Vec<OpenConnection>> {
        let format = self.config.format;
        let set = if format.is_connection_listing() && !spec.is_all() {
            let text = String::from_utf8_lossy(raw);
            let text = spec.prefilter(&text);
            format.decode(text.as_bytes())?
        } else {
            format.decode(raw)?
        };

        let set = spec.apply(set);
        tracing::info!(format = %format, connections = set.len(), "lookup completed");
        Ok(set)
    }
}

/// Look up the connections matching `selector` with the default
/// configuration.
pub async fn lookup(selector: &str) -> Result<Vec<OpenConnection>> {
    Lookup::default().run(selector).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Format;

    const LSOF: &str = "\
COMMAND     PID            USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
Dropbox     614 danielmorandini  236u  IPv4 0x25c5bf09a4161583      0t0  TCP 192.168.0.61:58122->162.125.66.7:443 (ESTABLISHED)
Spotify   11778 danielmorandini  128u  IPv4 0x25c5bf09993eff03      0t0  TCP 192.168.0.61:51291->35.186.224.47:443 (ESTABLISHED)
postgres    676 danielmorandini   10u  IPv6 0x25c5bf0997ca88e3      0t0  UDP [::1]:60051->[::1]:60051
";

    fn lookup(format: Format) -> Lookup {
        Lookup::new(LookupConfig::new().format(format))
    }

    #[test]
    fn test_from_bytes() {
        let set = lookup(Format::Lsof).from_bytes(LSOF.as_bytes(), "Spotify").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].pid, 11778);
    }

    #[test]
    fn test_from_bytes_all() {
        let set = lookup(Format::Lsof).from_bytes(LSOF.as_bytes(), "*").unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_from_bytes_invalid_selector() {
        let err = lookup(Format::Lsof).from_bytes(LSOF.as_bytes(), "[").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_process_pids() {
        let spec = FilterSpec::pids(&[614, 676]).unwrap();
        let set = lookup(Format::Lsof).process(&spec, LSOF.as_bytes()).unwrap();
        assert_eq!(set.iter().map(|c| c.pid).collect::<Vec<_>>(), vec![614, 676]);
    }

    #[tokio::test]
    async fn test_run_invalid_selector_skips_tool() {
        let lookup = Lookup::new(LookupConfig::new().timeout(std::time::Duration::ZERO));
        let err = lookup.run("(").await.unwrap_err();
        assert!(matches!(err, crate::Error::Selector(_)));
    }
}
