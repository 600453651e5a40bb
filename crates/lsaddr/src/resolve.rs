//! Selector resolution.
//!
//! netstat does not report command names, so a selector naming a Windows
//! executable (`chrome.exe`) would never match its lines. Such selectors are
//! turned into the pids currently running that image, looked up with
//! `tasklist`.

use std::time::Duration;

use crate::decode::{Format, tasklist};
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::tool;

/// Image name of a selector naming an executable, without any directory.
pub fn image_name(selector: &str) -> Option<&str> {
    let image = selector.rsplit(['\\', '/']).next().unwrap_or(selector);
    let is_exe = image.len() > ".exe".len()
        && image
            .get(image.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".exe"));
    is_exe.then_some(image)
}

/// Narrow `spec` to the pids of `image` found in a tasklist capture.
///
/// `spec` is returned unchanged when the capture cannot be decoded or no
/// task runs `image`.
pub fn from_tasklist(spec: FilterSpec, image: &str, raw: &[u8]) -> Result<FilterSpec> {
    let tasks = match Format::Tasklist.decode(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(%err, "unable to decode tasklist output");
            return Ok(spec);
        }
    };

    let pids = tasklist::pids_for_image(&tasks, image);
    if pids.is_empty() {
        tracing::warn!(image, "cannot find any pid associated with image");
        return Ok(spec);
    }
    tracing::debug!(image, ?pids, "resolved image");
    FilterSpec::pids(&pids)
}

/// Compile `selector`, resolving executable names to pids.
///
/// Fails only on an invalid selector; tasklist failures fall back to the
/// plain regular expression.
pub async fn resolve(selector: &str, timeout: Duration) -> Result<FilterSpec> {
    let spec = FilterSpec::compile(selector)?;
    let Some(image) = image_name(selector) else {
        return Ok(spec);
    };

    match tool::run(Format::Tasklist, timeout).await {
        Ok(raw) => from_tasklist(spec, image, &raw),
        Err(err) => {
            tracing::warn!(%err, "unable to execute tasklist");
            Ok(spec)
        }
    }
}
