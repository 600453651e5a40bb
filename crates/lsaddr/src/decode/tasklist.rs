//! Decoder for Windows `tasklist` output.
//!
//! ```text
//! Image Name                     PID Session Name        Session#    Mem Usage
//! ========================= ======== ================ =========== ============
//! System Idle Process              0 Services                   0          4 K
//! svchost.exe                    940 Services                   0     52,336 K
//! ```
//!
//! Image names may contain spaces, so columns are read by position using the
//! widths of the `=` runs in the delimiter row rather than by splitting on
//! whitespace.

use crate::error::{Error, Result};
use crate::record::{Endpoint, OpenConnection};
use crate::util::{chunk_line, get_pid};

/// Minimum number of columns in the delimiter row: image name and pid.
pub const MIN_COLUMNS: usize = 2;

/// Check if `line` is the `=====  ====` row closing the header.
pub fn is_delimiter(line: &str) -> bool {
    let line = line.trim_end();
    line.starts_with('=') && line.chars().all(|c| c == '=' || c == ' ')
}

/// Column widths from the delimiter row.
pub fn column_widths(line: &str) -> Result<Vec<usize>> {
    let runs = chunk_line(line.trim_end(), " ", MIN_COLUMNS)
        .map_err(|e| Error::format(format!("unexpected header format: {}", e), line))?;
    Ok(runs.iter().map(|run| run.len()).collect())
}

/// Decode a single data row using the widths from [`column_widths`].
///
/// Each column is `width + 1` bytes wide, the extra byte being the space
/// between runs. A short row yields whatever bytes remain.
pub fn decode_line(line: &str, widths: &[usize]) -> Result<OpenConnection> {
    if widths.len() < MIN_COLUMNS {
        return Err(Error::format("missing column widths", line));
    }

    let bytes = line.as_bytes();
    let mut offset = 0;
    let mut fields = Vec::with_capacity(MIN_COLUMNS);
    for width in &widths[..MIN_COLUMNS] {
        if offset >= bytes.len() {
            return Err(Error::format("unable to read tasklist column", line));
        }
        let end = (offset + width + 1).min(bytes.len());
        fields.push(String::from_utf8_lossy(&bytes[offset..end]).trim().to_string());
        offset = end;
    }

    let pid_raw = fields.pop().unwrap_or_default();
    let image = fields.pop().unwrap_or_default();
    if image.is_empty() {
        return Err(Error::format("couldn't decode image from line", line));
    }
    if pid_raw.is_empty() {
        return Err(Error::format("couldn't decode pid from line", line));
    }
    let pid =
        get_pid(&pid_raw).map_err(|e| Error::format(format!("error parsing pid: {}", e), line))?;

    Ok(OpenConnection {
        command: image,
        pid,
        protocol: String::new(),
        local: Endpoint::default(),
        remote: None,
        state: None,
        source: line.to_string(),
    })
}

/// Decode a complete tasklist output.
///
/// Everything up to and including the delimiter row is header. Fails only
/// when the delimiter row has fewer than [`MIN_COLUMNS`] runs; a missing
/// delimiter yields an empty set.
pub fn decode(text: &str) -> Result<Vec<OpenConnection>> {
    let mut lines = text.lines();
    let widths = loop {
        match lines.next() {
            Some(line) if is_delimiter(line) => break column_widths(line)?,
            Some(_) => continue,
            None => {
                tracing::debug!("tasklist header delimiter not found");
                return Ok(Vec::new());
            }
        }
    };

    let mut set = Vec::new();
    for line in lines {
        let line = crate::util::chunk::trim_line_end(line);
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line, &widths) {
            Ok(task) => set.push(task),
            Err(err) => tracing::debug!(%err, "skipping tasklist line"),
        }
    }
    Ok(set)
}

/// Process identifiers of every task running `image`, in input order.
///
/// Image names compare case-insensitively, as they do on Windows.
pub fn pids_for_image(tasks: &[OpenConnection], image: &str) -> Vec<u32> {
    tasks
        .iter()
        .filter(|t| t.command.eq_ignore_ascii_case(image))
        .map(|t| t.pid)
        .collect()
}
