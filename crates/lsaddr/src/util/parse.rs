//! Argument and column parsing utilities.

use std::time::Duration;

/// Error type for parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a process identifier column.
///
/// Only plain decimal is accepted; tools never print pids in another base.
pub fn get_pid(s: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber(s.to_string()));
    }
    s.parse()
        .map_err(|e| ParseError::InvalidNumber(format!("{}: {}", s, e)))
}

/// Parse a timeout such as `5s`, `500ms` or `1.5m`.
///
/// Units: `ns`, `us`, `ms`, `s`, `m`, `h`; a bare number is seconds.
/// Values that do not fit a [`Duration`] are rejected.
pub fn get_time(s: &str) -> Result<Duration> {
    let s = s.trim().to_ascii_lowercase();
    let idx = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(idx);
    let invalid = || ParseError::InvalidNumber(digits.to_string());

    let num: f64 = digits.parse().map_err(|_| invalid())?;
    let secs = match unit {
        "" | "s" | "sec" | "secs" => num,
        "ms" | "msec" | "msecs" => num / 1e3,
        "us" | "usec" | "usecs" => num / 1e6,
        "ns" | "nsec" | "nsecs" => {
            // `as u64` saturates, so range-check first.
            if num >= u64::MAX as f64 {
                return Err(invalid());
            }
            return Ok(Duration::from_nanos(num as u64));
        }
        "m" | "min" | "mins" => num * 60.0,
        "h" | "hour" | "hours" => num * 3600.0,
        _ => return Err(ParseError::UnknownUnit(unit.to_string())),
    };

    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_pid() {
        assert_eq!(get_pid("748").unwrap(), 748);
        assert_eq!(get_pid("0").unwrap(), 0);
        assert!(get_pid("PID").is_err());
        assert!(get_pid("-1").is_err());
        assert!(get_pid("+4").is_err());
        assert!(get_pid("").is_err());
        assert!(get_pid("99999999999").is_err());
    }

    #[test]
    fn test_get_time() {
        assert_eq!(get_time("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(get_time("5").unwrap(), Duration::from_secs(5));
        assert_eq!(get_time("100ms").unwrap(), Duration::from_millis(100));
        assert_eq!(get_time("1000us").unwrap(), Duration::from_micros(1000));
        assert_eq!(get_time("2m").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_get_time_rejects() {
        assert!(get_time("fast").is_err());
        assert!(get_time("10 fortnights").is_err());
        assert!(get_time("").is_err());
        assert!(get_time("1.2.3s").is_err());
    }

    #[test]
    fn test_get_time_out_of_range() {
        assert!(get_time("99999999999999999999h").is_err());
        assert!(get_time("99999999999999999999999ns").is_err());
        assert!(get_time(&"9".repeat(400)).is_err());
        assert_eq!(get_time("1500ns").unwrap(), Duration::from_nanos(1500));
        assert_eq!(get_time("2h").unwrap(), Duration::from_secs(7200));
    }
}
