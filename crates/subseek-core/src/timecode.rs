//! ASS timestamp helpers.
//!
//! ASS writes times as `H:MM:SS.CC` where the fraction is centiseconds, so
//! `0:18:38.72` is 1118.72 seconds.

use crate::{Error, Result};

/// Convert an ASS timestamp into seconds.
///
/// The fractional part is read as an integer count of hundredths, matching
/// how the subtitles are authored (`.5` therefore means 0.05 s).
pub fn to_seconds(timestamp: &str) -> Result<f64> {
    let invalid = || Error::Validation(format!("invalid timestamp: {timestamp:?}"));

    let mut parts = timestamp.trim().split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let hours: u64 = h.parse().map_err(|_| invalid())?;
    let minutes: u64 = m.parse().map_err(|_| invalid())?;

    let (secs, frac) = match s.split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (s, None),
    };
    let secs: u64 = secs.parse().map_err(|_| invalid())?;
    let centis: u64 = match frac {
        Some(frac) => frac.parse().map_err(|_| invalid())?,
        None => 0,
    };

    let whole = hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(invalid)?;

    Ok(whole as f64 + centis as f64 / 100.0)
}

/// Render seconds as `HH:MM:SS` for log lines and CLI output.
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
