//! Change detection helpers used by the poll cycle.
//!
//! Text fields use exact equality, timeline fields a deadband so that the
//! position advancing between two polls does not fire an event every cycle.

use pmoplayerctl::Field;
use tracing::debug;

/// A position reading is applied only when it moves by more than this.
pub const POSITION_THRESHOLD_SECS: f64 = 0.5;

/// A duration reading is applied only when it moves by more than this.
pub const DURATION_THRESHOLD_SECS: f64 = 0.1;

/// Keeps a fetched text value only if the fetch succeeded and the text
/// carries something besides whitespace.
pub(crate) fn usable_text(result: pmoplayerctl::Result<String>) -> Option<String> {
    match result {
        Ok(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

/// Parses a seconds reading. Failed fetches, unparseable text and
/// non-finite values all yield `None`.
pub(crate) fn parse_seconds(field: Field, result: pmoplayerctl::Result<String>) -> Option<f64> {
    let text = result.ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!(field = %field, value = %text, "Ignoring unparseable timeline value");
            None
        }
    }
}

/// Replaces `stored` with `fetched` when it differs. Returns whether it did.
pub(crate) fn apply_text(stored: &mut String, fetched: Option<String>) -> bool {
    match fetched {
        Some(value) if *stored != value => {
            *stored = value;
            true
        }
        _ => false,
    }
}

/// Replaces `stored` with `fetched` when the difference is strictly greater
/// than `threshold`. Returns whether it did.
pub(crate) fn apply_with_threshold(stored: &mut f64, fetched: Option<f64>, threshold: f64) -> bool {
    match fetched {
        Some(value) if (value - *stored).abs() > threshold => {
            *stored = value;
            true
        }
        _ => false,
    }
}
