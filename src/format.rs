//! Pure helpers for time display and seek targeting

use crate::{Error, Result};

/// A playback position split into clock fields.
///
/// Minutes are total minutes: a source longer than 99 minutes renders a
/// three-digit minute field rather than wrapping into hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub minutes: u64,
    pub seconds: u8,
}

impl ClockTime {
    /// Zero-padded `(minutes, seconds)` text fields
    pub fn fields(&self) -> (String, String) {
        (format!("{:02}", self.minutes), format!("{:02}", self.seconds))
    }

    /// Machine-readable form used for `datetime` attributes, e.g. `01m 05s`
    pub fn datetime(&self) -> String {
        let (m, s) = self.fields();
        format!("{}m {}s", m, s)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Convert a duration in seconds to clock fields, truncating fractions.
///
/// Returns `Error::InvalidDuration` for negative, NaN or infinite input
/// (e.g. the duration of a source whose metadata has not loaded yet); callers
/// skip the display update in that case.
///
/// ```
/// let t = vidctl::format::format_duration(65.0).unwrap();
/// assert_eq!(t.to_string(), "01:05");
/// ```
pub fn format_duration(seconds: f64) -> Result<ClockTime> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(Error::InvalidDuration(seconds));
    }
    let whole = seconds.trunc() as u64;
    Ok(ClockTime {
        minutes: whole / 60,
        seconds: (whole % 60) as u8,
    })
}

/// Map a pointer position along the seek bar to a playback time.
///
/// The ratio is clamped to `[0, 1]`; widget geometry normally keeps it there.
pub fn compute_seek_target(pointer_offset_ratio: f64, max_value: f64) -> f64 {
    let ratio = if pointer_offset_ratio.is_nan() {
        0.0
    } else {
        pointer_offset_ratio.clamp(0.0, 1.0)
    };
    ratio * max_value
}

/// Pointer ratio from an offset inside a widget of the given width
pub fn pointer_ratio(offset_x: f64, width: f64) -> f64 {
    if width <= 0.0 || !width.is_finite() {
        return 0.0;
    }
    offset_x / width
}

/// Round to three decimals, matching how volume steps are stored
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
