//! ISO 8601 video duration parsing (`PT1H2M3S`)

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("duration '{0}' has no components")]
    Empty(String),
    #[error("malformed duration '{0}'")]
    Malformed(String),
    #[error("duration '{0}' is too long")]
    Overflow(String),
}

/// How seconds are folded into whole minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationMode {
    /// `round(seconds / 60)`, used by the tabular view
    #[default]
    Rounded,
    /// `floor(seconds / 60)`
    Truncated,
    /// Keep `seconds / 60` as a fraction
    Fractional,
}

impl DurationMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "rounded" | "round" => Some(Self::Rounded),
            "truncated" | "truncate" | "floor" => Some(Self::Truncated),
            "fractional" | "raw" => Some(Self::Fractional),
            _ => None,
        }
    }
}

/// Parsed duration components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoDuration {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl VideoDuration {
    /// Total length in seconds, `None` if it does not fit in a `u64`
    pub fn total_seconds(&self) -> Option<u64> {
        self.days
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(self.hours.checked_mul(3600)?)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    /// Whole minutes plus the seconds remainder, folded according to `mode`
    pub fn minutes(&self, mode: DurationMode) -> f64 {
        let whole = self.days as f64 * MINUTES_PER_DAY + self.hours as f64 * 60.0 + self.minutes as f64;
        let seconds = self.seconds as f64 / 60.0;

        match mode {
            DurationMode::Rounded => whole + seconds.round(),
            DurationMode::Truncated => whole + seconds.floor(),
            DurationMode::Fractional => whole + seconds,
        }
    }
}

/// Parse `P[nD]T[nH][nM][nS]`. At least one component must be present and
/// the total must fit in a `u64` count of seconds.
pub fn parse_duration(input: &str) -> Result<VideoDuration, DurationError> {
    let malformed = || DurationError::Malformed(input.to_string());

    let rest = input.trim().strip_prefix('P').ok_or_else(malformed)?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut duration = VideoDuration::default();
    let mut found = false;

    // Designators must appear in this order, each at most once.
    for (value, unit) in components(date_part).ok_or_else(malformed)? {
        match unit {
            'D' if !found => duration.days = value,
            _ => return Err(malformed()),
        }
        found = true;
    }

    if let Some(time) = time_part {
        let mut last = 0;
        for (value, unit) in components(time).ok_or_else(malformed)? {
            let rank = match unit {
                'H' => 1,
                'M' => 2,
                'S' => 3,
                _ => return Err(malformed()),
            };
            if rank <= last {
                return Err(malformed());
            }
            last = rank;
            match unit {
                'H' => duration.hours = value,
                'M' => duration.minutes = value,
                _ => duration.seconds = value,
            }
            found = true;
        }
    }

    if !found {
        return Err(DurationError::Empty(input.to_string()));
    }
    if duration.total_seconds().is_none() {
        return Err(DurationError::Overflow(input.to_string()));
    }

    Ok(duration)
}

/// Parse minutes directly
pub fn parse_minutes(input: &str, mode: DurationMode) -> Result<f64, DurationError> {
    parse_duration(input).map(|d| d.minutes(mode))
}

/// Split `12H5M` into `[(12, 'H'), (5, 'M')]`
fn components(part: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();

    for c in part.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if digits.is_empty() {
                return None;
            }
            let value = digits.parse::<u64>().ok()?;
            out.push((value, c));
            digits.clear();
        }
    }

    if !digits.is_empty() {
        return None;
    }

    Some(out)
}
