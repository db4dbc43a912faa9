//! Brewing parameters and duration parsing

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Brewing data, used by gongfu and western brewing alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brewing {
    /// Temperature in Celsius degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<u16>,
    /// Weight in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Initial brewing time, `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    /// Increment added on each successive infusion, `HH:MM:SS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increments: Option<String>,
}

impl Brewing {
    /// Brewing with the given initial time and increments.
    pub fn timed(initial: impl Into<String>, increments: impl Into<String>) -> Self {
        Self {
            initial: Some(initial.into()),
            increments: Some(increments.into()),
            ..Self::default()
        }
    }

    /// Countdown length of the given 1-based infusion.
    ///
    /// Returns `None` when either timing field is missing, unparseable, or
    /// too large to represent.
    pub fn infusion_duration(&self, infusion: u32) -> Option<chrono::Duration> {
        let initial = parse_duration_seconds(self.initial.as_deref()?)?;
        let increments = parse_duration_seconds(self.increments.as_deref()?)?;
        let steps = i64::from(infusion.saturating_sub(1));
        let seconds = increments.checked_mul(steps)?.checked_add(initial)?;
        chrono::Duration::try_seconds(seconds)
    }
}

/// Longest duration, in seconds, a countdown can represent.
pub const MAX_DURATION_SECONDS: i64 = i64::MAX / 1000;

/// Parse a duration in seconds from the API's duration formats.
///
/// Accepts `HH:MM:SS`, `D HH:MM:SS` (days prefix) or a bare number of seconds.
/// Values above [`MAX_DURATION_SECONDS`] are rejected.
///
/// # Examples
///
/// ```
/// use brewlog_core::models::parse_duration_seconds;
///
/// assert_eq!(parse_duration_seconds("00:01:05"), Some(65));
/// assert_eq!(parse_duration_seconds("1 00:00:10"), Some(86_410));
/// assert_eq!(parse_duration_seconds("20"), Some(20));
/// ```
pub fn parse_duration_seconds(value: &str) -> Option<i64> {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    let re = DURATION.get_or_init(|| {
        Regex::new(r"^(?:(\d+)\s+)?(\d{1,2}):(\d{1,2}):(\d{1,2})(?:\.\d+)?$")
            .expect("Invalid regex")
    });

    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let Some(cap) = re.captures(value) else {
        return value
            .parse::<i64>()
            .ok()
            .filter(|seconds| (0..=MAX_DURATION_SECONDS).contains(seconds));
    };

    let days = cap
        .get(1)
        .map_or(Some(0), |days| days.as_str().parse::<i64>().ok())?;
    let hours: i64 = cap[2].parse().ok()?;
    let minutes: i64 = cap[3].parse().ok()?;
    let seconds: i64 = cap[4].parse().ok()?;

    days.checked_mul(24 * 3600)?
        .checked_add(hours * 3600 + minutes * 60 + seconds)
        .filter(|total| *total <= MAX_DURATION_SECONDS)
}
