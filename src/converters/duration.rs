//! Duration codec.
//!
//! Clock strings and millisecond counts both reduce to an hours/minutes/
//! seconds breakdown, which is then encoded as `PT` followed by `H:MM:SS`.
//! Anything that cannot be read encodes as [`ZERO_DURATION`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Prefix of every canonical duration string.
pub const CANONICAL_PREFIX: &str = "PT";

/// Canonical encoding of a zero-length duration.
pub const ZERO_DURATION: &str = "PT0:00:00";

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

fn clock_regex() -> &'static Regex {
    static CLOCK: OnceLock<Regex> = OnceLock::new();
    CLOCK.get_or_init(|| {
        Regex::new(r"^\s*(?:(?:(?P<hours>\d+):)?(?P<minutes>\d+):)?(?P<seconds>\d+)\s*$")
            .expect("clock pattern is valid")
    })
}

/// A raw duration value, as found on a provider record.
#[derive(Debug, Clone, Copy)]
pub enum DurationSource<'a> {
    /// `"M:SS"` or `"H:MM:SS"`.
    Clock(&'a str),
    /// Milliseconds, as a JSON number or numeric string.
    Millis(&'a Value),
    /// No duration field at all.
    Missing,
}

/// Hours/minutes/seconds breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ClockDuration {
    pub const ZERO: ClockDuration = ClockDuration {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Parse a colon-separated clock string. Missing higher units are 0.
    pub fn parse_clock(text: &str) -> Option<Self> {
        let caps = clock_regex().captures(text)?;
        let group = |name: &str| -> Option<u64> {
            match caps.name(name) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(0),
            }
        };

        Some(Self {
            hours: group("hours")?,
            minutes: group("minutes")?,
            seconds: group("seconds")?,
        })
    }

    /// Split milliseconds with truncating division.
    pub fn from_millis(millis: u64) -> Self {
        let hours = millis / MS_PER_HOUR;
        let rest = millis % MS_PER_HOUR;
        Self {
            hours,
            minutes: rest / MS_PER_MINUTE,
            seconds: (rest % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    /// Canonical string, e.g. `PT1:02:03`.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Read a canonical string back into its parts.
    pub fn decode(canonical: &str) -> Option<Self> {
        canonical
            .strip_prefix(CANONICAL_PREFIX)
            .and_then(Self::parse_clock)
    }

    /// Whole seconds, saturating at `u64::MAX`.
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

impl fmt::Display for ClockDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{:02}:{:02}",
            CANONICAL_PREFIX, self.hours, self.minutes, self.seconds
        )
    }
}

/// Read a millisecond value. Accepts non-negative integers, finite
/// non-negative floats (truncated) and strings holding an integer.
pub fn parse_millis(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Encode any duration source to its canonical string.
///
/// Never fails. Missing or unreadable input yields [`ZERO_DURATION`] and a
/// data-quality event naming `subject`.
pub fn encode(source: DurationSource<'_>, subject: &str) -> String {
    let parsed = match source {
        DurationSource::Clock(text) => {
            let parsed = ClockDuration::parse_clock(text);
            if parsed.is_none() {
                warn!(
                    target: "ytm_catalog::data_quality",
                    subject, raw = text, "unparseable clock duration, using zero"
                );
            }
            parsed
        }
        DurationSource::Millis(value) => {
            let parsed = parse_millis(value).map(ClockDuration::from_millis);
            if parsed.is_none() {
                warn!(
                    target: "ytm_catalog::data_quality",
                    subject, raw = %value, "malformed millisecond duration, using zero"
                );
            }
            parsed
        }
        DurationSource::Missing => {
            warn!(
                target: "ytm_catalog::data_quality",
                subject, "duration missing, using zero"
            );
            None
        }
    };

    parsed.unwrap_or(ClockDuration::ZERO).encode()
}
