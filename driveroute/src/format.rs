//! Human-readable formatting of route distance and duration.
//!
//! The Routes API reports distance as integer meters and duration as a
//! seconds string such as `"1234s"`. These helpers turn them into the short
//! strings shown by the frontend.

use std::str::FromStr;

use crate::error::{Result, RouteError};

/// Language used for upstream requests and duration formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// Japanese (`ja`), e.g. `"1時間5分"`.
    #[default]
    Japanese,
    /// English (`en`), e.g. `"1 hour 5 minutes"`.
    English,
}

impl Language {
    /// Language code sent to the Google APIs.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Japanese => "ja",
            Language::English => "en",
        }
    }
}

impl FromStr for Language {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "ja-jp" | "japanese" => Ok(Language::Japanese),
            "en" | "en-us" | "en-gb" | "english" => Ok(Language::English),
            other => Err(RouteError::Config(format!(
                "unsupported language '{other}' (expected 'ja' or 'en')"
            ))),
        }
    }
}

/// Format a distance in meters.
///
/// Values of 1000 m and above are shown in kilometers with one decimal place,
/// truncated rather than rounded.
///
/// # Examples
///
/// ```
/// use driveroute::format::format_distance;
///
/// assert_eq!(format_distance(999), "999 m");
/// assert_eq!(format_distance(12_345), "12.3 km");
/// ```
pub fn format_distance(meters: u64) -> String {
    if meters >= 1000 {
        let tenths = meters / 100;
        format!("{}.{} km", tenths / 10, tenths % 10)
    } else {
        format!("{} m", meters)
    }
}

/// Format a duration given in whole seconds.
///
/// Seconds below a full minute are dropped. Hours are only shown when non-zero.
pub fn format_duration(seconds: u64, language: Language) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    match language {
        Language::Japanese => {
            if hours > 0 {
                format!("{}時間{}分", hours, minutes)
            } else {
                format!("{}分", minutes)
            }
        }
        Language::English => {
            if hours > 0 {
                format!(
                    "{} {} {} {}",
                    hours,
                    plural(hours, "hour", "hours"),
                    minutes,
                    plural(minutes, "minute", "minutes")
                )
            } else {
                format!("{} {}", minutes, plural(minutes, "minute", "minutes"))
            }
        }
    }
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Parse a Routes API duration string (`"123s"`) into whole seconds.
///
/// Fractional values are truncated. The trailing `s` is optional.
pub fn parse_duration_seconds(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);

    if let Ok(seconds) = digits.parse::<u64>() {
        return Ok(seconds);
    }

    match digits.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds.trunc() as u64),
        _ => Err(RouteError::InvalidResponse(format!(
            "unparseable route duration '{}'",
            value
        ))),
    }
}
