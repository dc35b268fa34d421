//! Minute-resolution time of day and the `"Xh-Yh"` / `"XhMM-YhMM"` catalog hour format.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Hour range '{0}' is not of the form 'Xh-Yh' or 'XhMM-YhMM'")]
    InvalidHourRange(String),
    #[error("Hour range '{0}' has a start time after or equal to its end time")]
    EmptyHourRange(String),
    #[error("Time value '{0}' is out of range")]
    InvalidTime(String),
}

pub type Result<T> = std::result::Result<T, Error>;

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;
const MINUTES_PER_DAY: u32 = MINUTES_PER_HOUR * HOURS_PER_DAY;

/// A time of day, stored as minutes since midnight.
#[derive(Copy, Clone, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Time {
    minutes: u32,
}

impl Time {
    pub fn new(minutes: u32) -> Option<Self> {
        if minutes >= MINUTES_PER_DAY {
            return None;
        }
        Some(Time { minutes })
    }

    pub fn from_hm(hour: u32, min: u32) -> Option<Self> {
        if min >= MINUTES_PER_HOUR || hour >= HOURS_PER_DAY {
            return None;
        }
        Some(Time {
            minutes: hour * MINUTES_PER_HOUR + min,
        })
    }

    pub fn get(&self) -> u32 {
        self.minutes
    }
}

/// A half-open `[start, end)` interval within a single day, in minutes since midnight.
#[derive(Copy, Clone, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct HourRange {
    pub start: Time,
    pub end: Time,
}

impl HourRange {
    pub fn duration_minutes(&self) -> u32 {
        self.end.get() - self.start.get()
    }
}

fn parse_h_token(token: &str, original: &str) -> Result<Time> {
    let token = token.trim();
    let mut parts = token.splitn(2, 'h');
    let hour_str = parts
        .next()
        .ok_or_else(|| Error::InvalidHourRange(original.to_string()))?;
    let min_str = parts.next();

    let hour: u32 = hour_str
        .trim()
        .parse()
        .map_err(|_| Error::InvalidHourRange(original.to_string()))?;
    let min: u32 = match min_str {
        Some("") | None => 0,
        Some(m) => m
            .trim()
            .parse()
            .map_err(|_| Error::InvalidHourRange(original.to_string()))?,
    };

    Time::from_hm(hour, min).ok_or_else(|| Error::InvalidTime(original.to_string()))
}

/// Parses a catalog `Heure` cell such as `"17h-18h"` or `"8h30-9h45"`.
///
/// Whitespace around the `-` separator and inside each token is tolerated.
pub fn parse_hour_range(text: &str) -> Result<HourRange> {
    let trimmed = text.trim();
    let (start_str, end_str) = trimmed
        .split_once('-')
        .ok_or_else(|| Error::InvalidHourRange(text.to_string()))?;

    let start = parse_h_token(start_str, text)?;
    let end = parse_h_token(end_str, text)?;

    if start >= end {
        return Err(Error::EmptyHourRange(text.to_string()));
    }

    Ok(HourRange { start, end })
}

#[cfg(test)]
mod tests;
