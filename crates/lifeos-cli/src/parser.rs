use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use chrono_english::{parse_date_string, Dialect};
use lifeos_core::timefmt;

const CLOCK_FORMATS: [&str; 2] = ["%I:%M %p", "%I:%M%p"];

/// `2025-01-06`, or anything chrono-english understands ("tomorrow", "next monday").
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if let Some(date) = timefmt::parse_date(input) {
        return Ok(date);
    }
    parse_date_string(input, Local::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// `14:30`, `14:30:00` or `2:30 PM`.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    timefmt::parse_time(input)
        .or_else(|| {
            CLOCK_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(input, fmt).ok())
        })
        .ok_or_else(|| anyhow!("Failed to parse time '{}': expected HH:MM or H:MM AM/PM", input))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
