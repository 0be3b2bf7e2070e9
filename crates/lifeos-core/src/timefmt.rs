//! Wire and display formats for dates and times.
//!
//! The backend emits times of day as `HH:MM:SS` and accepts `HH:MM`; timestamps
//! may arrive with or without a UTC offset. The serde modules below accept
//! every variant and always emit the short form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `09:00` -> `9:00 AM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

pub fn format_time_range(start: NaiveTime, end: NaiveTime) -> String {
    format!("{} - {}", format_time(start), format_time(end))
}

/// `Jan 6-12, 2025` within a month, `Jan 27 - Feb 2, 2025` across months.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    let start_month = start.format("%b").to_string();
    let end_month = end.format("%b").to_string();
    let year = end.format("%Y");
    if start_month == end_month {
        format!("{} {}-{}, {}", start_month, start.format("%-d"), end.format("%-d"), year)
    } else {
        format!(
            "{} {} - {} {}, {}",
            start_month,
            start.format("%-d"),
            end_month,
            end.format("%-d"),
            year
        )
    }
}

pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time of day: {}", raw)))
    }
}

pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

pub mod timestamp_opt {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => super::parse_timestamp(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
        }
    }
}
