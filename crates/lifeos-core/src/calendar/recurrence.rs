//! Weekly recurrence rules for calendar events.
//!
//! The backend materializes one event per matching ISO weekday between the
//! event date and the recurrence end date. [`WeeklyRule::occurrences`] runs
//! the same expansion locally through an RFC 5545 rule so the CLI can preview
//! a series before creating it.

use chrono::{Datelike, NaiveDate, Weekday};
use rrule::RRuleSet;
use serde::Deserialize;

use crate::error::CoreError;

/// Hard ceiling on one expansion, the most `RRuleSet::all` accepts.
const MAX_OCCURRENCES: u16 = u16::MAX;

/// ISO weekday number, 1 = Monday through 7 = Sunday.
pub fn iso_number(day: Weekday) -> u32 {
    day.number_from_monday()
}

pub fn weekday_from_iso(number: u32) -> Option<Weekday> {
    match number {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Sorted, de-duplicated ISO numbers for the wire.
pub fn iso_days(days: &[Weekday]) -> Vec<u32> {
    let mut numbers: Vec<u32> = days.iter().copied().map(iso_number).collect();
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}

/// Parse `mon,wed,fri`, `monday tuesday` or ISO numbers `1,3,5`.
pub fn parse_days(input: &str) -> Result<Vec<Weekday>, CoreError> {
    let mut days = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let day = match token.parse::<u32>() {
            Ok(number) => weekday_from_iso(number),
            Err(_) => token.parse::<Weekday>().ok(),
        }
        .ok_or_else(|| CoreError::InvalidInput(format!("Invalid day of week: {}", token)))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days.sort_by_key(|d| d.num_days_from_monday());
    Ok(days)
}

#[derive(Deserialize)]
struct StoredPattern {
    #[serde(default)]
    days_of_week: Vec<u32>,
}

/// Weekdays encoded in a stored `recurrence_pattern`, if it names any.
///
/// The backend stores the literal `"weekly"` for series it created, which
/// carries no days; callers fall back to the event's own weekday.
pub fn days_from_pattern(pattern: Option<&str>) -> Option<Vec<Weekday>> {
    let stored: StoredPattern = serde_json::from_str(pattern?).ok()?;
    let days: Vec<Weekday> = stored
        .days_of_week
        .into_iter()
        .filter_map(weekday_from_iso)
        .collect();
    (!days.is_empty()).then_some(days)
}

fn rrule_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Expanded dates of a [`WeeklyRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrences {
    pub dates: Vec<NaiveDate>,
    /// The expansion stopped at its limit before reaching `until`
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRule {
    days: Vec<Weekday>,
    start: NaiveDate,
    until: NaiveDate,
}

impl WeeklyRule {
    pub fn new(days: Vec<Weekday>, start: NaiveDate, until: NaiveDate) -> Result<Self, CoreError> {
        if days.is_empty() {
            return Err(CoreError::InvalidInput("Select at least one day".to_string()));
        }
        // a single remaining occurrence has `until == start`
        if until < start {
            return Err(CoreError::InvalidInput(
                "End date must not be before event date".to_string(),
            ));
        }
        Ok(Self { days, start, until })
    }

    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// The rule as an RFC 5545 `DTSTART` + `RRULE` pair.
    pub fn to_rrule(&self) -> String {
        let byday = self
            .days
            .iter()
            .copied()
            .map(rrule_code)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "DTSTART:{}T000000Z\nRRULE:FREQ=WEEKLY;WKST=MO;BYDAY={};UNTIL={}T235959Z",
            self.start.format("%Y%m%d"),
            byday,
            self.until.format("%Y%m%d"),
        )
    }

    /// At most one occurrence per day, plus one so a complete expansion
    /// never fills the limit.
    fn limit(&self) -> u16 {
        let span = (self.until - self.start).num_days().saturating_add(2);
        u16::try_from(span).unwrap_or(MAX_OCCURRENCES)
    }

    /// Dates the backend will create, `start..=until` on matching weekdays.
    pub fn occurrences(&self) -> Result<Occurrences, CoreError> {
        let rule = self.to_rrule();
        let set = rule
            .parse::<RRuleSet>()
            .map_err(|e| CoreError::InvalidInput(format!("Failed to parse rule '{}': {}", rule, e)))?;
        let limit = self.limit();
        let (expanded, limited) = set.all(limit);
        let truncated = limited || expanded.len() >= usize::from(limit);
        let dates = expanded
            .into_iter()
            .map(|dt| dt.date_naive())
            .filter(|date| {
                *date >= self.start && *date <= self.until && self.days.contains(&date.weekday())
            })
            .collect();
        Ok(Occurrences { dates, truncated })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[rstest]
    #[case("mon,wed,fri", vec![Weekday::Mon, Weekday::Wed, Weekday::Fri])]
    #[case("friday monday", vec![Weekday::Mon, Weekday::Fri])]
    #[case("1,3,5", vec![Weekday::Mon, Weekday::Wed, Weekday::Fri])]
    #[case("7", vec![Weekday::Sun])]
    #[case("tue,tue", vec![Weekday::Tue])]
    fn parses_day_lists(#[case] input: &str, #[case] expected: Vec<Weekday>) {
        assert_eq!(parse_days(input).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_days() {
        assert!(parse_days("mon,funday").is_err());
        assert!(parse_days("0").is_err());
        assert!(parse_days("8").is_err());
    }

    #[test]
    fn sunday_is_seven_on_the_wire() {
        assert_eq!(iso_days(&[Weekday::Sun, Weekday::Mon, Weekday::Sun]), vec![1, 7]);
    }

    #[test]
    fn reads_days_from_stored_pattern() {
        assert_eq!(
            days_from_pattern(Some(r#"{"days_of_week":[1,3]}"#)),
            Some(vec![Weekday::Mon, Weekday::Wed])
        );
        assert_eq!(days_from_pattern(Some("weekly")), None);
        assert_eq!(days_from_pattern(None), None);
    }

    #[test]
    fn expands_like_the_backend() {
        // 2025-01-06 is a Monday
        let rule = WeeklyRule::new(
            vec![Weekday::Mon, Weekday::Wed],
            date("2025-01-06"),
            date("2025-01-15"),
        )
        .unwrap();
        assert_eq!(
            rule.occurrences().unwrap(),
            Occurrences {
                dates: vec![
                    date("2025-01-06"),
                    date("2025-01-08"),
                    date("2025-01-13"),
                    date("2025-01-15"),
                ],
                truncated: false,
            }
        );
    }

    #[test]
    fn start_date_is_skipped_when_weekday_does_not_match() {
        // starts on a Tuesday, repeats on Mondays
        let rule =
            WeeklyRule::new(vec![Weekday::Mon], date("2025-01-07"), date("2025-01-20")).unwrap();
        assert_eq!(
            rule.occurrences().unwrap().dates,
            vec![date("2025-01-13"), date("2025-01-20")]
        );
    }

    #[test]
    fn rule_requires_days_and_no_earlier_end() {
        assert!(WeeklyRule::new(vec![], date("2025-01-06"), date("2025-02-06")).is_err());
        assert!(
            WeeklyRule::new(vec![Weekday::Mon], date("2025-01-06"), date("2025-01-05")).is_err()
        );
    }

    #[test]
    fn last_occurrence_expands_to_itself() {
        // 2025-03-03 is a Monday
        let rule =
            WeeklyRule::new(vec![Weekday::Mon], date("2025-03-03"), date("2025-03-03")).unwrap();
        let occurrences = rule.occurrences().unwrap();
        assert_eq!(occurrences.dates, vec![date("2025-03-03")]);
        assert!(!occurrences.truncated);
    }

    #[test]
    fn long_daily_series_is_complete() {
        let every_day = parse_days("1,2,3,4,5,6,7").unwrap();
        let rule = WeeklyRule::new(every_day, date("2025-01-01"), date("2026-12-31")).unwrap();
        let occurrences = rule.occurrences().unwrap();
        assert_eq!(occurrences.dates.len(), 730);
        assert_eq!(occurrences.dates.last(), Some(&date("2026-12-31")));
        assert!(!occurrences.truncated);
    }

    #[test]
    fn expansion_past_the_ceiling_is_flagged() {
        let every_day = parse_days("1,2,3,4,5,6,7").unwrap();
        let rule = WeeklyRule::new(every_day, date("2000-01-01"), date("2200-01-01")).unwrap();
        let occurrences = rule.occurrences().unwrap();
        assert!(occurrences.truncated);
        assert_eq!(occurrences.dates.len(), usize::from(u16::MAX));
    }
}
