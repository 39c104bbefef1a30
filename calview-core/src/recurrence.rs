//! Recurrence rules and occurrence matching.
//!
//! A rule is always evaluated relative to an anchor date (the event's start
//! date). The anchor itself always matches; every other date matches only when
//! it lies on or after the anchor, on or before the rule's end date, and the
//! elapsed days/weeks/months/years are a multiple of the interval.
//!
//! Monthly and yearly rules skip periods in which the anchor's day does not
//! exist: a rule anchored on Jan 31 produces nothing in February, and a rule
//! anchored on Feb 29 only produces occurrences in leap years.

use std::fmt;
use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{CalviewError, CalviewResult};
use crate::event::Event;

/// How often a rule repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// Any type this version does not know about. Never matches past the anchor.
    #[serde(other)]
    Unknown,
}

/// Describes how an event repeats from its anchor date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub frequency: Frequency,
    pub interval: NonZeroU32,
    /// Last date (inclusive) on which an occurrence may fall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Weekdays for weekly rules; empty means the anchor's weekday
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_weekday_indices"
    )]
    pub days_of_week: Vec<Weekday>,
}

/// Decide whether `event` occurs on `date`.
///
/// Only the calendar day matters; time of day is ignored.
pub fn occurs_on(event: &Event, date: NaiveDate) -> bool {
    let anchor = event.start_date();
    if date == anchor {
        return true;
    }

    match &event.recurrence {
        Some(rule) => rule.matches(anchor, date),
        None => false,
    }
}

impl RecurrenceRule {
    /// Build a rule, rejecting intervals below 1.
    pub fn new(frequency: Frequency, interval: i64) -> CalviewResult<Self> {
        let interval = u32::try_from(interval)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CalviewError::InvalidInterval(interval))?;

        Ok(RecurrenceRule {
            frequency,
            interval,
            end_date: None,
            days_of_week: Vec::new(),
        })
    }

    /// Build a rule from raw field values as they arrive from a form or a file.
    pub fn from_parts(
        frequency: Frequency,
        interval: i64,
        end_date: Option<NaiveDate>,
        days_of_week: &[i64],
    ) -> CalviewResult<Self> {
        let days = days_of_week
            .iter()
            .map(|&index| weekday_from_index(index))
            .collect::<CalviewResult<Vec<_>>>()?;

        let mut rule = Self::new(frequency, interval)?.on_days(days);
        rule.end_date = end_date;
        Ok(rule)
    }

    pub fn daily(interval: i64) -> CalviewResult<Self> {
        Self::new(Frequency::Daily, interval)
    }

    pub fn weekly(interval: i64) -> CalviewResult<Self> {
        Self::new(Frequency::Weekly, interval)
    }

    pub fn monthly(interval: i64) -> CalviewResult<Self> {
        Self::new(Frequency::Monthly, interval)
    }

    pub fn yearly(interval: i64) -> CalviewResult<Self> {
        Self::new(Frequency::Yearly, interval)
    }

    /// Stop generating occurrences after `end_date`.
    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Restrict a weekly rule to the given weekdays (sorted Sunday first, deduplicated).
    pub fn on_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut days: Vec<Weekday> = days.into_iter().collect();
        days.sort_by_key(|d| d.num_days_from_sunday());
        days.dedup();
        self.days_of_week = days;
        self
    }

    /// Whether the rule can produce occurrences beyond the anchor.
    pub fn repeats(&self) -> bool {
        !matches!(self.frequency, Frequency::None | Frequency::Unknown)
    }

    /// Whether the rule, anchored on `anchor`, produces an occurrence on `date`.
    pub fn matches(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if date == anchor {
            return true;
        }
        if date < anchor {
            return false;
        }
        if self.end_date.is_some_and(|end| date > end) {
            return false;
        }

        let interval = i64::from(self.interval.get());
        let days = (date - anchor).num_days();

        match self.frequency {
            Frequency::Daily => days % interval == 0,
            Frequency::Weekly => (days / 7) % interval == 0 && self.weekday_matches(anchor, date),
            Frequency::Monthly => {
                date.day() == anchor.day() && months_between(anchor, date) % interval == 0
            }
            Frequency::Yearly => {
                date.month() == anchor.month()
                    && date.day() == anchor.day()
                    && i64::from(date.year() - anchor.year()) % interval == 0
            }
            Frequency::None | Frequency::Unknown => false,
        }
    }

    /// All dates in `[from, to]` on which the rule, anchored on `anchor`, produces an occurrence.
    pub fn occurrences_between(&self, anchor: NaiveDate, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let start = from.max(anchor);
        let end = match self.end_date {
            // The anchor still counts when the end date precedes it.
            Some(end_date) if self.repeats() => to.min(end_date.max(anchor)),
            _ if self.repeats() => to,
            _ => to.min(anchor),
        };

        if start > end {
            return Vec::new();
        }

        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.matches(anchor, *d))
            .collect()
    }

    /// Human-readable summary, e.g. "every 2 weeks on Mon, Wed until 2024-06-01".
    pub fn describe(&self, anchor: NaiveDate) -> String {
        let n = self.interval.get();
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
            Frequency::None | Frequency::Unknown => return "does not repeat".to_string(),
        };

        let mut text = if n == 1 {
            format!("every {}", unit)
        } else {
            format!("every {} {}s", n, unit)
        };

        match self.frequency {
            Frequency::Weekly => {
                let days = if self.days_of_week.is_empty() {
                    vec![anchor.weekday()]
                } else {
                    self.days_of_week.clone()
                };
                let names: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                text.push_str(&format!(" on {}", names.join(", ")));
            }
            Frequency::Monthly => text.push_str(&format!(" on day {}", anchor.day())),
            Frequency::Yearly => text.push_str(&format!(" on {}", anchor.format("%b %-d"))),
            _ => {}
        }

        if let Some(end) = self.end_date {
            text.push_str(&format!(" until {}", end.format("%Y-%m-%d")));
        }

        text
    }

    fn weekday_matches(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        if self.days_of_week.is_empty() {
            date.weekday() == anchor.weekday()
        } else {
            self.days_of_week.contains(&date.weekday())
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::None => "none",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Frequency::None),
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!(
                "Unknown recurrence '{}'. Expected none, daily, weekly, monthly or yearly",
                other
            )),
        }
    }
}

/// Full calendar months from `from` to `to` (ignoring the day of month).
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}

/// Map a 0=Sunday..6=Saturday index to a weekday.
pub fn weekday_from_index(index: i64) -> CalviewResult<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(CalviewError::InvalidWeekday(other)),
    }
}

fn serialize_weekday_indices<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(days.iter().map(|d| d.num_days_from_sunday()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::from(u32::MAX) + 1)]
    fn rejects_invalid_interval(#[case] interval: i64) {
        assert!(matches!(
            RecurrenceRule::daily(interval),
            Err(CalviewError::InvalidInterval(i)) if i == interval
        ));
    }

    #[rstest]
    #[case(-1)]
    #[case(7)]
    fn rejects_out_of_range_weekday(#[case] index: i64) {
        let result = RecurrenceRule::from_parts(Frequency::Weekly, 1, None, &[1, index]);
        assert!(matches!(result, Err(CalviewError::InvalidWeekday(i)) if i == index));
    }

    #[test]
    fn weekday_indices_start_on_sunday() {
        assert_eq!(weekday_from_index(0).unwrap(), Weekday::Sun);
        assert_eq!(weekday_from_index(3).unwrap(), Weekday::Wed);
        assert_eq!(weekday_from_index(6).unwrap(), Weekday::Sat);
    }

    #[rstest]
    #[case(date(2024, 3, 1), true)]
    #[case(date(2024, 3, 4), true)]
    #[case(date(2024, 3, 2), false)]
    #[case(date(2024, 3, 3), false)]
    #[case(date(2024, 2, 27), false)]
    fn daily_every_third_day(#[case] candidate: NaiveDate, #[case] expected: bool) {
        let rule = RecurrenceRule::daily(3).unwrap();
        assert_eq!(rule.matches(date(2024, 3, 1), candidate), expected);
    }

    #[test]
    fn weekly_counts_whole_weeks_from_anchor() {
        // Anchored on a Wednesday, repeating Mondays every other week.
        let rule = RecurrenceRule::weekly(2).unwrap().on_days([Weekday::Mon]);
        let anchor = date(2024, 3, 6);

        assert!(rule.matches(anchor, date(2024, 3, 11))); // 5 days, week 0
        assert!(!rule.matches(anchor, date(2024, 3, 18))); // 12 days, week 1
        assert!(rule.matches(anchor, date(2024, 3, 25))); // 19 days, week 2
    }

    #[test]
    fn monthly_skips_months_without_anchor_day() {
        let rule = RecurrenceRule::monthly(1).unwrap();
        let anchor = date(2024, 1, 31);

        assert!(!rule.matches(anchor, date(2024, 2, 29)));
        assert!(!rule.matches(anchor, date(2024, 2, 28)));
        assert!(rule.matches(anchor, date(2024, 3, 31)));
        assert!(!rule.matches(anchor, date(2024, 4, 30)));
        assert!(rule.matches(anchor, date(2024, 5, 31)));
    }

    #[test]
    fn monthly_interval_crosses_year_boundary() {
        let rule = RecurrenceRule::monthly(5).unwrap();
        let anchor = date(2023, 10, 15);

        assert!(rule.matches(anchor, date(2024, 3, 15)));
        assert!(!rule.matches(anchor, date(2024, 2, 15)));
    }

    #[test]
    fn yearly_leap_day_only_matches_leap_years() {
        let rule = RecurrenceRule::yearly(1).unwrap();
        let anchor = date(2024, 2, 29);

        assert!(!rule.matches(anchor, date(2025, 2, 28)));
        assert!(!rule.matches(anchor, date(2025, 3, 1)));
        assert!(rule.matches(anchor, date(2028, 2, 29)));
    }

    #[test]
    fn end_date_is_inclusive() {
        let rule = RecurrenceRule::daily(1).unwrap().until(date(2024, 3, 10));
        let anchor = date(2024, 3, 1);

        assert!(rule.matches(anchor, date(2024, 3, 10)));
        assert!(!rule.matches(anchor, date(2024, 3, 11)));
    }

    #[rstest]
    #[case(Frequency::None)]
    #[case(Frequency::Unknown)]
    fn non_repeating_frequencies_only_match_anchor(#[case] frequency: Frequency) {
        let rule = RecurrenceRule::new(frequency, 1).unwrap();
        let anchor = date(2024, 3, 1);

        assert!(rule.matches(anchor, anchor));
        assert!(!rule.matches(anchor, date(2024, 3, 2)));
        assert!(!rule.repeats());
    }

    #[test]
    fn unknown_type_deserializes_as_unknown() {
        let frequency: Frequency = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(frequency, Frequency::Unknown);
    }

    #[test]
    fn occurrences_between_lists_matching_dates() {
        let rule = RecurrenceRule::weekly(1)
            .unwrap()
            .on_days([Weekday::Mon, Weekday::Wed])
            .until(date(2024, 3, 13));
        let anchor = date(2024, 3, 4);

        let dates = rule.occurrences_between(anchor, date(2024, 3, 1), date(2024, 3, 31));
        assert_eq!(
            dates,
            vec![date(2024, 3, 4), date(2024, 3, 6), date(2024, 3, 11), date(2024, 3, 13)]
        );
    }

    #[test]
    fn occurrences_between_keeps_anchor_when_end_date_precedes_it() {
        let rule = RecurrenceRule::daily(1).unwrap().until(date(2024, 2, 1));
        let anchor = date(2024, 3, 1);

        let dates = rule.occurrences_between(anchor, date(2024, 1, 1), date(2024, 12, 31));
        assert_eq!(dates, vec![anchor]);
    }

    #[test]
    fn on_days_sorts_and_dedups() {
        let rule = RecurrenceRule::weekly(1)
            .unwrap()
            .on_days([Weekday::Wed, Weekday::Sun, Weekday::Wed]);
        assert_eq!(rule.days_of_week, vec![Weekday::Sun, Weekday::Wed]);
    }

    #[test]
    fn serializes_weekdays_as_sunday_based_indices() {
        let rule = RecurrenceRule::weekly(2)
            .unwrap()
            .on_days([Weekday::Mon, Weekday::Wed])
            .until(date(2024, 6, 1));

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["type"], "weekly");
        assert_eq!(json["interval"], 2);
        assert_eq!(json["daysOfWeek"], serde_json::json!([1, 3]));
        assert_eq!(json["endDate"], "2024-06-01");
    }

    #[rstest]
    #[case(RecurrenceRule::daily(1).unwrap(), "every day")]
    #[case(RecurrenceRule::weekly(2).unwrap().on_days([Weekday::Mon, Weekday::Wed]), "every 2 weeks on Mon, Wed")]
    #[case(RecurrenceRule::weekly(1).unwrap(), "every week on Fri")]
    #[case(RecurrenceRule::monthly(1).unwrap(), "every month on day 1")]
    #[case(RecurrenceRule::yearly(1).unwrap().until(date(2030, 1, 1)), "every year on Mar 1 until 2030-01-01")]
    #[case(RecurrenceRule::new(Frequency::None, 1).unwrap(), "does not repeat")]
    fn describes_rule(#[case] rule: RecurrenceRule, #[case] expected: &str) {
        assert_eq!(rule.describe(date(2024, 3, 1)), expected);
    }
}
