pub mod config;
pub mod day;
pub mod delete;
pub mod edit;
pub mod month;
pub mod new;
pub mod occurs;
pub mod year;

use anyhow::{Context as _, Result, anyhow};
use calview_core::draft::EventDraft;
use calview_core::event::Event;
use calview_core::ingest::{parse_date, parse_timestamp};
use calview_core::{CalendarState, EventType, Frequency};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Weekday};
use clap::Args;

/// Event fields shared by `new` and `edit`. Unset flags leave the field unchanged.
#[derive(Args, Default)]
pub struct EventArgs {
    #[arg(short, long)]
    pub title: Option<String>,

    /// Start date/time (e.g. "2025-03-20T15:00" or "2025-03-20 15:00")
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date/time
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Length of the event (e.g. "30m", "1h 30m")
    #[arg(short, long)]
    pub duration: Option<String>,

    /// appointment or webinar
    #[arg(long = "type")]
    pub kind: Option<EventType>,

    /// none, daily, weekly, monthly or yearly
    #[arg(long)]
    pub repeat: Option<Frequency>,

    /// Repeat every N days/weeks/months/years
    #[arg(long)]
    pub interval: Option<i64>,

    /// Weekdays for weekly events (e.g. "mon,wed")
    #[arg(long, value_delimiter = ',')]
    pub on: Option<Vec<String>>,

    /// Last date an occurrence may fall on (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    #[arg(long)]
    pub client_name: Option<String>,

    #[arg(long)]
    pub client_url: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

impl EventArgs {
    /// Write every set flag into `draft`.
    ///
    /// Moving the start keeps the current duration unless an end or duration is also given.
    pub fn apply(&self, draft: &mut EventDraft, offset: FixedOffset) -> Result<()> {
        if let Some(title) = &self.title {
            draft.title = title.clone();
        }

        if let Some(start) = &self.start {
            let duration = draft.end_time - draft.start_time;
            draft.start_time = parse_timestamp("startTime", start, offset)?;
            draft.end_time = draft.start_time + duration;
        }

        if let Some(end) = &self.end {
            draft.end_time = parse_timestamp("endTime", end, offset)?;
        } else if let Some(duration) = &self.duration {
            draft.end_time = draft.start_time + parse_duration(duration)?;
        }

        if let Some(kind) = self.kind {
            draft.kind = kind;
        }

        if let Some(frequency) = self.repeat {
            draft.recurrence.frequency = frequency;
        }
        if let Some(interval) = self.interval {
            draft.recurrence.interval = interval;
        }
        if let Some(days) = &self.on {
            draft.recurrence.days_of_week = days
                .iter()
                .map(|d| parse_weekday_index(d))
                .collect::<Result<_>>()?;
        }
        if let Some(until) = &self.until {
            draft.recurrence.end_date = Some(parse_date("recurrence.endDate", until, offset)?);
        }

        if let Some(name) = &self.client_name {
            draft.client_name = name.clone();
        }
        if let Some(url) = &self.client_url {
            draft.client_profile_url = url.clone();
        }
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }

        Ok(())
    }
}

/// Parse a duration such as "90m" or "1h 30m".
pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// Parse a weekday name ("mon", "Monday") into its 0=Sunday..6=Saturday index.
pub fn parse_weekday_index(input: &str) -> Result<i64> {
    let weekday: Weekday = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("Unknown weekday \"{}\"", input))?;
    Ok(i64::from(weekday.num_days_from_sunday()))
}

/// Parse a YYYY-MM-DD argument, or fall back to `default`.
pub fn parse_date_arg(input: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date format '{}'. Expected YYYY-MM-DD", s)),
        None => Ok(default),
    }
}

/// Parse a YYYY-MM argument into (year, month).
pub fn parse_month_arg(input: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month format '{}'. Expected YYYY-MM", input))?;
    Ok((first.year(), first.month()))
}

/// Parse a start/end argument the same way events files are read.
pub fn parse_datetime_arg(input: &str, offset: FixedOffset) -> Result<NaiveDateTime> {
    Ok(parse_timestamp("startTime", input, offset)?)
}

/// Look up an event, listing the known ids when it is missing.
pub fn find_event<'a>(state: &'a CalendarState, id: &str) -> Result<&'a Event> {
    state.find(id).ok_or_else(|| {
        let available: Vec<String> = state
            .events()
            .iter()
            .map(|e| format!("{} ({})", e.id, e.title))
            .collect();
        anyhow!(
            "Event '{}' not found. Available:\n  {}",
            id,
            available.join("\n  ")
        )
    })
}

/// Print an event as pretty JSON on stdout.
pub fn print_json(event: &Event) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rstest::rstest;

    fn gmt8() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft::for_date(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            Duration::hours(1),
        )
    }

    #[rstest]
    #[case("sun", 0)]
    #[case("Mon", 1)]
    #[case("wednesday", 3)]
    #[case(" sat ", 6)]
    fn weekday_names_map_to_sunday_based_indices(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_weekday_index(input).unwrap(), expected);
    }

    #[test]
    fn unknown_weekday_is_an_error() {
        assert!(parse_weekday_index("someday").is_err());
    }

    #[test]
    fn month_argument() {
        assert_eq!(parse_month_arg("2024-03").unwrap(), (2024, 3));
        assert!(parse_month_arg("2024-13").is_err());
        assert!(parse_month_arg("March").is_err());
    }

    #[test]
    fn moving_start_keeps_duration() {
        let mut draft = draft();
        let args = EventArgs {
            start: Some("2024-03-05 14:00".to_string()),
            ..Default::default()
        };
        args.apply(&mut draft, gmt8()).unwrap();

        assert_eq!(draft.start_time.to_string(), "2024-03-05 14:00:00");
        assert_eq!(draft.end_time.to_string(), "2024-03-05 15:00:00");
    }

    #[test]
    fn applies_duration_and_recurrence_flags() {
        let mut draft = draft();
        let args = EventArgs {
            duration: Some("1h 30m".to_string()),
            kind: Some(EventType::Webinar),
            repeat: Some(Frequency::Weekly),
            interval: Some(2),
            on: Some(vec!["mon".to_string(), "wed".to_string()]),
            until: Some("2024-06-01".to_string()),
            ..Default::default()
        };
        args.apply(&mut draft, gmt8()).unwrap();

        assert_eq!(draft.end_time - draft.start_time, Duration::minutes(90));
        assert_eq!(draft.kind, EventType::Webinar);
        assert_eq!(draft.recurrence.frequency, Frequency::Weekly);
        assert_eq!(draft.recurrence.interval, 2);
        assert_eq!(draft.recurrence.days_of_week, vec![1, 3]);
        assert_eq!(draft.recurrence.end_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn malformed_start_is_rejected() {
        let mut draft = draft();
        let args = EventArgs {
            start: Some("next tuesday".to_string()),
            ..Default::default()
        };
        let err = args.apply(&mut draft, gmt8()).unwrap_err();
        assert!(err.to_string().contains("startTime"));
    }
}
