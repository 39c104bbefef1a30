//! Month view model: the grid of visible dates and what falls on each.

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::error::{CalviewError, CalviewResult};
use crate::event::Event;
use crate::state::CalendarState;

/// Rows in the grid. Six weeks always cover a full month.
pub const GRID_WEEKS: usize = 6;

/// The dates shown for one month, padded with days of adjacent months
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    first_of_month: NaiveDate,
    first_visible: NaiveDate,
}

/// One square of the grid
#[derive(Debug, Clone)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for leading/trailing days of adjacent months
    pub in_month: bool,
    pub is_selected: bool,
    pub is_today: bool,
    pub events: Vec<&'a Event>,
}

/// Per-month totals for the year view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSummary {
    pub month: u32,
    /// Distinct events with at least one occurrence in the month
    pub event_count: usize,
}

/// Events for one day, as shown in the side list
#[derive(Debug, Clone)]
pub struct DayAgenda<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32, week_start: Weekday) -> CalviewResult<Self> {
        let first_of_month =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| CalviewError::InvalidTimestamp {
                field: "month",
                value: format!("{year}-{month:02}"),
            })?;
        Ok(Self::starting(first_of_month, week_start))
    }

    /// The grid for the month containing `date`.
    pub fn containing(date: NaiveDate, week_start: Weekday) -> Self {
        Self::starting(date.with_day(1).unwrap_or(date), week_start)
    }

    fn starting(first_of_month: NaiveDate, week_start: Weekday) -> Self {
        let lead = (first_of_month.weekday().num_days_from_sunday() + 7
            - week_start.num_days_from_sunday())
            % 7;
        MonthGrid {
            first_of_month,
            first_visible: first_of_month - chrono::Duration::days(i64::from(lead)),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_of_month.year()
    }

    pub fn month(&self) -> u32 {
        self.first_of_month.month()
    }

    /// "March 2024"
    pub fn title(&self) -> String {
        self.first_of_month.format("%B %Y").to_string()
    }

    /// Weekdays in column order
    pub fn weekdays(&self) -> [Weekday; 7] {
        let mut day = self.first_visible.weekday();
        std::array::from_fn(|_| {
            let current = day;
            day = day.succ();
            current
        })
    }

    /// All visible dates, row by row
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_visible.iter_days().take(GRID_WEEKS * 7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn previous(&self) -> Self {
        let first = self
            .first_of_month
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.first_of_month);
        Self::starting(first, self.first_visible.weekday())
    }

    pub fn next(&self) -> Self {
        let first = self
            .first_of_month
            .checked_add_months(Months::new(1))
            .unwrap_or(self.first_of_month);
        Self::starting(first, self.first_visible.weekday())
    }

    /// Cells for every visible date, with the events occurring on each.
    pub fn cells<'a>(&self, state: &'a CalendarState, today: NaiveDate) -> Vec<DayCell<'a>> {
        self.dates()
            .map(|date| DayCell {
                date,
                in_month: self.contains(date),
                is_selected: date == state.selected_date(),
                is_today: date == today,
                events: state.events_on(date),
            })
            .collect()
    }
}

impl<'a> DayAgenda<'a> {
    pub fn for_date(state: &'a CalendarState, date: NaiveDate) -> Self {
        DayAgenda {
            date,
            events: state.events_on(date),
        }
    }

    pub fn for_selected(state: &'a CalendarState) -> Self {
        Self::for_date(state, state.selected_date())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Event counts for each month of `year`.
pub fn month_summaries(state: &CalendarState, year: i32) -> Vec<MonthSummary> {
    (1..=12)
        .filter_map(|month| {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let event_count = state
                .events()
                .iter()
                .filter(|event| occurs_in_month(event, first))
                .count();
            Some(MonthSummary { month, event_count })
        })
        .collect()
}

fn occurs_in_month(event: &Event, first: NaiveDate) -> bool {
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .any(|d| event.occurs_on(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::recurrence::RecurrenceRule;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_on(id: &str, day: NaiveDate) -> Event {
        let start = day.and_hms_opt(10, 0, 0).unwrap();
        Event::with_id(id, id, start, start + chrono::Duration::hours(1), EventType::Webinar).unwrap()
    }

    #[rstest]
    #[case(2024, 3, Weekday::Sun, date(2024, 2, 25))]
    #[case(2024, 3, Weekday::Mon, date(2024, 2, 26))]
    #[case(2024, 9, Weekday::Sun, date(2024, 9, 1))]
    #[case(2024, 4, Weekday::Mon, date(2024, 4, 1))]
    fn grid_starts_on_week_start(
        #[case] year: i32,
        #[case] month: u32,
        #[case] week_start: Weekday,
        #[case] first: NaiveDate,
    ) {
        let grid = MonthGrid::new(year, month, week_start).unwrap();
        let dates: Vec<NaiveDate> = grid.dates().collect();

        assert_eq!(dates.len(), 42);
        assert_eq!(dates[0], first);
        assert_eq!(dates[0].weekday(), week_start);
        assert_eq!(grid.weekdays()[0], week_start);
    }

    #[rstest]
    #[case(2024, 2)]
    #[case(2026, 8)]
    #[case(2023, 12)]
    fn grid_covers_every_day_of_month(#[case] year: i32, #[case] month: u32) {
        let grid = MonthGrid::new(year, month, Weekday::Sun).unwrap();
        let in_month = grid.dates().filter(|d| grid.contains(*d)).count();
        let days = date(year, month, 1)
            .iter_days()
            .take_while(|d| d.month() == month)
            .count();
        assert_eq!(in_month, days);
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(MonthGrid::new(2024, 13, Weekday::Sun).is_err());
    }

    #[test]
    fn navigation_wraps_years() {
        let grid = MonthGrid::new(2024, 1, Weekday::Mon).unwrap();
        let previous = grid.previous();
        assert_eq!((previous.year(), previous.month()), (2023, 12));
        assert_eq!(previous.weekdays()[0], Weekday::Mon);
        assert_eq!(grid.next().next().title(), "March 2024");
        assert_eq!(MonthGrid::containing(date(2024, 3, 19), Weekday::Sun), MonthGrid::new(2024, 3, Weekday::Sun).unwrap());
    }

    #[test]
    fn cells_carry_occurrences_and_flags() {
        let weekly = event_on("weekly", date(2024, 3, 1)).with_recurrence(RecurrenceRule::weekly(1).unwrap());
        let mut state = CalendarState::with_events([weekly], date(2024, 3, 15)).unwrap();
        state.create(event_on("once", date(2024, 3, 15))).unwrap();

        let grid = MonthGrid::new(2024, 3, Weekday::Sun).unwrap();
        let cells = grid.cells(&state, date(2024, 3, 20));

        let fridays: Vec<u32> = cells
            .iter()
            .filter(|c| c.events.iter().any(|e| e.id == "weekly"))
            .map(|c| c.date.day())
            .collect();
        assert_eq!(fridays, vec![1, 8, 15, 22, 29, 5]);

        let selected: Vec<&DayCell> = cells.iter().filter(|c| c.is_selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].events.len(), 2);
        assert!(cells.iter().any(|c| c.is_today && c.date == date(2024, 3, 20)));
        assert!(!cells[0].in_month);
    }

    #[test]
    fn summaries_count_distinct_events_per_month() {
        let monthly = event_on("monthly", date(2024, 1, 31)).with_recurrence(RecurrenceRule::monthly(1).unwrap());
        let state = CalendarState::with_events(
            [monthly, event_on("once", date(2024, 3, 5))],
            date(2024, 1, 1),
        )
        .unwrap();

        let counts: Vec<usize> = month_summaries(&state, 2024).iter().map(|s| s.event_count).collect();
        // The 31st-anchored event skips February, April, June, September and November.
        assert_eq!(counts, vec![1, 0, 2, 0, 1, 0, 1, 1, 0, 1, 0, 1]);
    }

    #[test]
    fn agenda_for_selected_date() {
        let state = CalendarState::with_events([event_on("a", date(2024, 3, 5))], date(2024, 3, 5)).unwrap();
        let agenda = DayAgenda::for_selected(&state);
        assert_eq!(agenda.date, date(2024, 3, 5));
        assert!(!agenda.is_empty());
        assert!(DayAgenda::for_date(&state, date(2024, 3, 6)).is_empty());
    }
}
