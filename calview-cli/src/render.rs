//! Terminal rendering for calview types.
//!
//! Appointments are drawn in yellow and webinars in blue, matching the
//! orange/blue pairing of the calendar tiles.

use calview_core::EventType;
use calview_core::event::Event;
use calview_core::month::{DayAgenda, DayCell, MonthGrid, MonthSummary};
use chrono::Month;
use owo_colors::OwoColorize;

use crate::context::pluralize;

/// Width of one day column in the month grid, including the separating space
const CELL_WIDTH: usize = 14;

/// Event titles shown per day before collapsing into "+N more"
const TITLES_PER_CELL: usize = 2;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventType {
    fn render(&self) -> String {
        colorize(*self, &self.to_string())
    }
}

fn colorize(kind: EventType, text: &str) -> String {
    match kind {
        EventType::Appointment => text.yellow().to_string(),
        EventType::Webinar => text.blue().to_string(),
    }
}

/// Pad or truncate `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{}{}", text, " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let truncated: String = text.chars().take(width - 1).collect();
        format!("{}…", truncated)
    }
}

/// One event as a list entry: title, time range and client.
pub fn render_event(event: &Event, offset_label: &str) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "  {} {}",
        colorize(event.kind, "▌"),
        colorize(event.kind, &event.title).bold()
    ));
    lines.push(format!(
        "    {} - {} {}",
        event.start_time.format("%H:%M"),
        event.end_time.format("%H:%M"),
        offset_label.dimmed()
    ));

    if let Some(client) = &event.client_info {
        match &client.profile_url {
            Some(url) => lines.push(format!("    {} {}", client.name.underline(), url.dimmed())),
            None => lines.push(format!("    {}", client.name.underline())),
        }
    }

    if let Some(rule) = event.recurrence.as_ref().filter(|r| r.repeats()) {
        lines.push(format!("    {}", format!("↻ {}", rule.describe(event.start_date())).dimmed()));
    }

    if let Some(description) = &event.description {
        lines.push(format!("    {}", description.italic()));
    }

    lines.join("\n")
}

/// The side list for one day.
pub fn render_agenda(agenda: &DayAgenda, offset_label: &str) -> String {
    let mut lines = vec![
        "Upcoming Events".bold().to_string(),
        agenda.date.format("%-d %b").to_string().dimmed().to_string(),
        String::new(),
    ];

    if agenda.is_empty() {
        lines.push(format!("  {}", "No upcoming events".dimmed()));
    } else {
        let entries: Vec<String> = agenda
            .events
            .iter()
            .map(|event| render_event(event, offset_label))
            .collect();
        lines.push(entries.join("\n\n"));
    }

    lines.join("\n")
}

/// The large calendar: a header row of weekdays and six rows of day cells.
pub fn render_month(grid: &MonthGrid, cells: &[DayCell]) -> String {
    let mut lines = vec![format!("{}", grid.title().bold()), String::new()];

    let header: String = grid
        .weekdays()
        .iter()
        .map(|d| fit(&d.to_string(), CELL_WIDTH))
        .collect();
    lines.push(header.dimmed().to_string());

    for week in cells.chunks(7) {
        let mut rows = vec![String::new(); TITLES_PER_CELL + 2];

        for cell in week {
            rows[0].push_str(&render_day_number(cell));

            for (i, row) in rows.iter_mut().enumerate().skip(1) {
                let slot = i - 1;
                let text = if slot < TITLES_PER_CELL {
                    cell.events.get(slot).map(|event| {
                        colorize(event.kind, &fit(&format!(" {}", event.title), CELL_WIDTH - 1))
                    })
                } else if cell.events.len() > TITLES_PER_CELL {
                    let more = format!(" +{} more", cell.events.len() - TITLES_PER_CELL);
                    Some(fit(&more, CELL_WIDTH - 1).dimmed().to_string())
                } else {
                    None
                };

                row.push_str(&text.unwrap_or_else(|| " ".repeat(CELL_WIDTH - 1)));
                row.push(' ');
            }
        }

        lines.extend(rows.into_iter().map(|row| row.trim_end().to_string()));
    }

    lines.join("\n")
}

fn render_day_number(cell: &DayCell) -> String {
    let label = fit(&format!("{:>2}", cell.date.format("%-d")), CELL_WIDTH);

    if cell.is_selected {
        let (number, rest) = label.split_at(2);
        format!("{}{}", number.reversed().bold(), rest)
    } else if !cell.in_month {
        label.dimmed().to_string()
    } else if cell.is_today {
        label.underline().to_string()
    } else {
        label
    }
}

/// The small calendar's year view: one line per month with its event count.
pub fn render_year(year: i32, summaries: &[MonthSummary]) -> String {
    let mut lines = vec![format!("{}", year.to_string().bold()), String::new()];

    for summary in summaries {
        let name = u8::try_from(summary.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name()[..3].to_string())
            .unwrap_or_default();

        let line = if summary.event_count == 0 {
            format!("  {}", name.dimmed())
        } else {
            format!(
                "  {}  {}",
                name.bold(),
                format!("{} {}", summary.event_count, pluralize("event", summary.event_count)).cyan()
            )
        };
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calview_core::CalendarState;
    use calview_core::event::Event;
    use chrono::{Duration, NaiveDate, Weekday};
    use rstest::rstest;

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                chars.by_ref().find(|c| *c == 'm');
            } else {
                out.push(c);
            }
        }
        out
    }

    #[rstest]
    #[case("abc", 5, "abc  ")]
    #[case("abcdef", 4, "abc…")]
    #[case("abcd", 4, "abcd")]
    #[case("abc", 0, "")]
    fn fit_pads_and_truncates(#[case] text: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(fit(text, width), expected);
    }

    #[test]
    fn month_has_header_and_six_weeks() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let start = day.and_hms_opt(10, 0, 0).unwrap();
        let events = (0..3).map(|i| {
            Event::with_id(format!("e{i}"), format!("Event {i}"), start, start + Duration::hours(1), EventType::Webinar)
                .unwrap()
        });
        let state = CalendarState::with_events(events, day).unwrap();
        let grid = MonthGrid::containing(day, Weekday::Sun);

        let rendered = strip_ansi(&render_month(&grid, &grid.cells(&state, day)));
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines[0], "March 2024");
        assert!(lines[2].starts_with("Sun"));
        // Title, blank line, weekday header, then four lines per week.
        assert_eq!(lines.len(), 3 + 6 * (TITLES_PER_CELL + 2));
        assert!(rendered.contains("+1 more"));
    }

    #[test]
    fn empty_agenda_says_so() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let state = CalendarState::new(day);
        let rendered = strip_ansi(&render_agenda(&DayAgenda::for_selected(&state), "GMT+8"));

        assert!(rendered.starts_with("Upcoming Events\n15 Mar"));
        assert!(rendered.contains("No upcoming events"));
    }

    #[test]
    fn year_lists_counts() {
        let summaries = [
            MonthSummary { month: 1, event_count: 0 },
            MonthSummary { month: 2, event_count: 1 },
            MonthSummary { month: 3, event_count: 4 },
        ];
        let rendered = strip_ansi(&render_year(2024, &summaries));

        assert!(rendered.contains("  Jan\n"));
        assert!(rendered.contains("Feb  1 event\n"));
        assert!(rendered.ends_with("Mar  4 events"));
    }
}
