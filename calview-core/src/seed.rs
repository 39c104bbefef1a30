//! Sample events used when no events file is configured.

use chrono::{NaiveDate, NaiveTime};

use crate::error::CalviewResult;
use crate::event::{ClientInfo, Event, EventType};

struct Sample {
    title: &'static str,
    start_hour: u32,
    kind: EventType,
    client: Option<(&'static str, &'static str)>,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Meeting with John",
        start_hour: 10,
        kind: EventType::Appointment,
        client: Some((
            "John Doe",
            "https://www.gravatar.com/avatar/2c7d99fe281ecd3bcd65ab915bac6dd5?s=250",
        )),
    },
    Sample {
        title: "Webinar",
        start_hour: 13,
        kind: EventType::Webinar,
        client: None,
    },
    Sample {
        title: "Meeting with Jane",
        start_hour: 15,
        kind: EventType::Appointment,
        client: Some(("Jane Doe", "https://i.pravatar.cc/250?u=jane.doe@example.com")),
    },
];

/// One-hour sample events on `today`.
pub fn sample_events(today: NaiveDate) -> CalviewResult<Vec<Event>> {
    SAMPLES
        .iter()
        .map(|sample| {
            let start = today.and_time(NaiveTime::MIN) + chrono::Duration::hours(i64::from(sample.start_hour));
            let event = Event::new(sample.title, start, start + chrono::Duration::hours(1), sample.kind)?;

            Ok(match sample.client {
                Some((name, url)) => event.with_client_info(ClientInfo {
                    name: name.to_string(),
                    avatar: Some(url.to_string()),
                    profile_url: Some(url.to_string()),
                }),
                None => event,
            })
        })
        .collect()
}
