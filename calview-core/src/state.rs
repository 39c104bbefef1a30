//! Calendar state: the event list plus the current selection.
//!
//! All mutation goes through the transition methods below; each one is applied
//! as a single step and leaves the state consistent.

use chrono::NaiveDate;

use crate::error::{CalviewError, CalviewResult};
use crate::event::Event;

#[derive(Debug, Clone)]
pub struct CalendarState {
    events: Vec<Event>,
    selected_date: NaiveDate,
    selected_event: Option<String>,
}

impl CalendarState {
    pub fn new(selected_date: NaiveDate) -> Self {
        CalendarState {
            events: Vec::new(),
            selected_date,
            selected_event: None,
        }
    }

    /// Build a state from already validated events, rejecting repeated ids.
    pub fn with_events(
        events: impl IntoIterator<Item = Event>,
        selected_date: NaiveDate,
    ) -> CalviewResult<Self> {
        let mut state = Self::new(selected_date);
        for event in events {
            state.create(event)?;
        }
        Ok(state)
    }

    /// Events in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn create(&mut self, event: Event) -> CalviewResult<()> {
        if self.find(&event.id).is_some() {
            return Err(CalviewError::DuplicateEventId(event.id));
        }

        tracing::debug!(id = %event.id, title = %event.title, "create event");
        self.events.push(event);
        Ok(())
    }

    /// Replace the event with the same id, keeping its position.
    pub fn update(&mut self, event: Event) -> CalviewResult<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| CalviewError::EventNotFound(event.id.clone()))?;

        tracing::debug!(id = %event.id, title = %event.title, "update event");
        *slot = event;
        Ok(())
    }

    /// Remove an event. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Event> {
        let index = self.events.iter().position(|e| e.id == id)?;
        let removed = self.events.remove(index);

        if self.selected_event.as_deref() == Some(id) {
            self.selected_event = None;
        }

        tracing::debug!(id, "delete event");
        Some(removed)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Select an event by id, or clear the selection with `None`.
    pub fn select_event(&mut self, id: Option<&str>) -> CalviewResult<()> {
        if let Some(id) = id
            && self.find(id).is_none()
        {
            return Err(CalviewError::EventNotFound(id.to_string()));
        }

        self.selected_event = id.map(String::from);
        Ok(())
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.selected_event.as_deref().and_then(|id| self.find(id))
    }

    /// Events occurring on `date`, ordered by start time of day.
    ///
    /// Ties keep insertion order.
    pub fn events_on(&self, date: NaiveDate) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.occurs_on(date)).collect();
        events.sort_by_key(|e| e.start_time.time());
        events
    }

    /// Events occurring on the selected date.
    pub fn selected_day_events(&self) -> Vec<&Event> {
        self.events_on(self.selected_date)
    }
}
