//! Loaded configuration and calendar state shared by the commands.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use calview_core::config::CalviewConfig;
use calview_core::{CalendarState, ingest, seed};
use chrono::{FixedOffset, NaiveDate, Utc};
use owo_colors::OwoColorize;

pub struct Context {
    pub config: CalviewConfig,
    pub offset: FixedOffset,
    pub today: NaiveDate,
    pub state: CalendarState,
    /// Events file the state was loaded from; `None` for sample events
    pub source: Option<PathBuf>,
    /// Records in the events file that failed to load
    pub skipped: usize,
}

impl Context {
    /// Load the user's config and events for today.
    pub fn load(events_file: Option<&Path>) -> Result<Self> {
        let config = CalviewConfig::load()?;
        let offset = config.display_offset()?;
        let today = Utc::now().with_timezone(&offset).date_naive();

        let ctx = Self::from_config(config, events_file, today)?;

        if let Some(path) = &ctx.source
            && ctx.skipped > 0
        {
            eprintln!(
                "{}",
                format!(
                    "Skipped {} invalid {} in {}",
                    ctx.skipped,
                    pluralize("event", ctx.skipped),
                    path.display()
                )
                .yellow()
            );
        }

        Ok(ctx)
    }

    /// Build the context from an already loaded config.
    ///
    /// `events_file` overrides the configured file; with neither, sample
    /// events on `today` are used.
    pub fn from_config(
        config: CalviewConfig,
        events_file: Option<&Path>,
        today: NaiveDate,
    ) -> Result<Self> {
        let offset = config.display_offset()?;
        let path = events_file.map(Path::to_path_buf).or_else(|| config.events_path());

        let (events, skipped) = match &path {
            Some(path) => {
                let ingested = ingest::load_events_file(path, offset)
                    .with_context(|| format!("Could not load events from {}", path.display()))?;
                (ingested.events, ingested.rejected.len())
            }
            None => {
                tracing::debug!("no events file configured, using sample events");
                (seed::sample_events(today)?, 0)
            }
        };

        let state = CalendarState::with_events(events, today)?;

        Ok(Context {
            config,
            offset,
            today,
            state,
            source: path,
            skipped,
        })
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
