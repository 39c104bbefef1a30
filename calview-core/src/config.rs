//! calview configuration.

use std::path::{Path, PathBuf};

use chrono::{Duration, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalviewError, CalviewResult};

const DEFAULT_OFFSET_HOURS: i32 = 8;
const DEFAULT_DURATION_MINUTES: u32 = 60;

fn default_offset_hours() -> i32 {
    DEFAULT_OFFSET_HOURS
}

fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Configuration at ~/.config/calview/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalviewConfig {
    /// JSON events file to load when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,

    /// Fixed offset (hours east of UTC) events are displayed in
    #[serde(default = "default_offset_hours")]
    pub display_offset_hours: i32,

    #[serde(default)]
    pub week_start: WeekStart,

    /// Length of a new event when no end is given
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
}

/// First column of the month grid
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

impl Default for CalviewConfig {
    fn default() -> Self {
        CalviewConfig {
            events_file: None,
            display_offset_hours: DEFAULT_OFFSET_HOURS,
            week_start: WeekStart::default(),
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl CalviewConfig {
    pub fn config_path() -> CalviewResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalviewError::Config("Could not determine config directory".into()))?
            .join("calview");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from its default location, falling back to defaults if absent.
    pub fn load() -> CalviewResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CalviewResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: CalviewConfig =
            toml::from_str(&content).map_err(|e| CalviewError::Config(e.to_string()))?;
        config.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> CalviewResult<()> {
        if !(-12..=14).contains(&self.display_offset_hours) {
            return Err(CalviewError::Config(format!(
                "display_offset_hours must be between -12 and 14 (got {})",
                self.display_offset_hours
            )));
        }
        if self.default_duration_minutes == 0 {
            return Err(CalviewError::Config(
                "default_duration_minutes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The events file with a leading `~` expanded.
    pub fn events_path(&self) -> Option<PathBuf> {
        self.events_file
            .as_ref()
            .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
    }

    pub fn display_offset(&self) -> CalviewResult<FixedOffset> {
        FixedOffset::east_opt(self.display_offset_hours * 3600).ok_or_else(|| {
            CalviewError::Config(format!(
                "Invalid display offset: {} hours",
                self.display_offset_hours
            ))
        })
    }

    /// Label shown next to event times, e.g. "GMT+8".
    pub fn offset_label(&self) -> String {
        format!("GMT{:+}", self.display_offset_hours)
    }

    pub fn default_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.default_duration_minutes))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalviewResult<()> {
        let contents = format!(
            "\
# calview configuration

# Events file to load (JSON array of events):
# events_file = \"~/calendar/events.json\"

# Hours east of UTC used to display event times:
# display_offset_hours = {}

# First day of the week in the month view (\"sunday\" or \"monday\"):
# week_start = \"sunday\"

# Length of new events in minutes when no end is given:
# default_duration_minutes = {}
",
            DEFAULT_OFFSET_HOURS, DEFAULT_DURATION_MINUTES
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalviewError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalviewError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalviewConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CalviewConfig::default());
        assert_eq!(config.offset_label(), "GMT+8");
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        CalviewConfig::create_default_config(&path).unwrap();

        let config = CalviewConfig::load_from(&path).unwrap();
        assert_eq!(config, CalviewConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "events_file = \"/tmp/events.json\"\ndisplay_offset_hours = -5\nweek_start = \"monday\"\n",
        )
        .unwrap();

        let config = CalviewConfig::load_from(&path).unwrap();
        assert_eq!(config.events_path(), Some(PathBuf::from("/tmp/events.json")));
        assert_eq!(config.week_start.weekday(), Weekday::Mon);
        assert_eq!(config.offset_label(), "GMT-5");
        assert_eq!(config.display_offset().unwrap().local_minus_utc(), -5 * 3600);
        assert_eq!(config.default_duration(), Duration::hours(1));
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "display_offset_hours = 20\n").unwrap();

        assert!(matches!(CalviewConfig::load_from(&path), Err(CalviewError::Config(_))));
    }
}
