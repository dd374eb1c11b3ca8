//! Export field selection.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Wall-clock format for local times.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which optional fields to write, and where local times are rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// Timezone for local-time columns.
    pub timezone: Tz,
    pub include_longitude: bool,
    pub include_latitude: bool,
    /// Station name from the table.
    pub include_description: bool,
    /// Calendar reminder at each event's start.
    pub include_alerts: bool,
    /// Creation stamp for calendar entries.
    pub generated_at: DateTime<Utc>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            include_longitude: true,
            include_latitude: false,
            include_description: false,
            include_alerts: true,
            generated_at: Utc::now(),
        }
    }
}

impl ExportOptions {
    /// Format an instant as local wall-clock time.
    pub fn local_time(&self, utc: DateTime<Utc>) -> String {
        utc.with_timezone(&self.timezone)
            .format(LOCAL_TIME_FORMAT)
            .to_string()
    }
}
