//! Local wall-clock input.

use anyhow::{Result, anyhow, bail};
use chrono::offset::LocalResult;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

const INPUT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("unknown timezone: {name} (expected an IANA name such as Europe/London)"))
}

/// Interpret `s` as wall-clock time in `tz` and convert to UTC.
///
/// In a fall-back overlap the earlier instant is used. Times inside a
/// spring-forward gap do not exist and are rejected.
pub fn parse_local(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = INPUT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s.trim(), f).ok())
        .ok_or_else(|| anyhow!("invalid date-time: {s} (expected YYYY-MM-DD HH:MM[:SS])"))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Ok(t.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => bail!("{s} does not exist in {tz} (daylight saving gap)"),
    }
}
