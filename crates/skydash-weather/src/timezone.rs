//! Coordinate to IANA timezone resolution and timestamp localization.
//!
//! Resolution is offline (static polygon data from `tzf-rs`) and total:
//! anything that does not map to a zone known to `chrono-tz` becomes "UTC".

use std::sync::OnceLock;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::types::Coordinate;

pub const FALLBACK_ZONE: &str = "UTC";

/// Maps a coordinate to an IANA timezone identifier. Never fails.
pub trait TimezoneResolver: Send + Sync {
    fn resolve(&self, coordinate: &Coordinate) -> String;
}

/// Offline lookup backed by a process-wide `tzf-rs` finder.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTimezoneResolver;

impl OfflineTimezoneResolver {
    fn finder() -> &'static DefaultFinder {
        static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
        FINDER.get_or_init(|| {
            tracing::debug!("Loading timezone boundary data");
            DefaultFinder::new()
        })
    }
}

impl TimezoneResolver for OfflineTimezoneResolver {
    fn resolve(&self, coordinate: &Coordinate) -> String {
        let name = Self::finder().get_tz_name(coordinate.longitude(), coordinate.latitude());
        match parse_zone(name) {
            Some(tz) => tz.name().to_string(),
            None => {
                tracing::debug!(
                    "No timezone for ({}, {}), got {:?}; using {}",
                    coordinate.latitude(),
                    coordinate.longitude(),
                    name,
                    FALLBACK_ZONE
                );
                FALLBACK_ZONE.to_string()
            }
        }
    }
}

/// Always answers with the same zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimezone(pub Tz);

impl TimezoneResolver for FixedTimezone {
    fn resolve(&self, _coordinate: &Coordinate) -> String {
        self.0.name().to_string()
    }
}

pub fn parse_zone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    name.parse::<Tz>().ok()
}

pub fn zone_or_utc(name: &str) -> Tz {
    parse_zone(name).unwrap_or(Tz::UTC)
}

/// Parse a provider timestamp into `tz`.
///
/// Accepts RFC 3339 with an offset (converted into `tz`), naive
/// `YYYY-MM-DDTHH:MM[:SS]` wall time and bare `YYYY-MM-DD` dates (local midnight).
pub fn localize_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Tz>, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&tz));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|e| format!("invalid timestamp {:?}: {}", raw, e))?;

    from_wall_time(naive, tz)
}

/// Ambiguous wall times take the earlier instant; times inside a DST gap move
/// forward one hour.
fn from_wall_time(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, String> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(|| format!("{} does not exist in {}", naive, tz.name())),
    }
}
