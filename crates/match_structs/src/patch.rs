//! Game-patch calendar.
//!
//! Collection windows never reach before the running patch, and persisted
//! state is partitioned per patch version, so the engine needs to know
//! which patch is live and when it started.

use chrono::{FixedOffset, NaiveDate, NaiveTime, Utc};

/// Patch versions and their release dates, oldest first.
///
/// Patches go live at 06:00 local time; timestamps below add a 30 minute
/// grace period.
const PATCH_DATES: &[(&str, &str)] = &[
    ("12.2", "2022-01-20"),
    ("12.3", "2022-02-02"),
    ("12.4", "2022-02-16"),
    ("12.5", "2022-03-02"),
    ("12.6", "2022-03-30"),
    ("12.7", "2022-04-13"),
    ("12.8", "2022-04-27"),
    ("12.9", "2022-05-11"),
    ("12.10", "2022-05-25"),
    ("12.11", "2022-06-08"),
    ("12.12", "2022-06-23"),
    ("12.13", "2022-07-13"),
    ("12.14", "2022-07-27"),
    ("12.15", "2022-08-10"),
    ("12.16", "2022-08-24"),
    ("12.17", "2022-09-08"),
    ("12.18", "2022-09-21"),
    ("12.19", "2022-10-05"),
    ("12.20", "2022-10-19"),
    ("12.21", "2022-11-02"),
    ("12.22", "2022-11-16"),
    ("12.23", "2022-12-07"),
];

/// Unix timestamp at which a calendar date's patch goes live, in the given
/// timezone offset.
fn patch_timestamp(date: &str, offset_hours: f64) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::from_hms_opt(6, 30, 0)?;
    let offset = FixedOffset::east_opt((offset_hours * 3600.0) as i32)?;
    date.and_time(time)
        .and_local_timezone(offset)
        .single()
        .map(|dt| dt.timestamp())
}

/// The latest patch whose start time has passed, or `None` before the
/// first known patch.
#[must_use]
pub fn current_version(offset_hours: f64) -> Option<&'static str> {
    current_version_at(Utc::now().timestamp(), offset_hours)
}

fn current_version_at(now: i64, offset_hours: f64) -> Option<&'static str> {
    let mut current = None;
    for (version, date) in PATCH_DATES {
        match patch_timestamp(date, offset_hours) {
            Some(start) if now > start => current = Some(*version),
            _ => {}
        }
    }
    current
}

/// Unix timestamp at which the given patch went live, or `None` for an
/// unknown version.
#[must_use]
pub fn patch_start_timestamp(version: &str, offset_hours: f64) -> Option<i64> {
    PATCH_DATES
        .iter()
        .find(|(v, _)| *v == version)
        .and_then(|(_, date)| patch_timestamp(date, offset_hours))
}

/// Start timestamp of the patch currently live.
#[must_use]
pub fn current_patch_start_timestamp(offset_hours: f64) -> Option<i64> {
    patch_start_timestamp(current_version(offset_hours)?, offset_hours)
}
