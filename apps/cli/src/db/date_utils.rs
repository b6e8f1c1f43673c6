//! Date utilities for stored timestamps and the daily reminder.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};

/// Local hour of the daily reading reminder.
pub const REMINDER_HOUR: u32 = 4;
/// Local minute of the daily reading reminder.
pub const REMINDER_MINUTE: u32 = 5;

/// Format a timestamp for storage.
pub fn to_db_string(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First occurrence of `hour:minute` local time strictly after `now`.
///
/// Today's slot is used if it is still ahead, otherwise tomorrow's. Local
/// times skipped by a DST change fall through to the next day.
pub fn next_daily_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Tz>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let tz = now.timezone();
    let today = now.date_naive();

    (0..3)
        .map(|offset| today + Duration::days(offset))
        .filter_map(|date| tz.from_local_datetime(&date.and_time(time)).earliest())
        .find(|candidate| candidate > now)
}

/// Next daily reminder from the current local time.
pub fn next_reminder() -> Option<DateTime<Local>> {
    next_daily_after(&Local::now(), REMINDER_HOUR, REMINDER_MINUTE)
}
