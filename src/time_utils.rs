// SPDX-License-Identifier: MIT

//! Civil-date helpers for the fixed deployment timezone.
//!
//! All day boundaries (history keys, the day counter, the Sunday rest-day
//! rule) are computed in one fixed offset, UTC+05:30. Timezone
//! configurability is out of scope; the offset is a deploy-time constant.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};

/// Fixed civil offset east of UTC, in seconds (+05:30).
const CIVIL_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The fixed civil timezone offset.
pub fn civil_offset() -> FixedOffset {
    FixedOffset::east_opt(CIVIL_OFFSET_SECS).expect("offset in range")
}

/// Current instant in the fixed civil offset.
///
/// Handlers call this once per request and pass the result down; engine
/// code never reads the system clock itself.
pub fn civil_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&civil_offset())
}

/// Format a civil instant as the `YYYY-MM-DD` history key.
pub fn date_key(now: DateTime<FixedOffset>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// English weekday name ("Monday" .. "Sunday") for a civil instant.
pub fn weekday_name(now: DateTime<FixedOffset>) -> String {
    now.format("%A").to_string()
}

/// Whether a civil instant falls on the Sunday rest day.
pub fn is_sunday(now: DateTime<FixedOffset>) -> bool {
    now.weekday() == Weekday::Sun
}

/// Whole calendar days elapsed from `start` to `now` in the civil offset.
pub fn days_since(start: NaiveDate, now: DateTime<FixedOffset>) -> i64 {
    (now.date_naive() - start).num_days()
}
