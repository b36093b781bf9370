// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WAPI request authentication.
//!
//! WAPI does not use sessions. Every request carries
//! `sha1(login + sha1(password) + HH)` where `HH` is the current hour on the
//! WEDOS servers, which run on Prague time.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of `input`.
#[must_use]
pub fn sha1_hex(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

/// Build the `auth` field for a request sent at `now`.
///
/// `password_hash` is the already hashed password (see [`sha1_hex`]).
#[must_use]
pub fn auth_token(username: &str, password_hash: &str, now: DateTime<Utc>) -> String {
    let hour = prague_hour(now);
    sha1_hex(&format!("{username}{password_hash}{hour:02}"))
}

/// Hour of day (0-23) in Europe/Prague at `now`.
///
/// Prague follows the EU rule: CEST (UTC+2) from the last Sunday of March
/// 01:00 UTC until the last Sunday of October 01:00 UTC, CET (UTC+1) otherwise.
#[must_use]
pub fn prague_hour(now: DateTime<Utc>) -> u32 {
    let year = now.year();
    let summer_start = eu_transition(year, 3);
    let summer_end = eu_transition(year, 10);

    let offset = if now >= summer_start && now < summer_end {
        Duration::hours(2)
    } else {
        Duration::hours(1)
    };

    (now + offset).hour()
}

/// 01:00 UTC on the last Sunday of `month`.
fn eu_transition(year: i32, month: u32) -> DateTime<Utc> {
    // Both March and October have 31 days.
    let mut day = NaiveDate::from_ymd_opt(year, month, 31).unwrap_or_default();
    while day.weekday() != Weekday::Sun {
        day = day.pred_opt().unwrap_or_default();
    }
    Utc.from_utc_datetime(&day.and_hms_opt(1, 0, 0).unwrap_or_default())
}
