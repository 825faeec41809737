/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! ISO 8601 rendering and parsing of timestamps.
//!
//! Every timestamp leaves the API in UTC with second precision and an explicit
//! `+00:00` offset, e.g. `2025-02-01T14:00:00+00:00`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::Serializer;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Formats a timestamp as UTC ISO 8601 without fractional seconds.
pub fn isoformat(dt: &DateTime<Utc>) -> String {
    dt.format(ISO_FORMAT).to_string()
}

/// Like [`isoformat`] but passes `None` through.
pub fn isoformat_opt(dt: Option<&DateTime<Utc>>) -> Option<String> {
    dt.map(isoformat)
}

/// Parses an ISO 8601 timestamp.
///
/// Accepts RFC 3339 input with any offset (`Z`, `+02:00`), and naive values
/// without an offset, which are taken as UTC.
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// serde `serialize_with` helper for `DateTime<Utc>` fields.
pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&isoformat(dt))
}

/// serde `serialize_with` helpers for `Option<DateTime<Utc>>` fields.
pub mod option {
    use super::isoformat;
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => s.serialize_str(&isoformat(dt)),
            None => s.serialize_none(),
        }
    }
}
