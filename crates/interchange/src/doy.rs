//! Day-of-year timestamps.
//!
//! Every time in a TOL document is written as `YYYY-DDDTHH:MM:SS.mmm` in
//! UTC, where `DDD` is the ordinal day within the year. Milliseconds are
//! optional on input and always rendered on output.

use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// Errors produced when a string is not a valid DOY timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DoyParseError {
    #[error("empty timestamp")]
    Empty,
    #[error("'{input}' is not a DOY timestamp (expected YYYY-DDDTHH:MM:SS[.mmm]): {reason}")]
    Malformed { input: String, reason: String },
}

/// A UTC instant rendered in DOY form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoyTime(OffsetDateTime);

impl DoyTime {
    /// Parse `YYYY-DDDTHH:MM:SS` with an optional `.mmm` fraction.
    ///
    /// The fraction must be exactly three digits, the precision rendered
    /// back by `Display`.
    pub fn parse(input: &str) -> Result<Self, DoyParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DoyParseError::Empty);
        }

        let parsed = if input.contains('.') {
            PrimitiveDateTime::parse(
                input,
                format_description!(
                    "[year]-[ordinal]T[hour]:[minute]:[second].[subsecond digits:3]"
                ),
            )
        } else {
            PrimitiveDateTime::parse(
                input,
                format_description!("[year]-[ordinal]T[hour]:[minute]:[second]"),
            )
        };

        parsed
            .map(|dt| DoyTime(dt.assume_utc()))
            .map_err(|e| DoyParseError::Malformed {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Seconds since the Unix epoch, milliseconds in the fraction.
    ///
    /// This is the scalar the timeline renderer positions bars with.
    pub fn unix_seconds_f64(&self) -> f64 {
        self.0.unix_timestamp_nanos() as f64 / 1_000_000_000.0
    }

    /// Year and ordinal day, e.g. `(2022, 167)`.
    pub fn year_ordinal(&self) -> (i32, u16) {
        (self.0.year(), self.0.ordinal())
    }
}

impl fmt::Display for DoyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .0
            .format(format_description!(
                "[year]-[ordinal]T[hour]:[minute]:[second].[subsecond digits:3]"
            ))
            .map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl FromStr for DoyTime {
    type Err = DoyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DoyTime::parse(s)
    }
}

impl Sub for DoyTime {
    type Output = Duration;

    fn sub(self, rhs: DoyTime) -> Duration {
        self.0 - rhs.0
    }
}

impl Serialize for DoyTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DoyTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DoyTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}
