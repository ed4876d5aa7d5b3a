//! Calendar helpers shared by both stages: store timestamp conversion and
//! weekly bucketing.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{Result, TxtStatsError};

/// Seconds between the Unix epoch and 2001-01-01 00:00:00 UTC
pub const APPLE_EPOCH_OFFSET: i64 = 978_307_200;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Stores written before macOS 10.13 count whole seconds instead of
/// nanoseconds. Any nanosecond value after mid-2001 is above this.
const LEGACY_SECONDS_LIMIT: i64 = 100_000_000_000;

/// Clock used to express send times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// Coordinated universal time
    #[default]
    Utc,
    /// The machine's local time zone
    Local,
}

impl FromStr for DisplayZone {
    type Err = TxtStatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(TxtStatsError::InvalidConfig(format!(
                "Invalid timezone: {other}. Must be one of: [\"utc\", \"local\"]"
            ))),
        }
    }
}

impl DisplayZone {
    /// Express a UTC instant as a naive wall-clock time in this zone
    #[must_use]
    pub fn to_naive(self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Utc => instant.naive_utc(),
            Self::Local => Local.from_utc_datetime(&instant.naive_utc()).naive_local(),
        }
    }
}

/// Convert a raw `message.date` value into a UTC instant.
///
/// Sub-second precision is truncated.
pub fn apple_timestamp_to_utc(raw: i64) -> Result<DateTime<Utc>> {
    let seconds = if raw.abs() < LEGACY_SECONDS_LIMIT {
        raw
    } else {
        raw / NANOS_PER_SECOND
    };

    seconds
        .checked_add(APPLE_EPOCH_OFFSET)
        .and_then(|unix| DateTime::from_timestamp(unix, 0))
        .ok_or_else(|| TxtStatsError::InvalidDate(format!("message timestamp out of range: {raw}")))
}

/// Monday-anchored weekly buckets spanning a conversation.
///
/// Bucket `i` covers `[anchor + 7i days, anchor + 7(i+1) days)`, where the
/// anchor is the Monday on or before the first message's day. Both stages
/// derive this from the first and last send time only, so the renderer can
/// rebuild the extractor's buckets from the date column alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBuckets {
    anchor: NaiveDate,
    periods: usize,
}

impl WeekBuckets {
    /// Buckets for a conversation running from `first` to `last`
    #[must_use]
    pub fn from_range(first: NaiveDateTime, last: NaiveDateTime) -> Self {
        let span_days = (last - first).num_days().max(0);
        let periods = usize::try_from(span_days / 7).unwrap_or(usize::MAX - 2) + 2;

        let first_day = first.date();
        let back = i64::from(first_day.weekday().num_days_from_monday());
        let anchor = first_day - Duration::days(back);

        Self { anchor, periods }
    }

    /// Buckets spanning every date yielded, or `None` for no dates
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDateTime>,
    {
        let mut dates = dates.into_iter();
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self::from_range(min, max))
    }

    /// Number of buckets (`NUM_PERIODS`)
    #[must_use]
    pub const fn periods(&self) -> usize {
        self.periods
    }

    /// Monday that opens bucket 0
    #[must_use]
    pub const fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Bucket containing `date`
    #[must_use]
    pub fn bucket_of(&self, date: NaiveDateTime) -> u32 {
        let days = (date.date() - self.anchor).num_days().max(0);
        u32::try_from(days / 7).unwrap_or(u32::MAX)
    }

    /// First day of bucket `index`
    #[must_use]
    pub fn bucket_start(&self, index: usize) -> NaiveDate {
        self.anchor + Duration::weeks(index as i64)
    }

    /// Start date of every bucket, in order
    pub fn starts(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.periods).map(|i| self.bucket_start(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test date")
    }

    #[test]
    fn test_nanosecond_timestamp_conversion() {
        // 2021-01-03 14:22:01 UTC
        let unix = 1_609_683_721_i64;
        let raw = (unix - APPLE_EPOCH_OFFSET) * NANOS_PER_SECOND + 999_999_999;
        let converted = apple_timestamp_to_utc(raw).expect("in range");
        assert_eq!(converted.naive_utc(), at("2021-01-03 14:22:01"));
    }

    #[test]
    fn test_legacy_second_timestamp_conversion() {
        let converted = apple_timestamp_to_utc(0).expect("in range");
        assert_eq!(converted.naive_utc(), at("2001-01-01 00:00:00"));

        let converted = apple_timestamp_to_utc(3_600).expect("in range");
        assert_eq!(converted.naive_utc().hour(), 1);
    }

    #[test]
    fn test_display_zone_parse() {
        assert_eq!("UTC".parse::<DisplayZone>().ok(), Some(DisplayZone::Utc));
        assert_eq!("local".parse::<DisplayZone>().ok(), Some(DisplayZone::Local));
        assert!("pst".parse::<DisplayZone>().is_err());
    }

    #[test]
    fn test_eight_day_span_has_three_periods() {
        let buckets = WeekBuckets::from_dates([
            at("2021-01-04 09:00:00"),
            at("2021-01-08 12:00:00"),
            at("2021-01-12 09:00:00"),
        ])
        .expect("non-empty");
        assert_eq!(buckets.periods(), 3);
    }

    #[test]
    fn test_anchor_is_monday_on_or_before_first_day() {
        // Sunday
        let buckets = WeekBuckets::from_range(at("2021-01-03 23:59:59"), at("2021-01-05 00:00:00"));
        assert_eq!(buckets.anchor(), NaiveDate::from_ymd_opt(2020, 12, 28).expect("valid"));
        assert_eq!(buckets.anchor().weekday(), Weekday::Mon);

        // Monday anchors to itself
        let buckets = WeekBuckets::from_range(at("2021-01-04 00:00:00"), at("2021-01-05 00:00:00"));
        assert_eq!(buckets.anchor(), NaiveDate::from_ymd_opt(2021, 1, 4).expect("valid"));
    }

    #[test]
    fn test_bucket_edges_are_half_open() {
        let buckets = WeekBuckets::from_range(at("2021-01-04 10:00:00"), at("2021-01-20 10:00:00"));
        assert_eq!(buckets.bucket_of(at("2021-01-04 00:00:00")), 0);
        assert_eq!(buckets.bucket_of(at("2021-01-10 23:59:59")), 0);
        assert_eq!(buckets.bucket_of(at("2021-01-11 00:00:00")), 1);
        assert_eq!(buckets.bucket_of(at("2021-01-20 10:00:00")), 2);
    }

    #[test]
    fn test_last_message_always_has_a_bucket() {
        // Sunday start, Saturday finish: the anchor moves back six days
        let first = at("2021-01-03 08:00:00");
        let last = at("2021-01-16 23:00:00");
        let buckets = WeekBuckets::from_range(first, last);
        assert!((buckets.bucket_of(last) as usize) < buckets.periods());
    }

    #[test]
    fn test_bucket_starts_step_by_week() {
        let buckets = WeekBuckets::from_range(at("2021-01-06 10:00:00"), at("2021-01-20 10:00:00"));
        let starts: Vec<_> = buckets.starts().collect();
        assert_eq!(starts.len(), buckets.periods());
        assert_eq!(starts[0], NaiveDate::from_ymd_opt(2021, 1, 4).expect("valid"));
        assert_eq!(starts[1], NaiveDate::from_ymd_opt(2021, 1, 11).expect("valid"));
    }

    #[test]
    fn test_no_dates_no_buckets() {
        assert!(WeekBuckets::from_dates(Vec::new()).is_none());
    }
}
