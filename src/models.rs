//! Data models for message extraction and charting
//!
//! This module contains the row types that move through the pipeline: raw
//! rows from the message store, enriched records written to the interchange
//! file, and the loaded table the charts read.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dates::WeekBuckets;
use crate::error::{Result, TxtStatsError};

/// The two message-store handles a conversation is extracted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlePair {
    /// First participant handle
    pub first: i64,
    /// Second participant handle
    pub second: i64,
}

/// One row as read from the message store, before cleaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Message body; `None` when the stored value is not text
    pub text: Option<String>,
    /// True if the local user sent the message
    pub is_from_me: bool,
    /// Raw store timestamp (nanoseconds since 2001-01-01 UTC)
    pub date: i64,
    /// Handle the row was matched on
    pub handle_id: i64,
}

/// Which side of the conversation a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    /// The counterpart (`is_from_me` = 0)
    Receiver,
    /// The local user (`is_from_me` = 1)
    Sender,
}

impl Party {
    /// Both parties, receiver first
    pub const BOTH: [Self; 2] = [Self::Receiver, Self::Sender];

    /// Party for a sender flag
    #[must_use]
    pub const fn from_flag(is_from_me: bool) -> Self {
        if is_from_me {
            Self::Sender
        } else {
            Self::Receiver
        }
    }

    /// Human-readable label used in legends
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Receiver => "Receiver",
            Self::Sender => "Sender",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One enriched message: a row of the interchange CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Dense zero-based row number
    #[serde(alias = "")]
    pub index: usize,
    /// Message body
    pub text: String,
    /// True if the local user sent the message
    #[serde(with = "flag")]
    pub is_from_me: bool,
    /// Calendar send time
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    /// Week bucket index
    pub week: u32,
    /// Weekday, Monday = 0
    pub day: u8,
    /// Hour of day, 0-23
    pub hourly_bin: u8,
    /// Character count of `text`
    pub text_length: usize,
    /// Whitespace-delimited token count of `text`
    pub num_words: usize,
}

impl MessageRecord {
    /// Side of the conversation this message came from
    #[must_use]
    pub const fn party(&self) -> Party {
        Party::from_flag(self.is_from_me)
    }
}

/// Loaded, non-empty message table shared read-only by every chart
#[derive(Debug, Clone)]
pub struct MessageTable {
    records: Vec<MessageRecord>,
    buckets: WeekBuckets,
}

impl MessageTable {
    /// Wrap `records`, failing if there are none
    pub fn new(records: Vec<MessageRecord>) -> Result<Self> {
        let buckets = WeekBuckets::from_dates(records.iter().map(|r| r.date))
            .ok_or_else(|| TxtStatsError::EmptyDataset("message table".to_string()))?;
        Ok(Self { records, buckets })
    }

    /// Every record, in file order
    #[must_use]
    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// Row count
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sent by `party`
    pub fn by_party(&self, party: Party) -> impl Iterator<Item = &MessageRecord> + '_ {
        self.records.iter().filter(move |r| r.party() == party)
    }

    /// Number of records sent by `party`
    #[must_use]
    pub fn count(&self, party: Party) -> usize {
        self.by_party(party).count()
    }

    /// Weekly buckets recomputed from the date column
    #[must_use]
    pub const fn week_buckets(&self) -> WeekBuckets {
        self.buckets
    }
}

/// Serializes the sender flag as `0`/`1`
mod flag {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            "1" | "1.0" | "true" | "True" => Ok(true),
            "0" | "0.0" | "false" | "False" => Ok(false),
            other => Err(D::Error::custom(format!("invalid is_from_me value: {other}"))),
        }
    }
}

/// Serializes send times as `%Y-%m-%d %H:%M:%S`
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub(super) fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT).map_err(D::Error::custom)
    }
}
