//! Cleaning and enrichment of raw conversation rows.

use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::dates::{apple_timestamp_to_utc, DisplayZone, WeekBuckets};
use crate::error::{Result, TxtStatsError};
use crate::logging::OperationTimer;
use crate::models::{HandlePair, MessageRecord, RawMessage};
use crate::repository::MessageRepository;

/// Enriched records plus what it took to produce them
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Dense, date-ordered records
    pub records: Vec<MessageRecord>,
    /// Rows dropped because their body was not text
    pub dropped: usize,
    /// Buckets the `week` column was computed against
    pub buckets: WeekBuckets,
}

/// Fetch and enrich the conversation between `handles`.
///
/// The two handles are read as one conversation, so the run fails only when
/// neither matches a message. A handle that matches nothing on its own is
/// logged as a warning, since a counterpart's phone number and email often
/// appear as separate handles and one of them may be unused.
pub fn extract_messages<R: MessageRepository>(
    repo: &R,
    handles: &HandlePair,
    zone: DisplayZone,
) -> Result<Extraction> {
    let timer = OperationTimer::new("fetch_messages");
    let raw = repo.fetch_messages(handles)?;
    timer.finish();

    if raw.is_empty() {
        return Err(TxtStatsError::NoMessages {
            first: handles.first,
            second: handles.second,
        });
    }

    for handle in unmatched_handles(&raw, handles) {
        warn!(handle, "Handle matched no messages");
    }

    build_records(raw, zone)?.ok_or(TxtStatsError::NoMessages {
        first: handles.first,
        second: handles.second,
    })
}

/// Handles in `handles` that no fetched row belongs to
#[must_use]
pub fn unmatched_handles(raw: &[RawMessage], handles: &HandlePair) -> Vec<i64> {
    let mut candidates = vec![handles.first];
    if handles.second != handles.first {
        candidates.push(handles.second);
    }
    candidates.retain(|handle| raw.iter().all(|message| message.handle_id != *handle));
    candidates
}

/// Drop non-text rows, reindex, and derive every synthetic column.
///
/// Returns `None` when no row has a text body.
pub fn build_records(raw: Vec<RawMessage>, zone: DisplayZone) -> Result<Option<Extraction>> {
    let total = raw.len();

    let mut kept = Vec::with_capacity(total);
    for message in raw {
        if let Some(text) = message.text {
            let date = zone.to_naive(apple_timestamp_to_utc(message.date)?);
            kept.push((text, message.is_from_me, date));
        }
    }
    let dropped = total - kept.len();
    if dropped > 0 {
        debug!(dropped, "Skipped messages without a text body");
    }

    // Stable, so equal timestamps keep store order
    kept.sort_by_key(|(_, _, date)| *date);

    let Some(buckets) = WeekBuckets::from_dates(kept.iter().map(|(_, _, date)| *date)) else {
        return Ok(None);
    };

    let records: Vec<MessageRecord> = kept
        .into_iter()
        .enumerate()
        .map(|(index, (text, is_from_me, date))| derive_record(index, text, is_from_me, date, &buckets))
        .collect();

    info!(
        kept = records.len(),
        dropped,
        periods = buckets.periods(),
        "Enriched conversation"
    );

    Ok(Some(Extraction {
        records,
        dropped,
        buckets,
    }))
}

/// Build one record with all derived columns
#[must_use]
pub fn derive_record(
    index: usize,
    text: String,
    is_from_me: bool,
    date: NaiveDateTime,
    buckets: &WeekBuckets,
) -> MessageRecord {
    MessageRecord {
        index,
        week: buckets.bucket_of(date),
        day: date.weekday().num_days_from_monday() as u8,
        hourly_bin: date.hour() as u8,
        text_length: text_length(&text),
        num_words: count_words(&text),
        text,
        is_from_me,
        date,
    }
}

/// Character count
#[must_use]
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

/// Whitespace-delimited token count
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::APPLE_EPOCH_OFFSET;

    fn raw(text: Option<&str>, is_from_me: bool, unix: i64) -> RawMessage {
        RawMessage {
            text: text.map(ToString::to_string),
            is_from_me,
            date: (unix - APPLE_EPOCH_OFFSET) * 1_000_000_000,
            handle_id: 3,
        }
    }

    #[test]
    fn test_unmatched_handles() {
        let rows = vec![raw(Some("hi"), false, 1_609_750_800), raw(Some("yo"), true, 1_609_754_400)];

        assert_eq!(unmatched_handles(&rows, &HandlePair { first: 3, second: 4 }), vec![4]);
        assert_eq!(unmatched_handles(&rows, &HandlePair { first: 8, second: 3 }), vec![8]);
        assert!(unmatched_handles(&rows, &HandlePair { first: 3, second: 3 }).is_empty());
        assert_eq!(unmatched_handles(&[], &HandlePair { first: 1, second: 2 }), vec![1, 2]);
    }

    #[test]
    fn test_derived_lengths() {
        assert_eq!(text_length("Hi there friend"), 15);
        assert_eq!(count_words("Hi there friend"), 3);
        assert_eq!(count_words("  spaced\tout \n words "), 3);
        assert_eq!(text_length("héllo"), 5);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_non_text_rows_dropped_and_reindexed() {
        let rows = vec![
            raw(Some("first"), false, 1_609_750_800),
            raw(None, true, 1_609_754_400),
            raw(Some("third"), true, 1_609_758_000),
        ];
        let extraction = build_records(rows, DisplayZone::Utc)
            .expect("valid timestamps")
            .expect("text rows present");

        assert_eq!(extraction.dropped, 1);
        assert_eq!(extraction.records.len(), 2);
        let indices: Vec<_> = extraction.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(extraction.records[1].text, "third");
    }

    #[test]
    fn test_calendar_columns() {
        // 2021-01-04 09:00:00 UTC, a Monday
        let rows = vec![
            raw(Some("Hi there friend"), true, 1_609_750_800),
            // 2021-01-10 23:30:00 UTC, a Sunday
            raw(Some("later"), false, 1_610_321_400),
        ];
        let extraction = build_records(rows, DisplayZone::Utc)
            .expect("valid timestamps")
            .expect("text rows present");

        let first = &extraction.records[0];
        assert_eq!(first.day, 0);
        assert_eq!(first.hourly_bin, 9);
        assert_eq!(first.week, 0);
        assert_eq!(first.num_words, 3);

        let second = &extraction.records[1];
        assert_eq!(second.day, 6);
        assert_eq!(second.hourly_bin, 23);
        assert_eq!(second.week, 0);
    }

    #[test]
    fn test_only_attachments_yields_nothing() {
        let rows = vec![raw(None, true, 1_609_750_800), raw(None, false, 1_609_754_400)];
        let extraction = build_records(rows, DisplayZone::Utc).expect("valid timestamps");
        assert!(extraction.is_none());
    }
}
