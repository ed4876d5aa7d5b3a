//! Invariants of enrichment and the interchange file over generated conversations

use proptest::prelude::*;
use txt_stats::dates::{DisplayZone, WeekBuckets, APPLE_EPOCH_OFFSET};
use txt_stats::extract::build_records;
use txt_stats::file_io::{read_records, write_records};
use txt_stats::models::RawMessage;
use txt_stats::MessageTable;

fn raw_message() -> impl Strategy<Value = RawMessage> {
    (
        proptest::option::weighted(0.8, "[a-zA-Z ,.!?\"]{1,40}"),
        any::<bool>(),
        // 2015 through 2023
        1_420_070_400_i64..1_700_000_000,
        1_i64..=2,
    )
        .prop_map(|(text, is_from_me, unix, handle_id)| RawMessage {
            text,
            is_from_me,
            date: (unix - APPLE_EPOCH_OFFSET) * 1_000_000_000,
            handle_id,
        })
}

proptest! {
    #[test]
    fn enrichment_invariants(raw in prop::collection::vec(raw_message(), 1..60)) {
        let total = raw.len();
        let with_text = raw.iter().filter(|m| m.text.is_some()).count();

        let extraction = build_records(raw, DisplayZone::Utc).expect("timestamps in range");
        let Some(extraction) = extraction else {
            prop_assert_eq!(with_text, 0);
            return Ok(());
        };

        let records = &extraction.records;
        prop_assert_eq!(records.len(), with_text);
        prop_assert_eq!(extraction.dropped, total - with_text);

        for (position, record) in records.iter().enumerate() {
            prop_assert_eq!(record.index, position);
            prop_assert!((record.week as usize) < extraction.buckets.periods());
            prop_assert!(record.day < 7);
            prop_assert!(record.hourly_bin < 24);
            prop_assert_eq!(record.text_length, record.text.chars().count());
        }

        for pair in records.windows(2) {
            prop_assert!(pair[0].date <= pair[1].date);
            prop_assert!(pair[0].week <= pair[1].week);
        }
    }

    #[test]
    fn buckets_rebuilt_from_file(raw in prop::collection::vec(raw_message(), 1..40)) {
        let Some(extraction) = build_records(raw, DisplayZone::Utc).expect("timestamps in range") else {
            return Ok(());
        };

        let mut buffer = Vec::new();
        write_records(&extraction.records, &mut buffer).expect("Failed to write");
        let reloaded = read_records(buffer.as_slice()).expect("Failed to read");
        prop_assert_eq!(&reloaded, &extraction.records);

        let table = MessageTable::new(reloaded).expect("non-empty");
        prop_assert_eq!(table.week_buckets(), extraction.buckets);
        prop_assert_eq!(
            WeekBuckets::from_dates(table.records().iter().map(|r| r.date)),
            Some(extraction.buckets)
        );
    }
}
