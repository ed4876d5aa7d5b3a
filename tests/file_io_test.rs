//! Interchange file contract tests

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use txt_stats::dates::WeekBuckets;
use txt_stats::extract::derive_record;
use txt_stats::file_io::{read_messages_csv, read_records, write_messages_csv, write_records};
use txt_stats::schema::columns;
use txt_stats::{MessageRecord, TxtStatsError};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, day)
        .and_then(|d| d.and_hms_opt(hour, 15, 0))
        .expect("valid date")
}

fn sample_records() -> Vec<MessageRecord> {
    let dates = [at(3, 8), at(3, 22), at(9, 13), at(24, 9)];
    let buckets = WeekBuckets::from_dates(dates).expect("non-empty");
    let texts = ["Morning!", "she said \"no\", then left", "line one\nline two", "ok"];

    dates
        .iter()
        .zip(texts)
        .enumerate()
        .map(|(i, (&date, text))| derive_record(i, text.to_string(), i % 2 == 0, date, &buckets))
        .collect()
}

#[test]
fn test_header_matches_contract() {
    let mut buffer = Vec::new();
    write_records(&sample_records(), &mut buffer).expect("Failed to write");
    let text = String::from_utf8(buffer).expect("utf-8 output");

    let header = text.lines().next().expect("header row");
    assert_eq!(header, columns::ALL.join(","));
    assert_eq!(header, "index,text,is_from_me,date,week,day,hourly_bin,text_length,num_words");
}

#[test]
fn test_flag_and_date_formats() {
    let mut buffer = Vec::new();
    write_records(&sample_records(), &mut buffer).expect("Failed to write");
    let text = String::from_utf8(buffer).expect("utf-8 output");

    let first_row = text.lines().nth(1).expect("first data row");
    assert_eq!(first_row, "0,Morning!,1,2021-03-03 08:15:00,0,2,8,8,1");
}

#[test]
fn test_round_trip_keeps_records_and_buckets() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("messages.csv");
    let records = sample_records();

    write_messages_csv(&records, &path).expect("Failed to write csv");
    let table = read_messages_csv(&path).expect("Failed to read csv");

    assert_eq!(table.records(), records.as_slice());
    let expected = WeekBuckets::from_dates(records.iter().map(|r| r.date)).expect("non-empty");
    assert_eq!(table.week_buckets(), expected);
    // 21 days between the first and last message
    assert_eq!(table.week_buckets().periods(), 5);
}

#[test]
fn test_blank_index_header_loads() {
    let csv = ",text,is_from_me,date,week,day,hourly_bin,text_length,num_words\n\
               0,hey,0,2021-03-03 08:15:00,0,2,8,3,1\n";
    let records = read_records(csv.as_bytes()).expect("Failed to parse");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].index, 0);
    assert!(!records[0].is_from_me);
}

#[test]
fn test_missing_columns_reported() {
    let csv = "index,text,date\n0,hey,2021-03-03 08:15:00\n";
    let err = read_records(csv.as_bytes()).expect_err("columns missing");
    match err {
        TxtStatsError::MissingColumns(missing) => {
            assert!(missing.contains(&"is_from_me".to_string()));
            assert!(missing.contains(&"num_words".to_string()));
            assert!(!missing.contains(&"text".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_table_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.csv");

    write_messages_csv(&[], &path).expect("Failed to write header-only csv");
    let contents = fs::read_to_string(&path).expect("Failed to read back");
    assert_eq!(contents.trim_end(), columns::ALL.join(","));

    let err = read_messages_csv(&path).expect_err("empty table");
    assert!(matches!(err, TxtStatsError::EmptyDataset(ref name) if name.contains("empty.csv")));
}

#[test]
fn test_unwritable_output_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("no-such-dir").join("messages.csv");
    let err = write_messages_csv(&sample_records(), &path).expect_err("parent missing");
    assert!(matches!(err, TxtStatsError::Io(_)));
}
