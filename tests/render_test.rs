//! Drawing every chart, skipped when the machine has no usable font

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use tempfile::tempdir;
use txt_stats::charts::{install_font, render_all, render_chart, ChartSettings};
use txt_stats::dates::WeekBuckets;
use txt_stats::extract::derive_record;
use txt_stats::{ChartKind, ChartStyle, MessageRecord, MessageTable, NlpProcessor, RenderContext};

fn font_available() -> bool {
    install_font(None).is_ok()
}

fn table(messages: &[(&str, bool, i64)]) -> MessageTable {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2021, 1, 4)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid date");
    let dates: Vec<NaiveDateTime> = messages
        .iter()
        .map(|(_, _, hours)| start + Duration::hours(*hours))
        .collect();
    let buckets = WeekBuckets::from_dates(dates.iter().copied()).expect("non-empty");

    let records: Vec<MessageRecord> = messages
        .iter()
        .zip(&dates)
        .enumerate()
        .map(|(i, ((text, from_me, _), &date))| derive_record(i, (*text).to_string(), *from_me, date, &buckets))
        .collect();
    MessageTable::new(records).expect("non-empty")
}

fn context(style: &str) -> RenderContext {
    RenderContext {
        style: style.parse().expect("known style"),
        settings: ChartSettings::default(),
        nlp: NlpProcessor::with_default_stopwords().expect("Failed to create NLP processor"),
    }
}

fn mixed() -> MessageTable {
    table(&[
        ("Good morning! Pizza tonight?", false, 0),
        ("yes that sounds great, love it", true, 1),
        ("I hate the rain so much", false, 30),
        ("pizza is the best", true, 31),
        ("running late sorry", false, 75),
        ("no worries at all, happy to wait", true, 76),
        ("what a wonderful movie", false, 200),
        ("terrible ending though", true, 203),
        ("more pizza tomorrow?", true, 230),
    ])
}

#[test]
fn test_every_chart_draws_sender_only_table() {
    if !font_available() {
        return;
    }
    let messages = table(&[("hello there", true, 0), ("another happy message", true, 5), ("ok", true, 40)]);
    let ctx = context("default");

    for kind in ChartKind::ALL {
        let figure = render_chart(kind, &messages, &ctx).unwrap_or_else(|e| panic!("{kind}: {e}"));
        assert!(figure.width() > 0 && figure.height() > 0);
    }
}

#[test]
fn test_every_chart_draws_mixed_table_in_each_style() {
    if !font_available() {
        return;
    }
    let messages = mixed();

    for style in ["default", "ggplot", "dark_background"] {
        let ctx = context(style);
        for kind in ChartKind::ALL {
            render_chart(kind, &messages, &ctx).unwrap_or_else(|e| panic!("{style} {kind}: {e}"));
        }
    }
}

#[test]
fn test_single_message_table_draws() {
    if !font_available() {
        return;
    }
    let messages = table(&[("just one", false, 0)]);
    let ctx = context("classic");

    for kind in ChartKind::ALL {
        render_chart(kind, &messages, &ctx).unwrap_or_else(|e| panic!("{kind}: {e}"));
    }
}

#[tokio::test]
async fn test_render_all_writes_nine_files() {
    if !font_available() {
        return;
    }
    let dir = tempdir().expect("Failed to create temp dir");
    let written = render_all(Arc::new(mixed()), Arc::new(context("seaborn")), dir.path(), true)
        .await
        .expect("Failed to render charts");

    assert_eq!(written.len(), 9);
    for kind in ChartKind::ALL {
        let path = dir.path().join(kind.file_name());
        assert!(path.is_file(), "{} missing", path.display());
        let decoded = image::open(&path).expect("valid png");
        assert!(decoded.width() > 0);
    }
}

#[test]
fn test_style_is_threaded_into_figures() {
    if !font_available() {
        return;
    }
    let messages = mixed();
    let dark: ChartStyle = "dark_background".parse().expect("known style");

    let figure = render_chart(ChartKind::MessagesByDay, &messages, &context("dark_background")).expect("draw");
    let corner = figure.pixel(0, 0).expect("in bounds");
    assert_eq!(corner, [dark.background.0, dark.background.1, dark.background.2]);
}
