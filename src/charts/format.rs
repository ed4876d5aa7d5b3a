//! Label formatters shared by the charts.

use chrono::NaiveDate;

/// Hours that carry a tick label on the hour-of-day chart
pub const HOUR_TICKS: [u32; 9] = [0, 3, 6, 9, 12, 15, 18, 21, 23];

/// Pie segment label: count on the first line, share on the second
#[must_use]
pub fn format_pie_label(count: usize, percent: f64) -> String {
    format!("{count} messages \n({percent:.2}%)")
}

/// Week bucket label, e.g. `Jan 03`
#[must_use]
pub fn format_week_label(start: NaiveDate) -> String {
    start.format("%b %d").to_string()
}

/// Count drawn above a bar
#[must_use]
pub fn format_count_label(count: usize) -> String {
    count.to_string()
}

/// 24-hour clock label, e.g. `21:00H`
#[must_use]
pub fn format_hour_label(hour: u32) -> String {
    format!("{hour}:00H")
}

/// Hour axis tick: labeled only at [`HOUR_TICKS`]
#[must_use]
pub fn format_hour_tick(value: f64) -> String {
    as_index(value)
        .and_then(|hour| u32::try_from(hour).ok())
        .filter(|hour| HOUR_TICKS.contains(hour))
        .map(format_hour_label)
        .unwrap_or_default()
}

/// Category axis tick: the label at integer position `value`, blank elsewhere
#[must_use]
pub fn format_category_tick<S: AsRef<str>>(value: f64, labels: &[S]) -> String {
    as_index(value)
        .and_then(|i| labels.get(i))
        .map(|label| label.as_ref().to_string())
        .unwrap_or_default()
}

/// Percent share of each count in `counts`; all zeros when the total is zero
#[must_use]
pub fn percentages(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts
        .iter()
        .map(|&count| count as f64 * 100.0 / total as f64)
        .collect()
}

// Non-negative integer position, tolerating float noise from tick generation
fn as_index(value: f64) -> Option<usize> {
    let rounded = value.round();
    if rounded < 0.0 || (value - rounded).abs() > 1e-6 {
        None
    } else {
        Some(rounded as usize)
    }
}
