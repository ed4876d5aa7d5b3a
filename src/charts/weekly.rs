//! Weekly message volume per party.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::figure::{draw_axes, draw_figure, draw_legend, font, integer_tick, titled, Axes, Figure};
use super::format::{format_category_tick, format_count_label, format_week_label};
use super::style::ChartStyle;
use crate::error::Result;
use crate::models::{MessageTable, Party};

/// Per-bucket message counts, one entry per week bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyCounts {
    /// Bucket start dates, e.g. `Jan 03`
    pub labels: Vec<String>,
    /// Counterpart messages per bucket
    pub receiver: Vec<usize>,
    /// Local user messages per bucket
    pub sender: Vec<usize>,
}

impl WeeklyCounts {
    /// Number of week buckets
    #[must_use]
    pub fn periods(&self) -> usize {
        self.labels.len()
    }

    /// Counts for `party`
    #[must_use]
    pub fn counts(&self, party: Party) -> &[usize] {
        match party {
            Party::Receiver => &self.receiver,
            Party::Sender => &self.sender,
        }
    }

    fn max_count(&self) -> usize {
        self.receiver.iter().chain(&self.sender).copied().max().unwrap_or(0)
    }
}

/// Count messages per party in each week bucket of `table`
#[must_use]
pub fn weekly_counts(table: &MessageTable) -> WeeklyCounts {
    let buckets = table.week_buckets();
    let periods = buckets.periods();

    let mut receiver = vec![0; periods];
    let mut sender = vec![0; periods];
    for record in table.records() {
        let slot = match record.party() {
            Party::Receiver => &mut receiver,
            Party::Sender => &mut sender,
        };
        if let Some(count) = slot.get_mut(record.week as usize) {
            *count += 1;
        }
    }

    WeeklyCounts {
        labels: buckets.starts().map(format_week_label).collect(),
        receiver,
        sender,
    }
}

const SIZE: (u32, u32) = (1200, 1000);
const BAR_WIDTH: f64 = 0.4;
const MAX_WEEK_LABELS: usize = 20;

/// Side-by-side bars per week, receiver left of sender, each annotated with its count
pub fn render(table: &MessageTable, style: &ChartStyle) -> Result<Figure> {
    let weekly = weekly_counts(table);
    let periods = weekly.periods();
    let y_max = (weekly.max_count().max(1) as f64) * 1.12;

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, &["How many texts did we send each week?"], style)?;

        let mut chart = ChartBuilder::on(&area)
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.6..(periods as f64 - 0.4), 0.0..y_max)?;

        let week_tick = |x: &f64| format_category_tick(*x, &weekly.labels);
        draw_axes(
            &mut chart,
            style,
            &Axes {
                x_desc: Some("Week of"),
                y_desc: Some("Texts sent"),
                x_labels: periods.min(MAX_WEEK_LABELS),
                y_labels: 10,
                x_format: &week_tick,
                y_format: &integer_tick,
                x_grid: false,
                y_grid: false,
            },
        )?;

        let count_text = font(12, &style.foreground).pos(Pos::new(HPos::Center, VPos::Bottom));

        for (slot, party) in Party::BOTH.into_iter().enumerate() {
            let color = style.palette[slot];
            let counts = weekly.counts(party);
            // Receiver bars sit left of the bucket center, sender bars right
            let offset = if slot == 0 { -BAR_WIDTH } else { 0.0 };

            chart
                .draw_series(counts.iter().enumerate().map(|(week, &count)| {
                    let left = week as f64 + offset;
                    Rectangle::new([(left, 0.0), (left + BAR_WIDTH, count as f64)], color.filled())
                }))?
                .label(party.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));

            chart.draw_series(counts.iter().enumerate().map(|(week, &count)| {
                let center = week as f64 + offset + BAR_WIDTH / 2.0;
                Text::new(format_count_label(count), (center, count as f64), count_text.clone())
            }))?;
        }

        draw_legend(&mut chart, style)
    })
}
