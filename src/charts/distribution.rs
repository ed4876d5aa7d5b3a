//! Overlaid histograms of message length and word count.

use plotters::prelude::*;

use super::figure::{draw_axes, draw_figure, draw_legend, integer_tick, titled, Axes, Figure};
use super::stats::{histogram, Histogram};
use super::style::ChartStyle;
use super::ChartSettings;
use crate::error::Result;
use crate::models::{MessageRecord, MessageTable, Party};

/// One histogram per party over the same measurement
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Counterpart messages
    pub receiver: Histogram,
    /// Local user messages
    pub sender: Histogram,
}

impl Distribution {
    /// Histogram for `party`
    #[must_use]
    pub const fn for_party(&self, party: Party) -> &Histogram {
        match party {
            Party::Receiver => &self.receiver,
            Party::Sender => &self.sender,
        }
    }

    fn x_range(&self) -> (f64, f64) {
        let (r_low, r_high) = self.receiver.range();
        let (s_low, s_high) = self.sender.range();
        (r_low.min(s_low), r_high.max(s_high))
    }

    fn max_count(&self) -> usize {
        self.receiver.max_count().max(self.sender.max_count())
    }
}

/// Values of `field` for `party`, keeping only those strictly below `cap`
fn capped_values<F>(table: &MessageTable, party: Party, cap: usize, field: F) -> Vec<f64>
where
    F: Fn(&MessageRecord) -> usize,
{
    table
        .by_party(party)
        .map(field)
        .filter(|&value| value < cap)
        .map(|value| value as f64)
        .collect()
}

fn distribution<F>(table: &MessageTable, cap: usize, bins: usize, field: F) -> Distribution
where
    F: Fn(&MessageRecord) -> usize + Copy,
{
    Distribution {
        receiver: histogram(&capped_values(table, Party::Receiver, cap, field), bins),
        sender: histogram(&capped_values(table, Party::Sender, cap, field), bins),
    }
}

/// Character counts below `cap`, binned per party
#[must_use]
pub fn length_distribution(table: &MessageTable, cap: usize, bins: usize) -> Distribution {
    distribution(table, cap, bins, |record| record.text_length)
}

/// Word counts below `cap`, binned per party
#[must_use]
pub fn word_count_distribution(table: &MessageTable, cap: usize, bins: usize) -> Distribution {
    distribution(table, cap, bins, |record| record.num_words)
}

const SIZE: (u32, u32) = (1000, 800);
const ALPHA: f64 = 0.7;

/// Message length histogram
pub fn render_text_length(table: &MessageTable, style: &ChartStyle, settings: &ChartSettings) -> Result<Figure> {
    let dist = length_distribution(table, settings.text_length_cap, settings.histogram_bins);
    render_histograms(
        &dist,
        &["Text message length distribution", "(excluding outliers)"],
        "Characters per message",
        style,
    )
}

/// Words-per-message histogram
pub fn render_num_words(table: &MessageTable, style: &ChartStyle, settings: &ChartSettings) -> Result<Figure> {
    let dist = word_count_distribution(table, settings.num_words_cap, settings.histogram_bins);
    render_histograms(
        &dist,
        &["Number of words per text distribution", "(excluding outliers)"],
        "Words per message",
        style,
    )
}

fn render_histograms(dist: &Distribution, title: &[&str], x_desc: &str, style: &ChartStyle) -> Result<Figure> {
    let (x_low, x_high) = dist.x_range();
    let y_max = (dist.max_count().max(1) as f64) * 1.1;

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, title, style)?;

        let mut chart = ChartBuilder::on(&area)
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(x_low..x_high, 0.0..y_max)?;

        draw_axes(
            &mut chart,
            style,
            &Axes {
                x_desc: Some(x_desc),
                y_desc: Some("Number of texts"),
                x_labels: 10,
                y_labels: 10,
                x_format: &integer_tick,
                y_format: &integer_tick,
                x_grid: false,
                y_grid: false,
            },
        )?;

        for (slot, party) in Party::BOTH.into_iter().enumerate() {
            let color = style.palette[slot].mix(ALPHA);
            chart
                .draw_series(
                    dist.for_party(party)
                        .bins()
                        .filter(|&(_, _, count)| count > 0)
                        .map(|(left, right, count)| {
                            Rectangle::new([(left, 0.0), (right, count as f64)], color.filled())
                        }),
                )?
                .label(party.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
        }

        draw_legend(&mut chart, style)
    })
}
