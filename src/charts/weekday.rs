//! Day-of-week message volume.

use plotters::prelude::*;

use super::figure::{draw_axes, draw_figure, integer_tick, titled, Axes, Figure};
use super::format::format_category_tick;
use super::style::ChartStyle;
use crate::error::Result;
use crate::models::MessageTable;

/// Weekday axis labels, Monday first
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tues", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Messages per weekday from both parties, Monday first
#[must_use]
pub fn weekday_counts(table: &MessageTable) -> [usize; 7] {
    let mut counts = [0; 7];
    for record in table.records() {
        if let Some(count) = counts.get_mut(usize::from(record.day)) {
            *count += 1;
        }
    }
    counts
}

const SIZE: (u32, u32) = (1200, 1000);

/// One bar per weekday
pub fn render(table: &MessageTable, style: &ChartStyle) -> Result<Figure> {
    let counts = weekday_counts(table);
    let y_max = (counts.iter().copied().max().unwrap_or(0).max(1) as f64) * 1.1;

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, &["What days did we send our texts?"], style)?;

        let mut chart = ChartBuilder::on(&area)
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..6.5_f64, 0.0..y_max)?;

        let day_tick = |x: &f64| format_category_tick(*x, &WEEKDAY_LABELS);
        draw_axes(
            &mut chart,
            style,
            &Axes {
                x_desc: None,
                y_desc: Some("Number of texts sent"),
                x_labels: 7,
                y_labels: 10,
                x_format: &day_tick,
                y_format: &integer_tick,
                x_grid: false,
                y_grid: true,
            },
        )?;

        let color = style.palette[0];
        chart.draw_series(counts.iter().enumerate().map(|(day, &count)| {
            let center = day as f64;
            Rectangle::new([(center - 0.4, 0.0), (center + 0.4, count as f64)], color.filled())
        }))?;

        Ok(())
    })
}
