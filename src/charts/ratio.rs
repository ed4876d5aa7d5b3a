//! Sent-ratio pie chart.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::figure::{draw_figure, font, titled, Canvas, Figure};
use super::format::{format_pie_label, percentages};
use super::style::ChartStyle;
use crate::error::Result;
use crate::models::{MessageTable, Party};

/// Messages per party
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentRatio {
    /// Messages from the counterpart
    pub receiver: usize,
    /// Messages from the local user
    pub sender: usize,
}

impl SentRatio {
    /// Count both parties in `table`
    #[must_use]
    pub fn from_table(table: &MessageTable) -> Self {
        Self {
            receiver: table.count(Party::Receiver),
            sender: table.count(Party::Sender),
        }
    }

    /// Both counts combined
    #[must_use]
    pub const fn total(&self) -> usize {
        self.receiver + self.sender
    }

    /// `(party, count, percent)`, receiver first
    #[must_use]
    pub fn segments(&self) -> [(Party, usize, f64); 2] {
        let shares = percentages(&[self.receiver, self.sender]);
        [
            (Party::Receiver, self.receiver, shares[0]),
            (Party::Sender, self.sender, shares[1]),
        ]
    }
}

const SIZE: (u32, u32) = (1000, 1000);
const START_ANGLE: f64 = 90.0;
const SHADOW_OFFSET: i32 = 6;

/// Pie of who sent more, starting at 12 o'clock and running counter-clockwise
pub fn render(table: &MessageTable, style: &ChartStyle) -> Result<Figure> {
    let ratio = SentRatio::from_table(table);

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, &["Who has sent more messages?"], style)?;
        draw_pie(&area, &ratio, style)
    })
}

fn draw_pie(area: &Canvas<'_>, ratio: &SentRatio, style: &ChartStyle) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let center = ((width / 2) as i32, (height / 2) as i32);
    let radius = f64::from(width.min(height)) * 0.36;

    let mut wedges = Vec::with_capacity(2);
    let mut start = START_ANGLE;
    for (slot, (party, count, percent)) in ratio.segments().into_iter().enumerate() {
        let sweep = 360.0 * percent / 100.0;
        if count > 0 {
            wedges.push((slot, party, count, percent, start, sweep));
        }
        start += sweep;
    }

    for &(_, _, _, _, start, sweep) in &wedges {
        let shadow: Vec<(i32, i32)> = wedge_points(center, radius, start, sweep)
            .into_iter()
            .map(|(x, y)| (x + SHADOW_OFFSET, y + SHADOW_OFFSET))
            .collect();
        area.draw(&Polygon::new(shadow, BLACK.mix(0.25).filled()))?;
    }

    for &(slot, _, _, _, start, sweep) in &wedges {
        let points = wedge_points(center, radius, start, sweep);
        area.draw(&Polygon::new(points, style.palette[slot].filled()))?;
    }

    let centered = Pos::new(HPos::Center, VPos::Center);
    let value_text = font(24, &style.foreground).pos(centered);
    let name_text = font(28, &style.foreground).pos(centered);

    for &(_, party, count, percent, start, sweep) in &wedges {
        let middle = start + sweep / 2.0;

        let (x, y) = polar(center, radius * 0.6, middle);
        for (line_no, line) in format_pie_label(count, percent).lines().enumerate() {
            let offset = (line_no as i32 * 2 - 1) * 15;
            area.draw_text(line.trim_end(), &value_text, (x, y + offset))?;
        }

        area.draw_text(party.label(), &name_text, polar(center, radius * 1.15, middle))?;
    }

    Ok(())
}

/// Polygon outline of a wedge, angles in degrees counter-clockwise from 3 o'clock
fn wedge_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = sweep.abs().ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        points.push(polar(center, radius, start + sweep * step as f64 / steps as f64));
    }
    points
}

fn polar(center: (i32, i32), radius: f64, degrees: f64) -> (i32, i32) {
    let radians = degrees.to_radians();
    (
        center.0 + (radius * radians.cos()).round() as i32,
        center.1 - (radius * radians.sin()).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_cover_total() {
        let ratio = SentRatio { receiver: 3, sender: 1 };
        let segments = ratio.segments();
        assert_eq!(segments[0].1 + segments[1].1, ratio.total());
        assert!((segments[0].2 - 75.0).abs() < 1e-9);
        assert!((segments[1].2 - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_wedge_starts_at_twelve_oclock() {
        let points = wedge_points((100, 100), 50.0, START_ANGLE, 90.0);
        assert_eq!(points[0], (100, 100));
        assert_eq!(points[1], (100, 50));
        // Counter-clockwise quarter ends at 9 o'clock
        assert_eq!(*points.last().expect("arc points"), (50, 100));
    }
}
