//! Hour-of-day split violins per weekday.

use plotters::prelude::*;

use super::figure::{draw_axes, draw_figure, draw_legend, titled, Axes, Figure};
use super::format::{format_category_tick, format_hour_tick};
use super::stats::{gaussian_kde, linspace};
use super::style::ChartStyle;
use super::weekday::WEEKDAY_LABELS;
use crate::error::Result;
use crate::models::{MessageTable, Party};

/// Shape of one violin half
#[derive(Debug, Clone, PartialEq)]
pub enum ViolinProfile {
    /// No messages
    Empty,
    /// Every message in the same hour
    Point(f64),
    /// Density sampled between the earliest and latest hour
    Density {
        /// Hours the density was evaluated at
        hours: Vec<f64>,
        /// Estimated density at each hour
        density: Vec<f64>,
    },
}

impl ViolinProfile {
    fn peak(&self) -> f64 {
        match self {
            Self::Density { density, .. } => density.iter().copied().fold(0.0, f64::max),
            Self::Empty | Self::Point(_) => 0.0,
        }
    }
}

/// One party's half of a weekday violin
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinHalf {
    /// Weekday, Monday = 0
    pub day: u8,
    /// Whose messages this half describes
    pub party: Party,
    /// Distribution of send hours
    pub profile: ViolinProfile,
}

const GRID_POINTS: usize = 100;

/// Send hours per weekday and party, `[day][party]`, receiver first
#[must_use]
pub fn hours_by_day(table: &MessageTable) -> [[Vec<f64>; 2]; 7] {
    let mut hours: [[Vec<f64>; 2]; 7] = Default::default();
    for record in table.records() {
        let slot = match record.party() {
            Party::Receiver => 0,
            Party::Sender => 1,
        };
        if let Some(day) = hours.get_mut(usize::from(record.day)) {
            day[slot].push(f64::from(record.hourly_bin));
        }
    }
    hours
}

/// Fourteen halves, Monday to Sunday, receiver before sender
#[must_use]
pub fn violin_halves(table: &MessageTable) -> Vec<ViolinHalf> {
    hours_by_day(table)
        .into_iter()
        .zip(0_u8..)
        .flat_map(|(parties, day)| {
            Party::BOTH
                .into_iter()
                .zip(parties)
                .map(move |(party, hours)| ViolinHalf {
                    day,
                    party,
                    profile: profile(&hours),
                })
        })
        .collect()
}

fn profile(hours: &[f64]) -> ViolinProfile {
    let Some(&first) = hours.first() else {
        return ViolinProfile::Empty;
    };
    let (low, high) = hours
        .iter()
        .fold((first, first), |(lo, hi), &h| (lo.min(h), hi.max(h)));

    let grid = linspace(low, high, GRID_POINTS);
    match gaussian_kde(hours, &grid) {
        Some(density) => ViolinProfile::Density { hours: grid, density },
        None => ViolinProfile::Point(first),
    }
}

const SIZE: (u32, u32) = (1200, 1000);
const HALF_WIDTH: f64 = 0.4;
const ALPHA: f64 = 0.85;

/// Split violins: receiver on the left of each weekday, sender on the right
pub fn render(table: &MessageTable, style: &ChartStyle) -> Result<Figure> {
    let halves = violin_halves(table);
    let peak = halves
        .iter()
        .map(|half| half.profile.peak())
        .fold(0.0, f64::max);
    let scale = if peak > 0.0 { HALF_WIDTH / peak } else { 0.0 };

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, &["What hour did we send our texts?"], style)?;

        let mut chart = ChartBuilder::on(&area)
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(-0.5..6.5_f64, -1.0..24.0_f64)?;

        let day_tick = |x: &f64| format_category_tick(*x, &WEEKDAY_LABELS);
        let hour_tick = |y: &f64| format_hour_tick(*y);
        draw_axes(
            &mut chart,
            style,
            &Axes {
                x_desc: None,
                y_desc: None,
                x_labels: 7,
                y_labels: 26,
                x_format: &day_tick,
                y_format: &hour_tick,
                x_grid: false,
                y_grid: true,
            },
        )?;

        for (slot, party) in Party::BOTH.into_iter().enumerate() {
            let color = style.palette[slot].mix(ALPHA);
            // Receiver halves grow left of the weekday center, sender halves right
            let side = if slot == 0 { -1.0 } else { 1.0 };

            chart
                .draw_series(
                    halves
                        .iter()
                        .filter(|half| half.party == party)
                        .filter_map(|half| half_outline(half, side, scale))
                        .map(|outline| Polygon::new(outline, color.filled())),
                )?
                .label(party.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));

            chart.draw_series(halves.iter().filter(|half| half.party == party).filter_map(|half| {
                match half.profile {
                    ViolinProfile::Point(hour) => {
                        let center = f64::from(half.day);
                        Some(PathElement::new(
                            vec![(center, hour), (center + side * HALF_WIDTH, hour)],
                            color.stroke_width(3),
                        ))
                    }
                    _ => None,
                }
            }))?;
        }

        draw_legend(&mut chart, style)
    })
}

/// Closed outline of a density half in chart coordinates
fn half_outline(half: &ViolinHalf, side: f64, scale: f64) -> Option<Vec<(f64, f64)>> {
    let ViolinProfile::Density { hours, density } = &half.profile else {
        return None;
    };
    let center = f64::from(half.day);

    let mut outline = Vec::with_capacity(hours.len() + 2);
    outline.push((center, *hours.first()?));
    outline.extend(
        hours
            .iter()
            .zip(density)
            .map(|(&hour, &d)| (center + side * d * scale, hour)),
    );
    outline.push((center, *hours.last()?));
    Some(outline)
}
