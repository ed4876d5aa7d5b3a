//! Paired polarity density of receiver against sender messages.

use plotters::prelude::*;
use tracing::debug;

use super::figure::{draw_axes, draw_figure, titled, Axes, Figure};
use super::stats::{linspace, Kde2d};
use super::style::{ChartStyle, ColorMap};
use crate::error::Result;
use crate::models::{MessageTable, Party};
use crate::nlp::NlpProcessor;

/// Equal-length polarity lists, one per party
#[derive(Debug, Clone, PartialEq)]
pub struct PolarityPairs {
    /// Counterpart polarities, in message order
    pub receiver: Vec<f64>,
    /// Local user polarities, in message order
    pub sender: Vec<f64>,
}

impl PolarityPairs {
    /// Number of pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// True when there are no pairs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Non-zero polarities of `party`'s messages, in message order
pub fn nonzero_polarities(table: &MessageTable, party: Party, nlp: &NlpProcessor) -> Vec<f64> {
    table
        .by_party(party)
        .map(|record| nlp.polarity(&record.text))
        .filter(|polarity| *polarity != 0.0)
        .collect()
}

/// Both parties' non-zero polarities, truncated to the shorter list
pub fn paired_polarities(table: &MessageTable, nlp: &NlpProcessor) -> PolarityPairs {
    let mut receiver = nonzero_polarities(table, Party::Receiver, nlp);
    let mut sender = nonzero_polarities(table, Party::Sender, nlp);

    let shared = receiver.len().min(sender.len());
    debug!(
        receiver = receiver.len(),
        sender = sender.len(),
        shared,
        "Pairing message polarities"
    );
    receiver.truncate(shared);
    sender.truncate(shared);

    PolarityPairs { receiver, sender }
}

/// Density estimate sampled on a square grid over [-1, 1]²
#[derive(Debug, Clone)]
pub struct DensityGrid {
    /// Cell centers along each axis
    pub centers: Vec<f64>,
    /// Row-major densities, `values[row * n + col]` at (`centers[col]`, `centers[row]`)
    pub values: Vec<f64>,
    /// Largest density on the grid
    pub max: f64,
}

/// Fit a 2D KDE to `pairs` (receiver on x) and sample it at `resolution²` cells.
///
/// `None` when there are too few pairs or no spread to estimate from.
#[must_use]
pub fn density_grid(pairs: &PolarityPairs, resolution: usize) -> Option<DensityGrid> {
    let kde = Kde2d::fit(&pairs.receiver, &pairs.sender)?;

    let step = 2.0 / resolution as f64;
    let centers = linspace(-1.0 + step / 2.0, 1.0 - step / 2.0, resolution);

    let values: Vec<f64> = centers
        .iter()
        .flat_map(|&y| centers.iter().map(move |&x| (x, y)))
        .map(|(x, y)| kde.density(x, y))
        .collect();
    let max = values.iter().copied().fold(0.0, f64::max);

    Some(DensityGrid { centers, values, max })
}

const SIZE: (u32, u32) = (1200, 1200);
const RESOLUTION: usize = 120;
// Cells below this share of the peak are left unshaded
const FLOOR: f64 = 0.05;

/// Shaded density of receiver polarity (x) against sender polarity (y)
pub fn render(table: &MessageTable, style: &ChartStyle, nlp: &NlpProcessor) -> Result<Figure> {
    let pairs = paired_polarities(table, nlp);
    let grid = density_grid(&pairs, RESOLUTION);
    if grid.is_none() {
        debug!(pairs = pairs.len(), "Not enough polarity pairs for a density estimate");
    }

    draw_figure(SIZE, style.background, |root| {
        let area = titled(root, &["Positivity of messages", "(sender vs. receiver)"], style)?;

        let mut chart = ChartBuilder::on(&area)
            .margin(24)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(-1.0_f64..1.0, -1.0_f64..1.0)?;

        let tick = |v: &f64| format!("{v:.1}");
        draw_axes(
            &mut chart,
            style,
            &Axes {
                x_desc: Some("Receiver polarity"),
                y_desc: Some("Sender polarity"),
                x_labels: 11,
                y_labels: 11,
                x_format: &tick,
                y_format: &tick,
                x_grid: true,
                y_grid: false,
            },
        )?;

        let Some(grid) = grid.as_ref().filter(|g| g.max > 0.0) else {
            return Ok(());
        };

        let n = grid.centers.len();
        let half = 1.0 / n as f64;
        chart.draw_series(grid.values.iter().enumerate().filter_map(|(cell, &density)| {
            let level = density / grid.max;
            if level < FLOOR {
                return None;
            }
            let (x, y) = (grid.centers[cell % n], grid.centers[cell / n]);
            Some(Rectangle::new(
                [(x - half, y - half), (x + half, y + half)],
                ColorMap::PURPLES.sample(level).filled(),
            ))
        }))?;

        Ok(())
    })
}
