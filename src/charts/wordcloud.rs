//! Frequency-weighted word clouds, one per party.
//!
//! Words are placed largest first along an Archimedean spiral from a
//! jittered center, skipping any position whose bounding box would overlap
//! an earlier word. A word that fits nowhere is retried at a smaller size
//! and dropped once it falls below the minimum. Occupancy is tracked on a
//! coarse cell grid with a summed-area table so every overlap test is
//! constant time.

use plotters::prelude::*;
use plotters::style::FontTransform;
use rand::Rng;
use tracing::debug;

use super::figure::{draw_figure, font, Figure};
use super::style::ColorMap;
use crate::error::Result;
use crate::models::{MessageTable, Party};
use crate::nlp::NlpProcessor;

/// Most words drawn in one cloud
pub const MAX_WORDS: usize = 200;

const SIZE: (u32, u32) = (1200, 1200);
const MAX_FONT: f64 = 150.0;
const MIN_FONT: u32 = 10;
const SHRINK: f64 = 0.85;
const VERTICAL_SHARE: f64 = 0.1;
const CENTER_JITTER: f64 = 0.1;
const SPIRAL_GROWTH: f64 = 4.0;
const SPIRAL_STEP_PX: f64 = 6.0;
const CELL: u32 = 4;
// Upper end of the color map sampled, keeping words legible on white
const COLOR_SPAN: f64 = 0.7;

/// A word and its frequency relative to the most frequent word
#[derive(Debug, Clone, PartialEq)]
pub struct CloudWord {
    /// Token text
    pub text: String,
    /// Frequency divided by the top frequency, in (0, 1]
    pub weight: f64,
}

/// Text direction of a placed word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right
    Horizontal,
    /// Rotated a quarter turn clockwise
    Vertical,
}

/// Where a word landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Token text
    pub text: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Text direction
    pub orientation: Orientation,
    /// Left edge of the bounding box
    pub x: i32,
    /// Top edge of the bounding box
    pub y: i32,
    /// Bounding box width
    pub width: u32,
    /// Bounding box height
    pub height: u32,
}

impl Placement {
    /// True if the bounding boxes intersect
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width as i32
            && other.x < self.x + self.width as i32
            && self.y < other.y + other.height as i32
            && other.y < self.y + self.height as i32
    }
}

/// The [`MAX_WORDS`] most frequent words, weighted against the most frequent one.
///
/// `frequencies` must be sorted most frequent first, as
/// [`NlpProcessor::word_frequencies`] returns them.
#[must_use]
pub fn cloud_words(frequencies: &[(String, usize)]) -> Vec<CloudWord> {
    let Some(&(_, top)) = frequencies.first() else {
        return Vec::new();
    };
    let top = top.max(1) as f64;

    frequencies
        .iter()
        .take(MAX_WORDS)
        .map(|(text, count)| CloudWord {
            text: text.clone(),
            weight: *count as f64 / top,
        })
        .collect()
}

/// Lay out `words` on a `size` canvas.
///
/// `measure` returns the horizontal bounding box of a word at a font size.
pub fn layout<R, M>(words: &[CloudWord], size: (u32, u32), rng: &mut R, mut measure: M) -> Result<Vec<Placement>>
where
    R: Rng + ?Sized,
    M: FnMut(&str, u32) -> Result<(u32, u32)>,
{
    let mut occupancy = Occupancy::new(size);
    let mut placed = Vec::with_capacity(words.len());

    for word in words {
        let orientation = if rng.gen_bool(VERTICAL_SHARE) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };

        let mut font_size = (MAX_FONT * (0.5 * word.weight + 0.5)).round() as u32;
        while font_size >= MIN_FONT {
            let (text_width, text_height) = measure(&word.text, font_size)?;
            let (width, height) = match orientation {
                Orientation::Horizontal => (text_width, text_height),
                Orientation::Vertical => (text_height, text_width),
            };

            if let Some((x, y)) = find_spot(&occupancy, size, (width, height), rng) {
                occupancy.mark(x, y, width, height);
                placed.push(Placement {
                    text: word.text.clone(),
                    font_size,
                    orientation,
                    x,
                    y,
                    width,
                    height,
                });
                break;
            }
            font_size = (f64::from(font_size) * SHRINK).floor() as u32;
        }

        if font_size < MIN_FONT {
            debug!(word = %word.text, "No room left in word cloud");
        }
    }

    Ok(placed)
}

fn find_spot<R: Rng + ?Sized>(occupancy: &Occupancy, size: (u32, u32), bbox: (u32, u32), rng: &mut R) -> Option<(i32, i32)> {
    let (canvas_w, canvas_h) = (f64::from(size.0), f64::from(size.1));
    let (width, height) = (f64::from(bbox.0), f64::from(bbox.1));
    if width > canvas_w || height > canvas_h {
        return None;
    }

    let center_x = canvas_w / 2.0 + rng.gen_range(-CENTER_JITTER..=CENTER_JITTER) * canvas_w;
    let center_y = canvas_h / 2.0 + rng.gen_range(-CENTER_JITTER..=CENTER_JITTER) * canvas_h;
    let max_radius = canvas_w.hypot(canvas_h);

    let mut theta: f64 = 0.0;
    loop {
        let radius = SPIRAL_GROWTH * theta;
        if radius > max_radius {
            return None;
        }

        let x = (center_x + radius * theta.cos() - width / 2.0).round() as i32;
        let y = (center_y + radius * theta.sin() - height / 2.0).round() as i32;
        if occupancy.is_free(x, y, bbox.0, bbox.1) {
            return Some((x, y));
        }

        theta += (SPIRAL_STEP_PX / radius.max(SPIRAL_STEP_PX)).min(0.5);
    }
}

/// Filled cells of a coarse grid over the canvas
struct Occupancy {
    size: (u32, u32),
    cols: usize,
    rows: usize,
    filled: Vec<bool>,
    // Summed-area table, (rows + 1) x (cols + 1)
    sums: Vec<u32>,
}

impl Occupancy {
    fn new(size: (u32, u32)) -> Self {
        let cols = size.0.div_ceil(CELL) as usize;
        let rows = size.1.div_ceil(CELL) as usize;
        Self {
            size,
            cols,
            rows,
            filled: vec![false; cols * rows],
            sums: vec![0; (cols + 1) * (rows + 1)],
        }
    }

    // Cell span [start, end) covering pixels [from, from + len)
    fn span(from: i32, len: u32, limit: usize) -> (usize, usize) {
        let start = (from.max(0) as u32 / CELL) as usize;
        let end = ((from.max(0) as u32 + len).div_ceil(CELL) as usize).min(limit);
        (start.min(limit), end)
    }

    fn is_free(&self, x: i32, y: i32, width: u32, height: u32) -> bool {
        if x < 0 || y < 0 || x as u32 + width > self.size.0 || y as u32 + height > self.size.1 {
            return false;
        }

        let (c0, c1) = Self::span(x, width, self.cols);
        let (r0, r1) = Self::span(y, height, self.rows);
        let stride = self.cols + 1;
        let total = self.sums[r1 * stride + c1] + self.sums[r0 * stride + c0]
            - self.sums[r0 * stride + c1]
            - self.sums[r1 * stride + c0];
        total == 0
    }

    fn mark(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let (c0, c1) = Self::span(x, width, self.cols);
        let (r0, r1) = Self::span(y, height, self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                self.filled[row * self.cols + col] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = self.cols + 1;
        for row in 0..self.rows {
            let mut row_sum = 0;
            for col in 0..self.cols {
                row_sum += u32::from(self.filled[row * self.cols + col]);
                self.sums[(row + 1) * stride + col + 1] = self.sums[row * stride + col + 1] + row_sum;
            }
        }
    }
}

/// Cloud of `party`'s vocabulary on white, blues for the receiver and greens for the sender.
///
/// Placement is random, so two renders of the same table differ. A party with
/// no usable words gets a blank canvas.
pub fn render(table: &MessageTable, party: Party, nlp: &NlpProcessor) -> Result<Figure> {
    let frequencies = nlp.word_frequencies(table.by_party(party).map(|record| record.text.as_str()));
    let words = cloud_words(&frequencies);
    debug!(%party, distinct = frequencies.len(), drawn = words.len(), "Building word cloud");

    let palette = match party {
        Party::Receiver => ColorMap::BLUES_R,
        Party::Sender => ColorMap::GREENS_R,
    };
    let mut rng = rand::thread_rng();

    draw_figure(SIZE, WHITE, |root| {
        if words.is_empty() {
            return Ok(());
        }

        let placements = layout(&words, SIZE, &mut rng, |text, size| {
            Ok(root.estimate_text_size(text, &font(size, &BLACK))?)
        })?;

        for placement in &placements {
            let color = palette.sample(rng.gen_range(0.0..COLOR_SPAN));
            let style = font(placement.font_size, &color);
            match placement.orientation {
                Orientation::Horizontal => root.draw_text(&placement.text, &style, (placement.x, placement.y))?,
                Orientation::Vertical => root.draw_text(
                    &placement.text,
                    &style.transform(FontTransform::Rotate90),
                    (placement.x + placement.width as i32, placement.y),
                )?,
            }
        }

        Ok(())
    })
}
