//! Binning and kernel density estimation for the distribution charts.

use std::f64::consts::PI;

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges, ascending
    pub edges: Vec<f64>,
    /// Values per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Total number of binned values
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Largest bin count
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left, right, count)` for every bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    /// Leftmost and rightmost edge
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(1.0),
        )
    }
}

/// Bin `values` into `bins` equal-width bins spanning their own range.
///
/// Empty input spans [0, 1]; a single distinct value is widened by 0.5 on
/// each side. Bins are half-open except the last, which includes the maximum.
#[must_use]
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);

    let (mut low, mut high) = if values.is_empty() {
        (0.0, 1.0)
    } else {
        values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    };
    if high <= low {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| low + width * i as f64).collect();

    let mut counts = vec![0; bins];
    for &value in values {
        let bin = (((value - low) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Histogram { edges, counts }
}

/// `n` evenly spaced points from `start` to `end` inclusive
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample covariance (n - 1 denominator); `None` below two values
#[must_use]
pub fn covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (mx, my) = (mean(xs), mean(ys));
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    Some(sum / (n - 1) as f64)
}

/// Scott's rule bandwidth factor for `n` points in `dims` dimensions
#[must_use]
pub fn scott_factor(n: usize, dims: u32) -> f64 {
    (n as f64).powf(-1.0 / f64::from(dims + 4))
}

/// One-dimensional Gaussian KDE with Scott's rule bandwidth.
///
/// `None` when fewer than two values are given or they have no spread.
#[must_use]
pub fn gaussian_kde(values: &[f64], grid: &[f64]) -> Option<Vec<f64>> {
    let variance = covariance(values, values)?;
    if variance <= f64::EPSILON {
        return None;
    }

    let bandwidth = variance.sqrt() * scott_factor(values.len(), 1);
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * PI).sqrt());

    Some(
        grid.iter()
            .map(|&x| {
                norm * values
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum::<f64>()
            })
            .collect(),
    )
}

/// Two-dimensional Gaussian KDE with a full bandwidth matrix (Scott's rule)
#[derive(Debug, Clone)]
pub struct Kde2d {
    xs: Vec<f64>,
    ys: Vec<f64>,
    // Inverse of the kernel covariance matrix, [[a, b], [b, c]]
    inv: [f64; 3],
    norm: f64,
}

impl Kde2d {
    /// Fit to paired samples; `None` for fewer than two pairs or a singular covariance
    #[must_use]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len().min(ys.len());
        let (xs, ys) = (&xs[..n], &ys[..n]);

        let factor_sq = scott_factor(n, 2).powi(2);
        let sxx = covariance(xs, xs)? * factor_sq;
        let syy = covariance(ys, ys)? * factor_sq;
        let sxy = covariance(xs, ys)? * factor_sq;

        if sxx <= f64::EPSILON || syy <= f64::EPSILON {
            return None;
        }
        // Perfectly correlated samples leave no area to spread over
        let det = sxx * syy - sxy * sxy;
        if det <= 1e-12 * sxx * syy {
            return None;
        }

        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            inv: [syy / det, -sxy / det, sxx / det],
            norm: 1.0 / (2.0 * PI * det.sqrt() * n as f64),
        })
    }

    /// Estimated density at (`x`, `y`)
    #[must_use]
    pub fn density(&self, x: f64, y: f64) -> f64 {
        let [a, b, c] = self.inv;
        self.norm
            * self
                .xs
                .iter()
                .zip(&self.ys)
                .map(|(xi, yi)| {
                    let (dx, dy) = (x - xi, y - yi);
                    (-0.5 * (a * dx * dx + 2.0 * b * dx * dy + c * dy * dy)).exp()
                })
                .sum::<f64>()
    }
}
