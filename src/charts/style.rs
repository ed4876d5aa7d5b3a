//! Named visual styles and sequential color maps.

use std::fmt;
use std::str::FromStr;

use plotters::style::RGBColor;

use crate::error::{Result, TxtStatsError};

/// Colors applied to every chart of a run.
///
/// Parsed once from the style name given on the command line and passed to
/// each rendering routine.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    name: &'static str,
    /// Figure background
    pub background: RGBColor,
    /// Plot area background
    pub plot_background: RGBColor,
    /// Text, axes and borders
    pub foreground: RGBColor,
    /// Grid line color, `None` for no grid
    pub grid: Option<RGBColor>,
    /// Receiver and sender series colors
    pub palette: [RGBColor; 2],
}

impl ChartStyle {
    /// Style name as given on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Every recognized style
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &STYLES
    }

    /// Comma-separated list of recognized style names
    #[must_use]
    pub fn available() -> String {
        STYLES.iter().map(|s| s.name).collect::<Vec<_>>().join(", ")
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        STYLES[0]
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl FromStr for ChartStyle {
    type Err = TxtStatsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        // Newer plotting libraries prefix the seaborn styles with their version
        let wanted = wanted.replacen("seaborn-v0_8", "seaborn", 1);

        STYLES
            .iter()
            .find(|style| style.name == wanted)
            .copied()
            .ok_or_else(|| TxtStatsError::InvalidStyle {
                name: s.to_string(),
                available: Self::available(),
            })
    }
}

const WHITE: RGBColor = RGBColor(255, 255, 255);
const BLACK: RGBColor = RGBColor(0, 0, 0);

const SEABORN_PALETTE: [RGBColor; 2] = [RGBColor(76, 114, 176), RGBColor(85, 168, 104)];

static STYLES: [ChartStyle; 10] = [
    ChartStyle {
        name: "default",
        background: WHITE,
        plot_background: WHITE,
        foreground: BLACK,
        grid: None,
        palette: [RGBColor(31, 119, 180), RGBColor(255, 127, 14)],
    },
    ChartStyle {
        name: "classic",
        background: RGBColor(191, 191, 191),
        plot_background: WHITE,
        foreground: BLACK,
        grid: None,
        palette: [RGBColor(0, 0, 255), RGBColor(0, 128, 0)],
    },
    ChartStyle {
        name: "ggplot",
        background: WHITE,
        plot_background: RGBColor(229, 229, 229),
        foreground: RGBColor(85, 85, 85),
        grid: Some(WHITE),
        palette: [RGBColor(226, 74, 51), RGBColor(52, 138, 189)],
    },
    ChartStyle {
        name: "bmh",
        background: WHITE,
        plot_background: RGBColor(238, 238, 238),
        foreground: RGBColor(51, 51, 51),
        grid: Some(RGBColor(178, 178, 178)),
        palette: [RGBColor(52, 138, 189), RGBColor(166, 6, 40)],
    },
    ChartStyle {
        name: "fivethirtyeight",
        background: RGBColor(240, 240, 240),
        plot_background: RGBColor(240, 240, 240),
        foreground: RGBColor(60, 60, 60),
        grid: Some(RGBColor(203, 203, 203)),
        palette: [RGBColor(0, 143, 213), RGBColor(252, 79, 48)],
    },
    ChartStyle {
        name: "grayscale",
        background: WHITE,
        plot_background: WHITE,
        foreground: BLACK,
        grid: None,
        palette: [RGBColor(0, 0, 0), RGBColor(102, 102, 102)],
    },
    ChartStyle {
        name: "dark_background",
        background: BLACK,
        plot_background: BLACK,
        foreground: WHITE,
        grid: None,
        palette: [RGBColor(141, 211, 199), RGBColor(254, 255, 179)],
    },
    ChartStyle {
        name: "seaborn",
        background: WHITE,
        plot_background: RGBColor(234, 234, 242),
        foreground: RGBColor(38, 38, 38),
        grid: Some(WHITE),
        palette: SEABORN_PALETTE,
    },
    ChartStyle {
        name: "seaborn-darkgrid",
        background: WHITE,
        plot_background: RGBColor(234, 234, 242),
        foreground: RGBColor(38, 38, 38),
        grid: Some(WHITE),
        palette: SEABORN_PALETTE,
    },
    ChartStyle {
        name: "seaborn-whitegrid",
        background: WHITE,
        plot_background: WHITE,
        foreground: RGBColor(38, 38, 38),
        grid: Some(RGBColor(204, 204, 204)),
        palette: SEABORN_PALETTE,
    },
];

/// Sequential color map, light to dark
#[derive(Debug, Clone, Copy)]
pub struct ColorMap {
    stops: &'static [(u8, u8, u8)],
    reversed: bool,
}

impl ColorMap {
    /// Light purple to deep purple
    pub const PURPLES: Self = Self {
        stops: &[
            (252, 251, 253),
            (239, 237, 245),
            (218, 218, 235),
            (188, 189, 220),
            (158, 154, 200),
            (128, 125, 186),
            (106, 81, 163),
            (84, 39, 143),
            (63, 0, 125),
        ],
        reversed: false,
    };

    /// Dark blue to near white
    pub const BLUES_R: Self = Self {
        stops: &[
            (247, 251, 255),
            (222, 235, 247),
            (198, 219, 239),
            (158, 202, 225),
            (107, 174, 214),
            (66, 146, 198),
            (33, 113, 181),
            (8, 81, 156),
            (8, 48, 107),
        ],
        reversed: true,
    };

    /// Dark green to near white
    pub const GREENS_R: Self = Self {
        stops: &[
            (247, 252, 245),
            (229, 245, 224),
            (199, 233, 192),
            (161, 217, 155),
            (116, 196, 118),
            (65, 171, 93),
            (35, 139, 69),
            (0, 109, 44),
            (0, 68, 27),
        ],
        reversed: true,
    };

    /// Color at position `t` in [0, 1]
    #[must_use]
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if self.reversed { 1.0 - t } else { t }.clamp(0.0, 1.0);
        let last = self.stops.len() - 1;
        let scaled = t * last as f64;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let frac = scaled - lower as f64;

        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
        let (a, b) = (self.stops[lower], self.stops[upper]);
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }
}
