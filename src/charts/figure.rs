//! In-memory figure buffers, font registration and shared drawing helpers.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::{ColorType, ImageFormat};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontStyle};
use tracing::{debug, info};

use super::style::ChartStyle;
use crate::error::{Result, TxtStatsError};

/// Family name every chart requests its text in
pub(crate) const FONT_FAMILY: &str = "sans-serif";

/// Locations searched when no font is configured
const FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Verdana.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static INSTALLED_FONT: OnceLock<PathBuf> = OnceLock::new();

pub(crate) type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
pub(crate) type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// A rendered chart: packed RGB pixels, row major
#[derive(Debug, Clone)]
pub struct Figure {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Figure {
    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at (`x`, `y`), if inside the figure
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 3) as usize;
        self.pixels
            .get(offset..offset + 3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
    }

    /// Encode as PNG at `path`
    pub fn save_png(&self, path: &Path) -> Result<()> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.width,
            self.height,
            ColorType::Rgb8,
            ImageFormat::Png,
        )?;
        Ok(())
    }
}

/// Allocate a `size` figure filled with `background` and hand its root area to `draw`
pub(crate) fn draw_figure<F>(size: (u32, u32), background: RGBColor, draw: F) -> Result<Figure>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let (width, height) = size;
    let mut pixels = vec![0_u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
        root.fill(&background)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(Figure { width, height, pixels })
}

/// Register a TrueType font for chart text, once per process.
///
/// Uses `configured` when given, otherwise the first existing entry of a
/// fixed list of system font locations.
pub fn install_font(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = INSTALLED_FONT.get() {
        return Ok(path.clone());
    }

    let path = resolve_font_path(configured)?;
    // Registered fonts must outlive every chart
    let bytes: &'static [u8] = Box::leak(std::fs::read(&path)?.into_boxed_slice());

    for style in [FontStyle::Normal, FontStyle::Bold] {
        register_font(FONT_FAMILY, style, bytes)
            .map_err(|_| TxtStatsError::Font(format!("{} is not a usable TrueType font", path.display())))?;
    }

    info!("Using chart font {}", path.display());
    Ok(INSTALLED_FONT.get_or_init(|| path).clone())
}

/// Font file that `install_font` would load
pub fn resolve_font_path(configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(TxtStatsError::Font(format!("Configured font not found: {}", path.display())))
        };
    }

    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| {
            debug!("Looking for chart font at {}", candidate.display());
            candidate.is_file()
        })
        .ok_or_else(|| {
            TxtStatsError::Font("No TrueType font found; set charts.font_path in the configuration".to_string())
        })
}

/// Text style in the chart font
pub(crate) fn font(size: u32, color: &RGBColor) -> TextStyle<'static> {
    (FONT_FAMILY, size).into_font().color(color)
}

/// Draw centered title `lines` across the top of `root` and return the area below them
pub(crate) fn titled<'a>(root: &Canvas<'a>, lines: &[&str], style: &ChartStyle) -> Result<Canvas<'a>> {
    const TOP: i32 = 16;
    const LINE_HEIGHT: i32 = 36;

    let (width, _) = root.dim_in_pixel();
    let text = font(28, &style.foreground).pos(Pos::new(HPos::Center, VPos::Top));

    let mut y = TOP;
    for line in lines {
        root.draw_text(line, &text, ((width / 2) as i32, y))?;
        y += LINE_HEIGHT;
    }

    let (_, body) = root.split_vertically(y + 8);
    Ok(body)
}

/// Axis configuration for [`draw_axes`]
pub(crate) struct Axes<'l> {
    pub(crate) x_desc: Option<&'l str>,
    pub(crate) y_desc: Option<&'l str>,
    pub(crate) x_labels: usize,
    pub(crate) y_labels: usize,
    pub(crate) x_format: &'l dyn Fn(&f64) -> String,
    pub(crate) y_format: &'l dyn Fn(&f64) -> String,
    /// Draw vertical grid lines as well as horizontal ones
    pub(crate) x_grid: bool,
    /// Draw horizontal grid lines even when the style has no grid
    pub(crate) y_grid: bool,
}

const FALLBACK_GRID_ALPHA: f64 = 0.2;

/// Fill the plot area and draw axes, tick labels and grid in `style`
pub(crate) fn draw_axes(chart: &mut Chart<'_, '_>, style: &ChartStyle, axes: &Axes<'_>) -> Result<()> {
    chart.plotting_area().fill(&style.plot_background)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(axes.x_labels)
        .y_labels(axes.y_labels)
        .x_label_formatter(axes.x_format)
        .y_label_formatter(axes.y_format)
        .axis_style(&style.foreground)
        .label_style(font(15, &style.foreground))
        .axis_desc_style(font(18, &style.foreground));

    if let Some(desc) = axes.x_desc {
        mesh.x_desc(desc);
    }
    if let Some(desc) = axes.y_desc {
        mesh.y_desc(desc);
    }

    match style.grid {
        Some(grid) => {
            mesh.bold_line_style(&grid).light_line_style(&TRANSPARENT);
            if !axes.x_grid {
                mesh.disable_x_mesh();
            }
        }
        None if axes.y_grid => {
            mesh.bold_line_style(style.foreground.mix(FALLBACK_GRID_ALPHA))
                .light_line_style(&TRANSPARENT)
                .disable_x_mesh();
        }
        None => {
            mesh.disable_mesh();
        }
    }

    mesh.draw()?;
    Ok(())
}

/// Draw the series legend in the upper right corner
pub(crate) fn draw_legend<'a>(chart: &mut Chart<'a, 'a>, style: &ChartStyle) -> Result<()> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&style.plot_background.mix(0.85))
        .border_style(&style.foreground)
        .label_font(font(18, &style.foreground))
        .draw()?;
    Ok(())
}

/// Integer tick labels
pub(crate) fn integer_tick(value: &f64) -> String {
    format!("{value:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_figure_has_background() {
        let figure = draw_figure((40, 30), RGBColor(10, 20, 30), |_| Ok(())).expect("draw");
        assert_eq!(figure.width(), 40);
        assert_eq!(figure.height(), 30);
        assert_eq!(figure.pixels().len(), 40 * 30 * 3);
        assert_eq!(figure.pixel(0, 0), Some([10, 20, 30]));
        assert_eq!(figure.pixel(39, 29), Some([10, 20, 30]));
        assert_eq!(figure.pixel(40, 0), None);
    }

    #[test]
    fn test_missing_configured_font_rejected() {
        let err = resolve_font_path(Some(Path::new("/nonexistent/font.ttf"))).expect_err("missing font");
        assert!(matches!(err, TxtStatsError::Font(_)));
    }

    #[test]
    fn test_saved_png_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blank.png");
        let figure = draw_figure((8, 6), RGBColor(255, 255, 255), |_| Ok(())).expect("draw");
        figure.save_png(&path).expect("save");

        let decoded = image::open(&path).expect("decode").to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(3, 3).0, [255, 255, 255]);
    }

    fn axes_only(y_grid: bool) -> Result<Figure> {
        draw_figure((300, 200), WHITE, |root| {
            let mut chart = ChartBuilder::on(root)
                .margin(10)
                .x_label_area_size(30)
                .y_label_area_size(40)
                .build_cartesian_2d(0.0..1.0_f64, 0.0..10.0_f64)?;
            draw_axes(
                &mut chart,
                &ChartStyle::default(),
                &Axes {
                    x_desc: None,
                    y_desc: None,
                    x_labels: 2,
                    y_labels: 5,
                    x_format: &integer_tick,
                    y_format: &integer_tick,
                    x_grid: false,
                    y_grid,
                },
            )
        })
    }

    #[test]
    fn test_gridless_style_gets_requested_y_grid() {
        if install_font(None).is_err() {
            return;
        }
        let inked = |figure: &Figure| figure.pixels().chunks(3).filter(|px| *px != [255_u8, 255, 255]).count();

        let plain = axes_only(false).expect("draw without grid");
        let gridded = axes_only(true).expect("draw with grid");
        assert!(inked(&gridded) > inked(&plain));
    }
}
