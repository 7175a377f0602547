use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Rgb, RgbImage};

use crate::math::matrix::Matrix;
use crate::plot::colormap::Colormap;
use crate::plot::surface::Surface;
use crate::plot::text::{draw_text, text_width, GLYPH_SIZE};

/// 7 × 5.5 inches at 140 dpi.
pub const DEFAULT_WIDTH: u32 = 980;
pub const DEFAULT_HEIGHT: u32 = 770;

/// Scatter marker radius in pixels (a 6 pt diameter marker at 140 dpi).
pub const MARKER_RADIUS: f64 = 5.8;

/// Canvas width that gets unscaled 8 px text; wider figures scale it up.
const TEXT_REFERENCE_WIDTH: u32 = 490;
const TICK_LENGTH: u32 = 4;
const LEGEND_PAD: u32 = 6;
const COLORBAR_TICKS: usize = 5;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    fn fraction_of(width: u32, height: u32, left: f64, bottom: f64, right: f64, top: f64) -> PixelRect {
        let x0 = (left * width as f64).round() as u32;
        let x1 = (right * width as f64).round() as u32;
        // Figure fractions count from the bottom, pixel rows from the top.
        let y0 = ((1.0 - top) * height as f64).round() as u32;
        let y1 = ((1.0 - bottom) * height as f64).round() as u32;
        PixelRect { x0, y0, width: x1 - x0, height: y1 - y0 }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x0 as i64
            && y >= self.y0 as i64
            && x < (self.x0 + self.width) as i64
            && y < (self.y0 + self.height) as i64
    }
}

/// A raster figure with one set of axes over a fixed data domain and an
/// optional colorbar slot to its right.
///
/// Pixels drawn so far live on the canvas. The frame, ticks, title, legend
/// and colorbar labels are added by `render`.
#[derive(Debug, Clone)]
pub struct Figure {
    canvas: RgbImage,
    axes: PixelRect,
    colorbar: Option<PixelRect>,
    colorbar_range: Option<(f64, f64)>,
    x_range: (f64, f64),
    y_range: (f64, f64),
    title: Option<String>,
    legend: Vec<(String, Rgb<u8>)>,
}

impl Figure {
    /// Figure whose axes span the usual plotting area.
    pub fn new(width: u32, height: u32, x_range: (f64, f64), y_range: (f64, f64)) -> Figure {
        Figure {
            canvas: RgbImage::from_pixel(width, height, WHITE),
            axes: PixelRect::fraction_of(width, height, 0.125, 0.11, 0.9, 0.88),
            colorbar: None,
            colorbar_range: None,
            x_range,
            y_range,
            title: None,
            legend: Vec::new(),
        }
    }

    /// Figure with room on the right for `colorbar`.
    pub fn with_colorbar(width: u32, height: u32, x_range: (f64, f64), y_range: (f64, f64)) -> Figure {
        Figure {
            canvas: RgbImage::from_pixel(width, height, WHITE),
            axes: PixelRect::fraction_of(width, height, 0.125, 0.11, 0.775, 0.88),
            colorbar: Some(PixelRect::fraction_of(width, height, 0.8, 0.11, 0.83, 0.88)),
            colorbar_range: None,
            x_range,
            y_range,
            title: None,
            legend: Vec::new(),
        }
    }

    pub fn axes(&self) -> PixelRect {
        self.axes
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Adds a row to the legend box in the top-left corner of the axes.
    pub fn legend_entry(&mut self, label: &str, color: Rgb<u8>) {
        self.legend.push((label.to_string(), color));
    }

    /// Data coordinates to (fractional) canvas pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let fy = (y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        (
            self.axes.x0 as f64 + fx * self.axes.width as f64,
            self.axes.y0 as f64 + (1.0 - fy) * self.axes.height as f64,
        )
    }

    /// Stretches an `n × n` lattice (row 0 at the bottom) over the whole axes
    /// with bicubic interpolation, colouring values from `[vmin, vmax]`.
    pub fn draw_lattice(&mut self, lattice: &[f64], n: usize, colormap: &Colormap, vmin: f64, vmax: f64) -> Result<()> {
        assert_eq!(lattice.len(), n * n, "lattice does not have {}x{} values", n, n);

        // Image rows run top to bottom, so flip the lattice vertically.
        let mut flipped = Vec::with_capacity(n * n);
        for row in (0..n).rev() {
            flipped.extend(
                lattice[row * n..(row + 1) * n]
                    .iter()
                    .map(|&v| ((v - vmin) / (vmax - vmin)) as f32),
            );
        }
        let small: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(n as u32, n as u32, flipped)
                .context("lattice buffer has the wrong size")?;
        let smooth = imageops::resize(&small, self.axes.width, self.axes.height, FilterType::CatmullRom);

        for (x, y, value) in smooth.enumerate_pixels() {
            let color = colormap.sample(value[0] as f64);
            self.canvas.put_pixel(self.axes.x0 + x, self.axes.y0 + y, color);
        }
        Ok(())
    }

    /// Draws every row of `points` as a filled disc, alpha-blended and
    /// clipped to the axes.
    pub fn scatter(&mut self, points: &Matrix, color: Rgb<u8>, alpha: f64) {
        for point in points.row_iter() {
            self.disc(point[0], point[1], color, alpha);
        }
    }

    /// Like `scatter`, with each point coloured by `colormap(value)`.
    /// Values are min-max scaled first.
    pub fn scatter_by_value(&mut self, points: &Matrix, values: &[f64], colormap: &Colormap, alpha: f64) {
        assert_eq!(points.rows, values.len(), "one colour value per point");
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if hi > lo { hi - lo } else { 1.0 };
        for (point, &v) in points.row_iter().zip(values) {
            self.disc(point[0], point[1], colormap.sample((v - lo) / span), alpha);
        }
    }

    /// Fills the colorbar slot with the surface's colour ramp, `vmax` on top,
    /// and labels it from `vmin` to `vmax`.
    ///
    /// # Panics
    /// Panics if the figure was built without a colorbar slot.
    pub fn colorbar(&mut self, surface: &Surface) {
        let slot = self
            .colorbar
            .expect("colorbar needs a figure built with Figure::with_colorbar");
        let steps = slot.height.saturating_sub(1).max(1) as f64;
        for dy in 0..slot.height {
            let t = 1.0 - dy as f64 / steps;
            let color = surface.colormap.sample(t);
            for dx in 0..slot.width {
                self.canvas.put_pixel(slot.x0 + dx, slot.y0 + dy, color);
            }
        }
        self.colorbar_range = Some((surface.vmin, surface.vmax));
    }

    /// The canvas with frames, ticks and text drawn on top.
    pub fn render(&self) -> RgbImage {
        let mut out = self.canvas.clone();
        let scale = self.text_scale();

        frame(&mut out, self.axes);
        self.axis_ticks(&mut out, scale);
        if let Some(slot) = self.colorbar {
            frame(&mut out, slot);
            if let Some((vmin, vmax)) = self.colorbar_range {
                colorbar_ticks(&mut out, slot, vmin, vmax, scale);
            }
        }
        if let Some(title) = &self.title {
            let centre = self.axes.x0 as i64 + self.axes.width as i64 / 2;
            let x = centre - text_width(title, scale) as i64 / 2;
            let y = self.axes.y0 as i64 - ((GLYPH_SIZE + 2 * LEGEND_PAD) * scale) as i64;
            draw_text(&mut out, x, y, title, scale, BLACK);
        }
        self.draw_legend(&mut out, scale);
        out
    }

    /// Writes the rendered figure; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory '{}'", dir.display()))?;
        }
        self.render()
            .save(path)
            .with_context(|| format!("writing figure '{}'", path.display()))?;
        tracing::info!("Saved figure '{}'", path.display());
        Ok(())
    }

    /// Where the colour swatch of legend row `index` goes.
    pub(crate) fn legend_swatch(&self, index: usize) -> PixelRect {
        let scale = self.text_scale();
        let glyph = GLYPH_SIZE * scale;
        let inset = 2 * LEGEND_PAD * scale;
        PixelRect {
            x0: self.axes.x0 + inset,
            y0: self.axes.y0 + inset + index as u32 * (glyph + TICK_LENGTH * scale),
            width: glyph,
            height: glyph,
        }
    }

    fn text_scale(&self) -> u32 {
        (self.canvas.width() / TEXT_REFERENCE_WIDTH).max(1)
    }

    /// Tick marks and labels at every integer inside the data domain.
    fn axis_ticks(&self, img: &mut RgbImage, scale: u32) {
        let tick = (TICK_LENGTH * scale) as i64;
        let glyph = (GLYPH_SIZE * scale) as i64;
        let bottom = (self.axes.y0 + self.axes.height) as i64;
        let left = self.axes.x0 as i64;

        for v in integer_ticks(self.x_range) {
            let px = self.to_pixel(v as f64, self.y_range.0).0.round() as i64;
            for y in bottom..=bottom + tick {
                put(img, px, y, BLACK);
            }
            let label = v.to_string();
            let x = px - text_width(&label, scale) as i64 / 2;
            draw_text(img, x, bottom + tick + 2 * scale as i64, &label, scale, BLACK);
        }
        for v in integer_ticks(self.y_range) {
            let py = self.to_pixel(self.x_range.0, v as f64).1.round() as i64;
            for x in left - tick..=left {
                put(img, x, py, BLACK);
            }
            let label = v.to_string();
            let x = left - tick - 2 * scale as i64 - text_width(&label, scale) as i64;
            draw_text(img, x, py - glyph / 2, &label, scale, BLACK);
        }
    }

    fn draw_legend(&self, img: &mut RgbImage, scale: u32) {
        if self.legend.is_empty() {
            return;
        }
        let last = self.legend.len() - 1;
        let pad = LEGEND_PAD * scale;
        let label_width = self
            .legend
            .iter()
            .map(|(label, _)| text_width(label, scale))
            .max()
            .unwrap_or(0);
        let first = self.legend_swatch(0);
        let bottom = self.legend_swatch(last);
        let outline = PixelRect {
            x0: first.x0 - pad,
            y0: first.y0 - pad,
            width: pad + first.width + pad + label_width + pad,
            height: bottom.y0 + bottom.height + pad - (first.y0 - pad),
        };
        fill(img, outline, WHITE);
        frame(img, outline);

        for (i, (label, color)) in self.legend.iter().enumerate() {
            let swatch = self.legend_swatch(i);
            fill(img, swatch, *color);
            let x = (swatch.x0 + swatch.width + pad) as i64;
            draw_text(img, x, swatch.y0 as i64, label, scale, BLACK);
        }
    }

    fn disc(&mut self, x: f64, y: f64, color: Rgb<u8>, alpha: f64) {
        let (cx, cy) = self.to_pixel(x, y);
        let r = MARKER_RADIUS;
        let (x_lo, x_hi) = ((cx - r).floor() as i64, (cx + r).ceil() as i64);
        let (y_lo, y_hi) = ((cy - r).floor() as i64, (cy + r).ceil() as i64);

        for py in y_lo..=y_hi {
            for px in x_lo..=x_hi {
                if !self.axes.contains(px, py) {
                    continue;
                }
                let (dx, dy) = (px as f64 + 0.5 - cx, py as f64 + 0.5 - cy);
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let pixel = self.canvas.get_pixel_mut(px as u32, py as u32);
                *pixel = blend(*pixel, color, alpha);
            }
        }
    }
}

fn blend(under: Rgb<u8>, over: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let mix = |u: u8, o: u8| (o as f64 * alpha + u as f64 * (1.0 - alpha)).round() as u8;
    Rgb([mix(under[0], over[0]), mix(under[1], over[1]), mix(under[2], over[2])])
}

/// Integers in `[lo, hi]`.
fn integer_ticks((lo, hi): (f64, f64)) -> impl Iterator<Item = i64> {
    lo.ceil() as i64..=hi.floor() as i64
}

/// Evenly spaced ticks down the right edge of the colorbar slot.
fn colorbar_ticks(img: &mut RgbImage, slot: PixelRect, vmin: f64, vmax: f64, scale: u32) {
    let tick = (TICK_LENGTH * scale) as i64;
    let glyph = (GLYPH_SIZE * scale) as i64;
    let right = (slot.x0 + slot.width) as i64;
    let span = slot.height.saturating_sub(1) as f64;

    for k in 0..=COLORBAR_TICKS {
        let f = k as f64 / COLORBAR_TICKS as f64;
        let py = slot.y0 as i64 + ((1.0 - f) * span).round() as i64;
        for x in right..=right + tick {
            put(img, x, py, BLACK);
        }
        let label = format!("{:.1}", vmin + f * (vmax - vmin));
        draw_text(img, right + tick + 2 * scale as i64, py - glyph / 2, &label, scale, BLACK);
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && x < img.width() as i64 && y < img.height() as i64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill(img: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
    for y in rect.y0..rect.y0 + rect.height {
        for x in rect.x0..rect.x0 + rect.width {
            put(img, x as i64, y as i64, color);
        }
    }
}

fn frame(img: &mut RgbImage, rect: PixelRect) {
    let (x1, y1) = (rect.x0 + rect.width, rect.y0 + rect.height);
    let (w, h) = img.dimensions();
    for x in rect.x0..=x1.min(w - 1) {
        img.put_pixel(x, rect.y0, BLACK);
        img.put_pixel(x, y1.min(h - 1), BLACK);
    }
    for y in rect.y0..=y1.min(h - 1) {
        img.put_pixel(rect.x0, y, BLACK);
        img.put_pixel(x1.min(w - 1), y, BLACK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::colormap::hex;

    fn figure() -> Figure {
        Figure::with_colorbar(DEFAULT_WIDTH, DEFAULT_HEIGHT, (-3.5, 3.5), (-2.5, 2.5))
    }

    #[test]
    fn domain_corners_map_to_axes_corners() {
        let fig = figure();
        let axes = fig.axes();
        assert_eq!(fig.to_pixel(-3.5, 2.5), (axes.x0 as f64, axes.y0 as f64));
        assert_eq!(
            fig.to_pixel(3.5, -2.5),
            ((axes.x0 + axes.width) as f64, (axes.y0 + axes.height) as f64)
        );
    }

    #[test]
    fn opaque_marker_paints_its_centre() {
        let mut fig = figure();
        let red = hex(0xff0000);
        fig.scatter(&Matrix::from_rows(vec![vec![0.0, 0.0]]), red, 1.0);
        let (cx, cy) = fig.to_pixel(0.0, 0.0);
        assert_eq!(*fig.render().get_pixel(cx as u32, cy as u32), red);
    }

    #[test]
    fn markers_outside_the_domain_are_clipped() {
        let mut fig = figure();
        let before = fig.render();
        fig.scatter(&Matrix::from_rows(vec![vec![50.0, 50.0]]), hex(0xff0000), 1.0);
        assert_eq!(fig.render(), before);
    }

    fn has_ink(img: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .any(|(x, y)| *img.get_pixel(x, y) == BLACK)
    }

    #[test]
    fn title_goes_above_the_axes() {
        let mut fig = figure();
        let axes = fig.axes();
        let above = axes.x0..axes.x0 + axes.width;
        assert!(!has_ink(&fig.render(), above.clone(), 0..axes.y0));

        fig.set_title("Class Probability, Deterministic Model");
        assert!(has_ink(&fig.render(), above, 0..axes.y0));
    }

    #[test]
    fn integer_ticks_mark_the_axes() {
        let fig = figure();
        let img = fig.render();
        let bottom = fig.axes().y0 + fig.axes().height;
        let at_zero = fig.to_pixel(0.0, 0.0).0.round() as u32;
        let between = fig.to_pixel(0.5, 0.0).0.round() as u32;
        assert_eq!(*img.get_pixel(at_zero, bottom + 2), BLACK);
        assert_eq!(*img.get_pixel(between, bottom + 2), WHITE);
        // Labels sit below the tick marks.
        assert!(has_ink(&img, at_zero - 8..at_zero + 8, bottom + 6..img.height()));
    }

    #[test]
    fn colorbar_is_labelled() {
        let mut fig = figure();
        let slot = fig.colorbar.unwrap();
        let right = slot.x0 + slot.width;
        let beside = right + 1..DEFAULT_WIDTH;
        assert!(!has_ink(&fig.render(), beside.clone(), 0..DEFAULT_HEIGHT));

        let surface = Surface {
            values: vec![0.0; 4],
            n_grid: 2,
            colormap: Colormap::Viridis,
            vmin: 0.0,
            vmax: 1.0,
        };
        fig.colorbar(&surface);
        let img = fig.render();
        assert!(has_ink(&img, beside, 0..DEFAULT_HEIGHT));
        // Ticks at both ends of the ramp.
        assert_eq!(*img.get_pixel(right + 2, slot.y0), BLACK);
        assert_eq!(*img.get_pixel(right + 2, slot.y0 + slot.height - 1), BLACK);
        let below_top = 1.0 - 1.0 / (slot.height - 1) as f64;
        assert_eq!(*img.get_pixel(slot.x0 + slot.width / 2, slot.y0 + 1), Colormap::Viridis.sample(below_top));
    }

    #[test]
    fn legend_shows_each_colour() {
        let mut fig = Figure::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, (-3.5, 3.5), (-2.5, 2.5));
        let colours = [hex(0x377eb8), hex(0xff7f00), hex(0xff0000)];
        for (label, colour) in ["Positive", "Negative", "Out-of-Domain"].iter().zip(colours) {
            fig.legend_entry(label, colour);
        }
        let img = fig.render();
        for (i, colour) in colours.iter().enumerate() {
            let swatch = fig.legend_swatch(i);
            let centre = img.get_pixel(swatch.x0 + swatch.width / 2, swatch.y0 + swatch.height / 2);
            assert_eq!(centre, colour);
        }
        let last = fig.legend_swatch(2);
        assert!(last.y0 > fig.legend_swatch(1).y0 + fig.legend_swatch(1).height);
    }

    #[test]
    fn translucent_marker_blends() {
        assert_eq!(blend(Rgb([255, 255, 255]), Rgb([255, 0, 0]), 0.5), Rgb([255, 128, 128]));
    }

    #[test]
    fn constant_lattice_fills_axes_with_one_colour() {
        let mut fig = figure();
        let cmap = Colormap::Viridis;
        fig.draw_lattice(&vec![1.0; 16], 4, &cmap, 0.0, 1.0).unwrap();
        let img = fig.render();
        let axes = fig.axes();
        let inner = img.get_pixel(axes.x0 + axes.width / 2, axes.y0 + axes.height / 2);
        assert_eq!(*inner, cmap.sample(1.0));
    }

    #[test]
    fn lattice_row_zero_is_drawn_at_the_bottom() {
        let mut fig = figure();
        let cmap = Colormap::Viridis;
        // Bottom half 0, top half 1.
        let lattice: Vec<f64> = (0..100).map(|i| if i < 50 { 0.0 } else { 1.0 }).collect();
        fig.draw_lattice(&lattice, 10, &cmap, 0.0, 1.0).unwrap();
        let img = fig.render();
        let axes = fig.axes();
        let x = axes.x0 + axes.width / 2;
        assert_eq!(*img.get_pixel(x, axes.y0 + 3), cmap.sample(1.0));
        assert_eq!(*img.get_pixel(x, axes.y0 + axes.height - 3), cmap.sample(0.0));
    }
}
