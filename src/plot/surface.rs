use anyhow::Result;

use crate::data::dataset::Dataset;
use crate::math::matrix::Matrix;
use crate::plot::colormap::{hex, Colormap, OOD_COLOR};
use crate::plot::figure::Figure;
use crate::score::uncertainty::normalize_by_max;

pub const TRAIN_ALPHA: f64 = 0.5;
pub const OOD_ALPHA: f64 = 0.1;

/// The points drawn over every surface.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub train: &'a Dataset,
    pub ood: &'a Matrix,
    /// Side length of the evaluation lattice the scores were computed on.
    pub n_grid: usize,
}

/// What was drawn by `plot_uncertainty_surface`: the normalized lattice and
/// the colour scale, enough to attach a colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// Normalized scores, `n_grid × n_grid`, row 0 at the bottom.
    pub values: Vec<f64>,
    pub n_grid: usize,
    pub colormap: Colormap,
    pub vmin: f64,
    pub vmax: f64,
}

/// Draws `scores` (one per evaluation-grid node) as a smoothed heatmap over
/// the figure's domain, then the training points coloured by class and the
/// OOD cluster in translucent red.
///
/// Scores are divided by their maximum and shown on a fixed `[0, 1]` scale.
///
/// # Panics
/// Panics if `scores.len() != scene.n_grid²`.
pub fn plot_uncertainty_surface(
    figure: &mut Figure,
    scores: &[f64],
    scene: &Scene<'_>,
    colormap: &Colormap,
) -> Result<Surface> {
    let n = scene.n_grid;
    assert_eq!(
        scores.len(),
        n * n,
        "cannot reshape {} scores into a {}x{} lattice",
        scores.len(),
        n,
        n
    );

    let surface = Surface {
        values: normalize_by_max(scores),
        n_grid: n,
        colormap: colormap.clone(),
        vmin: 0.0,
        vmax: 1.0,
    };
    figure.draw_lattice(&surface.values, n, &surface.colormap, surface.vmin, surface.vmax)?;
    overlay_points(figure, scene);

    Ok(surface)
}

/// The raw data: both training classes and the OOD cluster, no surface,
/// with a legend naming each group.
pub fn plot_dataset(figure: &mut Figure, scene: &Scene<'_>) {
    let palette = Colormap::two_class();
    let groups = [
        ("Positive", scene.train.class_points(0.0), palette.sample(0.0), TRAIN_ALPHA),
        ("Negative", scene.train.class_points(1.0), palette.sample(1.0), TRAIN_ALPHA),
        ("Out-of-Domain", scene.ood.clone(), hex(OOD_COLOR), OOD_ALPHA),
    ];
    for (label, points, color, alpha) in &groups {
        figure.scatter(points, *color, *alpha);
        figure.legend_entry(label, *color);
    }
}

fn overlay_points(figure: &mut Figure, scene: &Scene<'_>) {
    figure.scatter_by_value(
        &scene.train.inputs,
        &scene.train.labels,
        &Colormap::two_class(),
        TRAIN_ALPHA,
    );
    figure.scatter(scene.ood, hex(OOD_COLOR), OOD_ALPHA);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::colormap::{CLASS_0_COLOR, CLASS_1_COLOR};
    use crate::plot::figure::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn scene_data() -> (Dataset, Matrix) {
        let train = Dataset::new(
            Matrix::from_rows(vec![vec![-1.0, 0.5], vec![1.0, -0.5]]),
            vec![0.0, 1.0],
        );
        let ood = Matrix::from_rows(vec![vec![2.5, -1.75]]);
        (train, ood)
    }

    #[test]
    fn surface_is_normalized() {
        let (train, ood) = scene_data();
        let scene = Scene { train: &train, ood: &ood, n_grid: 5 };
        let mut fig = Figure::with_colorbar(DEFAULT_WIDTH, DEFAULT_HEIGHT, (-3.5, 3.5), (-2.5, 2.5));
        let scores: Vec<f64> = (0..25).map(|i| i as f64 * 0.01).collect();

        let surface = plot_uncertainty_surface(&mut fig, &scores, &scene, &Colormap::Viridis).unwrap();
        let max = surface.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 1.0);
        assert!(surface.values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(surface.values.len(), 25);

        fig.colorbar(&surface);
    }

    #[test]
    #[should_panic(expected = "cannot reshape")]
    fn wrong_score_count_panics() {
        let (train, ood) = scene_data();
        let scene = Scene { train: &train, ood: &ood, n_grid: 5 };
        let mut fig = Figure::with_colorbar(DEFAULT_WIDTH, DEFAULT_HEIGHT, (-3.5, 3.5), (-2.5, 2.5));
        let _ = plot_uncertainty_surface(&mut fig, &[0.5; 24], &scene, &Colormap::Viridis);
    }

    #[test]
    fn dataset_plot_colours_by_class() {
        let (train, ood) = scene_data();
        let scene = Scene { train: &train, ood: &ood, n_grid: 5 };
        let mut fig = Figure::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, (-3.5, 3.5), (-2.5, 2.5));
        plot_dataset(&mut fig, &scene);

        let img = fig.render();
        let (x0, y0) = fig.to_pixel(-1.0, 0.5);
        let (x1, y1) = fig.to_pixel(1.0, -0.5);
        let p0 = img.get_pixel(x0 as u32, y0 as u32);
        let p1 = img.get_pixel(x1 as u32, y1 as u32);
        // Half-transparent blue over white keeps blue the strongest channel.
        assert!(p0[2] > p0[0]);
        // Orange keeps red the strongest channel.
        assert!(p1[0] > p1[2]);

        let legend: Vec<_> = (0..3)
            .map(|i| {
                let swatch = fig.legend_swatch(i);
                *img.get_pixel(swatch.x0 + 1, swatch.y0 + 1)
            })
            .collect();
        assert_eq!(legend, vec![hex(CLASS_0_COLOR), hex(CLASS_1_COLOR), hex(OOD_COLOR)]);
    }
}
