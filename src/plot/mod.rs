pub mod colormap;
pub mod figure;
pub mod surface;
pub mod text;

pub use colormap::Colormap;
pub use figure::Figure;
pub use surface::{plot_dataset, plot_uncertainty_surface, Scene, Surface};
