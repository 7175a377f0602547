use image::Rgb;

/// Viridis sampled at ten evenly spaced stops; values in between are
/// interpolated linearly.
const VIRIDIS: [u32; 10] = [
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e,
    0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725,
];

pub const CLASS_0_COLOR: u32 = 0x377eb8;
pub const CLASS_1_COLOR: u32 = 0xff7f00;
pub const OOD_COLOR: u32 = 0xff0000;

/// Maps a value in `[0, 1]` to a colour.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Colormap {
    /// Perceptually uniform purple → yellow ramp.
    #[default]
    Viridis,
    /// Discrete palette; `[0, 1]` is split into equal bins, one per colour.
    Listed(Vec<Rgb<u8>>),
}

impl Colormap {
    /// Blue for class 0, orange for class 1.
    pub fn two_class() -> Colormap {
        Colormap::Listed(vec![hex(CLASS_0_COLOR), hex(CLASS_1_COLOR)])
    }

    /// Colour for `t`; values outside `[0, 1]` are clamped, NaN maps to 0.
    pub fn sample(&self, t: f64) -> Rgb<u8> {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Colormap::Viridis => {
                let pos = t * (VIRIDIS.len() - 1) as f64;
                let i = (pos.floor() as usize).min(VIRIDIS.len() - 2);
                lerp(hex(VIRIDIS[i]), hex(VIRIDIS[i + 1]), pos - i as f64)
            }
            Colormap::Listed(colors) => {
                assert!(!colors.is_empty(), "listed colormap has no colours");
                let i = ((t * colors.len() as f64) as usize).min(colors.len() - 1);
                colors[i]
            }
        }
    }
}

/// `0xRRGGBB` as a pixel.
pub fn hex(code: u32) -> Rgb<u8> {
    Rgb([(code >> 16) as u8, (code >> 8) as u8, code as u8])
}

fn lerp(a: Rgb<u8>, b: Rgb<u8>, f: f64) -> Rgb<u8> {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
    Rgb([mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])])
}
