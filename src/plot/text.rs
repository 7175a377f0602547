use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

/// Side of one glyph cell at scale 1, in pixels.
pub const GLYPH_SIZE: u32 = 8;

/// Width in pixels of `text` drawn at `scale`.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Draws `text` with its top-left corner at `(x, y)`, each font pixel
/// blown up to a `scale × scale` square. Pixels off the image are skipped
/// and characters missing from the font are drawn as `?`.
pub fn draw_text(img: &mut RgbImage, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
    let (width, height) = (img.width() as i64, img.height() as i64);
    let s = scale as i64;
    let cell = GLYPH_SIZE as i64 * s;

    for (i, c) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(c)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        let left = x + i as i64 * cell;

        // One byte per glyph row, top first; bit 0 is the leftmost column.
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                for dy in 0..s {
                    for dx in 0..s {
                        let px = left + col as i64 * s + dx;
                        let py = y + row as i64 * s + dy;
                        if px >= 0 && py >= 0 && px < width && py < height {
                            img.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}
