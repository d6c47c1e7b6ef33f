//! Raster conversion and geometry helpers.
//!
//! tiny-skia pixmaps store premultiplied RGBA while `image::RgbaImage` is
//! straight RGBA; the two conversions here bridge the compositor's vector
//! drawing and the rest of the crate.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{ColorU8, Pixmap};

/// Converts a tiny-skia pixmap to a straight-alpha `RgbaImage`.
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = pixmap.pixel(x, y).unwrap();
            let (r, g, b, a) =
                unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
            img.put_pixel(x, y, Rgba([r, g, b, a]));
        }
    }

    img
}

/// Converts a straight-alpha `RgbaImage` to a premultiplied tiny-skia pixmap.
///
/// Returns `None` if the pixmap cannot be allocated (zero-sized image).
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;

    for (src, dst) in img.pixels().zip(pixmap.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    Some(pixmap)
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

/// Scales `(width, height)` uniformly so it fits inside a `box_edge` square.
///
/// The scale is the minimum of the width-fit and height-fit ratios, so the
/// longer dimension exactly fills the box and nothing is cropped.
pub fn fit_within(width: u32, height: u32, box_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 || box_edge == 0 {
        return (0, 0);
    }

    let scale = (box_edge as f32 / width as f32).min(box_edge as f32 / height as f32);
    (
        (width as f32 * scale).round() as u32,
        (height as f32 * scale).round() as u32,
    )
}
