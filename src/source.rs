//! Source image decoding.
//!
//! Accepts any raster format the `image` crate can read, plus SVG via
//! resvg. SVG sources are rasterized once at a high working resolution and
//! then treated like any other raster input by the pipeline.

use image::RgbaImage;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::Error;
use crate::raster;

/// Working resolution for the long edge of rasterized SVG sources. Large
/// enough that the 1024px variant never upsamples vector input.
const SVG_RASTER_EDGE: u32 = 1024;

/// Decodes source file content into an RGBA raster.
///
/// Raster formats are tried first; content that fails the raster decoders
/// but parses as SVG markup is rasterized instead. Anything else is a
/// decode failure, which aborts the run before any compositing begins.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, Error> {
    match image::load_from_memory(bytes) {
        Ok(img) => Ok(img.to_rgba8()),
        Err(raster_err) => {
            if let Some(text) = as_svg_text(bytes) {
                return rasterize_svg(text);
            }
            tracing::error!(error = %raster_err, "source image decode failed");
            Err(Error::Decode {
                detail: raster_err.to_string(),
            })
        }
    }
}

/// Returns the content as a string if it looks like SVG markup.
fn as_svg_text(bytes: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(bytes).ok()?;
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    (trimmed.starts_with('<') && trimmed.contains("<svg")).then_some(text)
}

/// Rasterizes SVG markup with its long edge scaled to [`SVG_RASTER_EDGE`].
fn rasterize_svg(text: &str) -> Result<RgbaImage, Error> {
    let opts = Options::default();
    let tree = Tree::from_str(text, &opts).map_err(|e| {
        tracing::error!(error = %e, "svg parse failed");
        Error::Decode {
            detail: e.to_string(),
        }
    })?;

    let size = tree.size();
    let scale = SVG_RASTER_EDGE as f32 / size.width().max(size.height());
    let width = ((size.width() * scale).ceil() as u32).max(1);
    let height = ((size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = Pixmap::new(width, height).ok_or(Error::Surface {
        edge: SVG_RASTER_EDGE,
    })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(raster::rgba_from_pixmap(&pixmap))
}

/// Maps a file extension to an `image/*` media type, mirroring the
/// `image/*` gate a browser applies to file uploads.
pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "ico" => Some("image/x-icon"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::encode_png;

    const CIRCLE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><circle cx="25" cy="25" r="20" fill="#ff0000"/></svg>"##;

    #[test]
    fn decodes_png_bytes() {
        let img = RgbaImage::from_pixel(5, 7, image::Rgba([1, 2, 3, 255]));
        let png = encode_png(&img).unwrap();

        let decoded = decode(&png).unwrap();
        assert_eq!(decoded.dimensions(), (5, 7));
        assert_eq!(decoded.get_pixel(2, 3).0, [1, 2, 3, 255]);
    }

    #[test]
    fn decodes_svg_markup_at_working_resolution() {
        let decoded = decode(CIRCLE_SVG.as_bytes()).unwrap();
        // 100x50 viewbox scaled so the long edge hits the working size.
        assert_eq!(decoded.width(), SVG_RASTER_EDGE);
        assert_eq!(decoded.height(), SVG_RASTER_EDGE / 2);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"this is not an image at all").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn media_type_mapping() {
        assert_eq!(media_type_for_extension("PNG"), Some("image/png"));
        assert_eq!(media_type_for_extension("svg"), Some("image/svg+xml"));
        assert_eq!(media_type_for_extension("txt"), None);
        assert_eq!(media_type_for_extension(""), None);
    }
}
