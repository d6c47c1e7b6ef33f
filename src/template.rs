//! Template compositing for a single icon variant.
//!
//! Every variant is the same fixed visual template at a different pixel
//! edge: a white rounded square sitting on a soft drop shadow, the source
//! image aspect-fit inside it, a top-to-bottom highlight gradient, and a
//! faint cool-gray stroke around the edge. All proportions derive from the
//! target edge so a 16px variant gets the same treatment as a 1024px one.

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use resvg::tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Point, Rect, SpreadMode, Stroke, Transform,
};

use crate::error::Error;
use crate::raster;

// ============================================================================
// Template geometry
// ============================================================================

/// Derived geometry of the template at one pixel edge.
///
/// Floors on the padding and the radius clamp keep the geometry sane down
/// to the smallest supported edge (16px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateGeometry {
    /// Target edge in pixels; the output raster is `edge x edge`.
    pub edge: u32,
    /// Padding between the canvas edge and the base square: `max(round(0.08*E), 2)`.
    pub outer_padding: u32,
    /// Edge of the white base square: `E - 2 * outer_padding`.
    pub base_size: u32,
    /// Corner radius: `round(0.22 * base)`, clamped to `base / 2`.
    pub corner_radius: f32,
    /// Padding between the base square and the source content: `round(0.12 * base)`.
    pub inner_padding: u32,
    /// Gaussian sigma of the drop shadow: `0.06 * E`.
    pub shadow_blur: f32,
    /// Vertical offset of the drop shadow: `0.02 * E`.
    pub shadow_offset_y: f32,
    /// Width of the outline stroke: `max(0.012 * E, 1)`.
    pub stroke_width: f32,
}

impl TemplateGeometry {
    /// Computes the template geometry for the given pixel edge.
    pub fn for_edge(edge: u32) -> Self {
        let e = edge as f32;
        let outer_padding = ((e * 0.08).round() as u32).max(2);
        let base_size = edge.saturating_sub(outer_padding * 2);
        let b = base_size as f32;
        let corner_radius = (b * 0.22).round().min(b / 2.0);
        let inner_padding = (b * 0.12).round() as u32;

        Self {
            edge,
            outer_padding,
            base_size,
            corner_radius,
            inner_padding,
            shadow_blur: e * 0.06,
            shadow_offset_y: e * 0.02,
            stroke_width: (e * 0.012).max(1.0),
        }
    }

    /// Edge of the square box the source image is fit into.
    pub fn content_box(&self) -> u32 {
        self.base_size.saturating_sub(self.inner_padding * 2)
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Renders one `edge x edge` variant of the template around `source`.
///
/// The source is never cropped or distorted: it is uniformly scaled to fit
/// the inner content box and centered. A fresh drawing surface is used per
/// call so no state leaks between variants.
pub fn compose(source: &RgbaImage, edge: u32) -> Result<RgbaImage, Error> {
    let geo = TemplateGeometry::for_edge(edge);
    let mut canvas = acquire_surface(edge, edge)?;

    let p = geo.outer_padding as f32;
    let b = geo.base_size as f32;
    let path = rounded_rect_path(p, p, b, b, geo.corner_radius).ok_or_else(|| {
        tracing::error!(edge, "degenerate rounded-rect path");
        Error::Render {
            detail: format!("rounded-rect path for edge {edge} could not be built"),
        }
    })?;

    // Drop shadow first so the base square reads as slightly elevated.
    let shadow = render_shadow(&geo, &path)?;
    let shadow_pixmap = raster::pixmap_from_rgba(&shadow).ok_or(Error::Surface { edge })?;
    canvas.draw_pixmap(
        0,
        0,
        shadow_pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    // Opaque white base square.
    let mut base_paint = Paint::default();
    base_paint.anti_alias = true;
    base_paint.set_color_rgba8(255, 255, 255, 255);
    canvas.fill_path(&path, &base_paint, FillRule::Winding, Transform::identity(), None);

    // Clip mask shared by the content and the highlight.
    let mut clip = Mask::new(edge, edge).ok_or(Error::Surface { edge })?;
    clip.fill_path(&path, FillRule::Winding, true, Transform::identity());

    draw_content(&mut canvas, &clip, &geo, source)?;
    draw_highlight(&mut canvas, &clip, &geo)?;

    // Outline stroke, unclipped, over everything.
    let mut stroke_paint = Paint::default();
    stroke_paint.anti_alias = true;
    stroke_paint.set_color_rgba8(148, 163, 184, 64);
    let stroke = Stroke {
        width: geo.stroke_width,
        ..Stroke::default()
    };
    canvas.stroke_path(&path, &stroke_paint, &stroke, Transform::identity(), None);

    Ok(raster::rgba_from_pixmap(&canvas))
}

/// Aspect-fits the source into the content box and draws it centered,
/// clipped to the rounded base.
fn draw_content(
    canvas: &mut Pixmap,
    clip: &Mask,
    geo: &TemplateGeometry,
    source: &RgbaImage,
) -> Result<(), Error> {
    let content = geo.content_box();
    let (draw_w, draw_h) = raster::fit_within(source.width(), source.height(), content);
    if draw_w == 0 || draw_h == 0 {
        return Ok(());
    }

    let resized = imageops::resize(source, draw_w, draw_h, FilterType::Lanczos3);
    let source_pixmap = raster::pixmap_from_rgba(&resized).ok_or(Error::Surface {
        edge: geo.edge,
    })?;

    let offset_x = geo.outer_padding as i32 + (geo.base_size as i32 - draw_w as i32) / 2;
    let offset_y = geo.outer_padding as i32 + (geo.base_size as i32 - draw_h as i32) / 2;
    canvas.draw_pixmap(
        offset_x,
        offset_y,
        source_pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        Some(clip),
    );

    Ok(())
}

/// Blends the fixed top-to-bottom highlight over the base square: 55%
/// white at the top fading out at mid-height, 25% cool gray at the bottom.
/// Applied regardless of image content.
fn draw_highlight(
    canvas: &mut Pixmap,
    clip: &Mask,
    geo: &TemplateGeometry,
) -> Result<(), Error> {
    let p = geo.outer_padding as f32;
    let b = geo.base_size as f32;

    let shader = LinearGradient::new(
        Point::from_xy(0.0, p),
        Point::from_xy(0.0, p + b),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(255, 255, 255, 140)),
            GradientStop::new(0.5, Color::from_rgba8(255, 255, 255, 0)),
            GradientStop::new(1.0, Color::from_rgba8(148, 163, 184, 64)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| Error::Render {
        detail: "highlight gradient could not be built".into(),
    })?;

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.shader = shader;

    let rect = Rect::from_xywh(p, p, b, b).ok_or_else(|| Error::Render {
        detail: "highlight rect could not be built".into(),
    })?;
    canvas.fill_rect(rect, &paint, Transform::identity(), Some(clip));

    Ok(())
}

/// Renders the blurred drop shadow for the base square on its own surface.
fn render_shadow(geo: &TemplateGeometry, path: &Path) -> Result<RgbaImage, Error> {
    let mut shadow = acquire_surface(geo.edge, geo.edge)?;

    let mut paint = Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(15, 23, 42, 46);
    shadow.fill_path(
        path,
        &paint,
        FillRule::Winding,
        Transform::from_translate(0.0, geo.shadow_offset_y),
        None,
    );

    let img = raster::rgba_from_pixmap(&shadow);
    Ok(imageops::fast_blur(&img, geo.shadow_blur))
}

/// Acquires a fresh drawing surface, the fatal failure mode of the run.
fn acquire_surface(width: u32, height: u32) -> Result<Pixmap, Error> {
    Pixmap::new(width, height).ok_or_else(|| {
        tracing::error!(width, height, "pixmap allocation failed");
        Error::Surface { edge: width }
    })
}

/// Builds the rounded-rect path used for the shadow, base fill, clip, and
/// stroke. The radius is clamped so the path never self-intersects.
fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    let r = radius.min(width / 2.0).min(height / 2.0);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + width - r, y);
    pb.quad_to(x + width, y, x + width, y + r);
    pb.line_to(x + width, y + height - r);
    pb.quad_to(x + width, y + height, x + width - r, y + height);
    pb.line_to(x + r, y + height);
    pb.quad_to(x, y + height, x, y + height - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

// ============================================================================
// PNG encoding
// ============================================================================

/// Encodes a raster as lossless RGBA PNG.
///
/// The encoder embeds no timestamps, so identical input always produces
/// byte-identical output.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| {
            tracing::error!(error = %e, "png encoding failed");
            Error::Render {
                detail: e.to_string(),
            }
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::ICON_VARIANTS;

    #[test]
    fn geometry_floors_at_16px() {
        let geo = TemplateGeometry::for_edge(16);
        assert_eq!(geo.outer_padding, 2);
        assert_eq!(geo.base_size, 12);
        assert_eq!(geo.corner_radius, 3.0);
    }

    #[test]
    fn radius_never_exceeds_half_base() {
        for spec in &ICON_VARIANTS {
            let geo = TemplateGeometry::for_edge(spec.actual_edge());
            assert!(
                geo.corner_radius <= geo.base_size as f32 / 2.0,
                "edge {}: radius {} vs base {}",
                geo.edge,
                geo.corner_radius,
                geo.base_size
            );
        }
    }

    #[test]
    fn compose_emits_exact_dimensions() {
        let source = RgbaImage::from_pixel(40, 40, image::Rgba([30, 90, 200, 255]));
        for edge in [16, 64, 128] {
            let out = compose(&source, edge).unwrap();
            assert_eq!(out.dimensions(), (edge, edge));
        }
    }

    #[test]
    fn compose_is_deterministic() {
        let source = RgbaImage::from_fn(32, 20, |x, y| {
            image::Rgba([(x * 8) as u8, (y * 12) as u8, 77, 255])
        });
        let first = compose(&source, 64).unwrap();
        let second = compose(&source, 64).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn blank_source_still_renders_white_base() {
        // Fully transparent source: the template renders anyway.
        let source = RgbaImage::new(1024, 1024);
        let out = compose(&source, 16).unwrap();

        let center = out.get_pixel(8, 8);
        assert_eq!(center[3], 255, "base must be opaque");
        assert!(
            center[0] >= 245 && center[1] >= 245 && center[2] >= 245,
            "base must be white, got {:?}",
            center
        );
    }

    #[test]
    fn canvas_corner_stays_mostly_clear() {
        let source = RgbaImage::from_pixel(64, 64, image::Rgba([0, 0, 0, 255]));
        let out = compose(&source, 64).unwrap();
        // Outside the base square only the faint blurred shadow may reach.
        assert!(out.get_pixel(0, 0)[3] < 255);
    }

    #[test]
    fn png_roundtrip() {
        let source = RgbaImage::from_pixel(8, 8, image::Rgba([200, 10, 10, 255]));
        let out = compose(&source, 32).unwrap();
        let png = encode_png(&out).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, out);
    }
}
