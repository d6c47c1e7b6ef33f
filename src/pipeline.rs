//! Variant generation pipeline.
//!
//! Walks the fixed variant table in order and composes one raster per
//! entry. The ten renders happen strictly sequentially, one fresh surface
//! per variant; any failure aborts the whole run so a partial set is never
//! observable downstream.

use image::RgbaImage;

use crate::error::Error;
use crate::template;
use crate::variant::{ICON_VARIANTS, VariantResult, VariantSet};

/// Renders all ten variants of the template around `source`.
///
/// The output order matches [`ICON_VARIANTS`] exactly; the container
/// encoder's first-seen dedup and the manifest both rely on it.
pub fn generate(source: &RgbaImage) -> Result<VariantSet, Error> {
    let mut results = Vec::with_capacity(ICON_VARIANTS.len());

    for spec in &ICON_VARIANTS {
        let edge = spec.actual_edge();
        tracing::debug!(id = spec.id, edge, "rendering variant");

        let pixels = template::compose(source, edge)?;
        let png = template::encode_png(&pixels)?;
        results.push(VariantResult {
            spec,
            actual_edge: edge,
            png,
            pixels,
        });
    }

    Ok(VariantSet::from_results(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_ten_variants_in_table_order() {
        let source = RgbaImage::from_pixel(48, 48, image::Rgba([120, 40, 40, 255]));
        let set = generate(&source).unwrap();

        assert_eq!(set.len(), 10);
        let edges: Vec<u32> = set.iter().map(|r| r.actual_edge).collect();
        assert_eq!(edges, [16, 32, 32, 64, 128, 256, 256, 512, 512, 1024]);
    }

    #[test]
    fn rasters_match_their_edges() {
        let source = RgbaImage::from_pixel(30, 10, image::Rgba([20, 200, 20, 255]));
        let set = generate(&source).unwrap();

        for result in &set {
            assert_eq!(
                result.pixels.dimensions(),
                (result.actual_edge, result.actual_edge)
            );
            assert_eq!(result.actual_edge, result.spec.size * result.spec.scale);
        }
    }
}
