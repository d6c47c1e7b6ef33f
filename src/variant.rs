//! The fixed variant table and per-run variant results.
//!
//! macOS iconsets are built from exactly ten `(nominal size, scale)` pairs.
//! The table below is static: the pipeline walks it in order, and both the
//! iconset manifest and the container encoder assume that order is stable.

use image::RgbaImage;

/// One entry of the fixed variant table.
///
/// `size` is the nominal (logical, non-Retina) edge; the rendered raster is
/// `size * scale` pixels square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    /// Stable identifier, e.g. `"16"` or `"256@2"`.
    pub id: &'static str,
    /// Human label, e.g. `"16 × 16 @2x"`.
    pub label: &'static str,
    /// Where macOS uses this size.
    pub description: &'static str,
    /// Nominal edge in logical pixels (16, 32, 128, 256, or 512).
    pub size: u32,
    /// Scale factor (1 or 2).
    pub scale: u32,
    /// File name inside the `.iconset` directory.
    pub filename: &'static str,
}

impl VariantSpec {
    /// The true pixel edge of the rendered raster: `size * scale`.
    pub const fn actual_edge(&self) -> u32 {
        self.size * self.scale
    }
}

/// The ten variants an `.iconset` must contain, in manifest order.
pub const ICON_VARIANTS: [VariantSpec; 10] = [
    VariantSpec {
        id: "16",
        label: "16 × 16",
        description: "Menu bar / toolbar",
        size: 16,
        scale: 1,
        filename: "icon_16x16.png",
    },
    VariantSpec {
        id: "16@2",
        label: "16 × 16 @2x",
        description: "Retina 32 × 32",
        size: 16,
        scale: 2,
        filename: "icon_16x16@2x.png",
    },
    VariantSpec {
        id: "32",
        label: "32 × 32",
        description: "Dock small icon",
        size: 32,
        scale: 1,
        filename: "icon_32x32.png",
    },
    VariantSpec {
        id: "32@2",
        label: "32 × 32 @2x",
        description: "Retina 64 × 64",
        size: 32,
        scale: 2,
        filename: "icon_32x32@2x.png",
    },
    VariantSpec {
        id: "128",
        label: "128 × 128",
        description: "Finder preview",
        size: 128,
        scale: 1,
        filename: "icon_128x128.png",
    },
    VariantSpec {
        id: "128@2",
        label: "128 × 128 @2x",
        description: "Retina 256 × 256",
        size: 128,
        scale: 2,
        filename: "icon_128x128@2x.png",
    },
    VariantSpec {
        id: "256",
        label: "256 × 256",
        description: "HiDPI common size",
        size: 256,
        scale: 1,
        filename: "icon_256x256.png",
    },
    VariantSpec {
        id: "256@2",
        label: "256 × 256 @2x",
        description: "Retina 512 × 512",
        size: 256,
        scale: 2,
        filename: "icon_256x256@2x.png",
    },
    VariantSpec {
        id: "512",
        label: "512 × 512",
        description: "App Store showcase",
        size: 512,
        scale: 1,
        filename: "icon_512x512.png",
    },
    VariantSpec {
        id: "512@2",
        label: "512 × 512 @2x",
        description: "Retina 1024 × 1024",
        size: 512,
        scale: 2,
        filename: "icon_512x512@2x.png",
    },
];

/// One rendered variant: the spec it was built from, its PNG encoding, and
/// the decoded raster kept around for previews.
///
/// Results are created during pipeline execution and immutable afterwards;
/// a new run produces a whole new set.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResult {
    /// The table entry this variant was rendered for.
    pub spec: &'static VariantSpec,
    /// `spec.size * spec.scale`; also the raster's width and height.
    pub actual_edge: u32,
    /// Lossless PNG encoding of the rendered raster.
    pub png: Vec<u8>,
    /// The rendered raster itself, for preview and inspection.
    pub pixels: RgbaImage,
}

/// The complete ordered set of rendered variants for one run.
///
/// Order matches [`ICON_VARIANTS`] exactly; downstream consumers (the
/// manifest and the container encoder's first-seen dedup) rely on that.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantSet {
    results: Vec<VariantResult>,
}

impl VariantSet {
    /// Wraps an ordered list of results.
    pub fn from_results(results: Vec<VariantResult>) -> Self {
        Self { results }
    }

    /// Returns the number of variants in the set.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if the set contains no variants.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Returns the results as a slice, in table order.
    pub fn results(&self) -> &[VariantResult] {
        &self.results
    }

    /// Returns an iterator over the results, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantResult> {
        self.results.iter()
    }
}

impl IntoIterator for VariantSet {
    type Item = VariantResult;
    type IntoIter = std::vec::IntoIter<VariantResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a VariantResult;
    type IntoIter = std::slice::Iter<'a, VariantResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_ten_unique_pairs() {
        assert_eq!(ICON_VARIANTS.len(), 10);

        let mut pairs: Vec<(u32, u32)> =
            ICON_VARIANTS.iter().map(|v| (v.size, v.scale)).collect();
        pairs.sort_unstable();
        pairs.dedup();
        assert_eq!(pairs.len(), 10, "(size, scale) pairs must be unique");
    }

    #[test]
    fn actual_edges_match_fixed_list() {
        let edges: Vec<u32> = ICON_VARIANTS.iter().map(|v| v.actual_edge()).collect();
        assert_eq!(edges, [16, 32, 32, 64, 128, 256, 256, 512, 512, 1024]);
    }

    #[test]
    fn filenames_follow_iconset_convention() {
        for spec in &ICON_VARIANTS {
            let expected = if spec.scale == 2 {
                format!("icon_{0}x{0}@2x.png", spec.size)
            } else {
                format!("icon_{0}x{0}.png", spec.size)
            };
            assert_eq!(spec.filename, expected);
        }
    }

    #[test]
    fn variant_set_preserves_order() {
        let results: Vec<VariantResult> = ICON_VARIANTS
            .iter()
            .map(|spec| VariantResult {
                spec,
                actual_edge: spec.actual_edge(),
                png: Vec::new(),
                pixels: RgbaImage::new(1, 1),
            })
            .collect();
        let set = VariantSet::from_results(results);

        assert_eq!(set.len(), 10);
        let ids: Vec<&str> = set.iter().map(|r| r.spec.id).collect();
        let expected: Vec<&str> = ICON_VARIANTS.iter().map(|s| s.id).collect();
        assert_eq!(ids, expected);
    }
}
