//! Iconset packaging: the `Contents.json` manifest and the zip archive.
//!
//! The manifest is a published contract consumed by Xcode's `actool` and
//! `iconutil`: field names, the `"<n>x"` scale format, and the use of the
//! *nominal* (not actual) edge in `size` all have to match exactly.

use std::io::{Cursor, Write};

use serde::{Deserialize, Serialize};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Error;
use crate::variant::VariantSet;

/// Directory the variants live under inside the archive. Fixed; the
/// source file name only influences the archive's download name.
pub const ICONSET_DIR: &str = "AppIcon.iconset";

/// `info.author` value, part of the manifest contract.
pub const MANIFEST_AUTHOR: &str = "icon-generator";

/// `info.version` value, part of the manifest contract.
pub const MANIFEST_VERSION: u32 = 1;

// ============================================================================
// Manifest document
// ============================================================================

/// One `images[]` record of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    /// Always `"mac"`.
    pub idiom: String,
    /// File name of the variant inside the iconset directory.
    pub filename: String,
    /// Scale factor formatted as `"<n>x"`.
    pub scale: String,
    /// Nominal edge formatted as `"<size>x<size>"`. Nominal, not actual:
    /// the 256@2x variant renders 512px but declares `"256x256"`.
    pub size: String,
}

/// Fixed author/version metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestInfo {
    pub author: String,
    pub version: u32,
}

/// The full `Contents.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// One record per variant, in variant-table order.
    pub images: Vec<ManifestImage>,
    pub info: ManifestInfo,
}

impl Manifest {
    /// Builds the manifest for a rendered variant set.
    pub fn from_variants(variants: &VariantSet) -> Self {
        let images = variants
            .iter()
            .map(|v| ManifestImage {
                idiom: "mac".to_string(),
                filename: v.spec.filename.to_string(),
                scale: format!("{}x", v.spec.scale),
                size: format!("{0}x{0}", v.spec.size),
            })
            .collect();

        Self {
            images,
            info: ManifestInfo {
                author: MANIFEST_AUTHOR.to_string(),
                version: MANIFEST_VERSION,
            },
        }
    }

    /// Serializes with stable 2-space indentation.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a serialized manifest.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Archive assembly
// ============================================================================

/// Assembles the iconset zip: `AppIcon.iconset/` holding every variant's
/// PNG payload byte-exact plus `Contents.json`.
///
/// Entries carry a fixed modification timestamp so the archive itself is
/// byte-stable across runs. Any failure aborts the run; a partial archive
/// is never returned.
pub fn write_archive(variants: &VariantSet) -> Result<Vec<u8>, Error> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.add_directory(ICONSET_DIR, options)?;

    for variant in variants {
        writer.start_file(format!("{ICONSET_DIR}/{}", variant.spec.filename), options)?;
        writer.write_all(&variant.png).map_err(ZipError::from)?;
    }

    let manifest = Manifest::from_variants(variants);
    let json = manifest.to_json().map_err(|e| {
        tracing::error!(error = %e, "manifest serialization failed");
        Error::Render {
            detail: e.to_string(),
        }
    })?;
    writer.start_file(format!("{ICONSET_DIR}/Contents.json"), options)?;
    writer.write_all(json.as_bytes()).map_err(ZipError::from)?;

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{ICON_VARIANTS, VariantResult, VariantSet};
    use image::RgbaImage;
    use zip::ZipArchive;

    fn fake_set(indices: &[usize]) -> VariantSet {
        let results = indices
            .iter()
            .map(|&i| {
                let spec = &ICON_VARIANTS[i];
                VariantResult {
                    spec,
                    actual_edge: spec.actual_edge(),
                    png: vec![i as u8; 4 + i],
                    pixels: RgbaImage::new(1, 1),
                }
            })
            .collect();
        VariantSet::from_results(results)
    }

    #[test]
    fn manifest_uses_nominal_size() {
        // Index 7 is the 256@2x variant: actual edge 512, nominal 256.
        let manifest = Manifest::from_variants(&fake_set(&[7]));

        let record = &manifest.images[0];
        assert_eq!(record.idiom, "mac");
        assert_eq!(record.filename, "icon_256x256@2x.png");
        assert_eq!(record.scale, "2x");
        assert_eq!(record.size, "256x256");
    }

    #[test]
    fn manifest_json_shape() {
        let json = Manifest::from_variants(&fake_set(&[0])).to_json().unwrap();

        // 2-space indentation, exact field names.
        assert!(json.contains("\n  \"images\""));
        assert!(json.contains("\"idiom\": \"mac\""));
        assert!(json.contains("\"size\": \"16x16\""));
        assert!(json.contains("\"scale\": \"1x\""));
        assert!(json.contains("\"author\": \"icon-generator\""));
        assert!(json.contains("\"version\": 1"));

        let parsed = Manifest::from_json(&json).unwrap();
        assert_eq!(parsed.images.len(), 1);
        assert_eq!(parsed.info.version, MANIFEST_VERSION);
    }

    #[test]
    fn archive_contains_all_variants_and_manifest() {
        let set = fake_set(&(0..10).collect::<Vec<_>>());
        let bytes = write_archive(&set).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        for variant in &set {
            let name = format!("{ICONSET_DIR}/{}", variant.spec.filename);
            let mut file = archive.by_name(&name).unwrap();
            let mut payload = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut payload).unwrap();
            assert_eq!(payload, variant.png, "payload mismatch for {name}");
        }

        let mut manifest_file = archive
            .by_name(&format!("{ICONSET_DIR}/Contents.json"))
            .unwrap();
        let mut json = String::new();
        std::io::Read::read_to_string(&mut manifest_file, &mut json).unwrap();
        let manifest = Manifest::from_json(&json).unwrap();
        assert_eq!(manifest.images.len(), 10);
    }

    #[test]
    fn archive_is_byte_stable() {
        let set = fake_set(&[0, 3, 9]);
        assert_eq!(write_archive(&set).unwrap(), write_archive(&set).unwrap());
    }
}
