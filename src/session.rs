//! Run controller.
//!
//! A [`Session`] owns the outputs of at most one run. Starting a new run
//! supersedes the previous one: the prior bundle is discarded before any
//! new work begins, so a caller can never observe a mix of old and new
//! results. Every failure path likewise leaves the session empty.

use crate::error::Error;
use crate::icns::IcnsContainer;
use crate::iconset;
use crate::pipeline;
use crate::source;
use crate::variant::VariantSet;

/// Fallback base name when the source file name has no usable stem.
const DEFAULT_BASE_NAME: &str = "AppIcon";

/// Everything one successful run produces.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Source file name minus its final extension; drives download names.
    pub base_name: String,
    /// The ten rendered variants, in table order.
    pub variants: VariantSet,
    /// Serialized `.icns` container.
    pub icns: Vec<u8>,
    /// Serialized iconset zip archive.
    pub archive: Vec<u8>,
}

impl Bundle {
    /// Download name for the container: `<base>.icns`.
    pub fn icns_file_name(&self) -> String {
        format!("{}.icns", self.base_name)
    }

    /// Download name for the archive: `<base>-macos-iconset.zip`.
    pub fn archive_file_name(&self) -> String {
        format!("{}-macos-iconset.zip", self.base_name)
    }
}

/// Owns the current run's outputs and the supersede/teardown contract.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Bundle>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundle of the most recent successful run, if any.
    pub fn current(&self) -> Option<&Bundle> {
        self.current.as_ref()
    }

    /// Discards the current bundle, if any.
    pub fn supersede(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("superseded previous run");
        }
    }

    /// Runs the full pipeline on one source file.
    ///
    /// The previous bundle is discarded up front; on any failure the
    /// session stays empty. A declared media type outside `image/*` is
    /// rejected before decoding.
    pub fn process(
        &mut self,
        file_name: &str,
        media_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<&Bundle, Error> {
        self.supersede();

        if let Some(media_type) = media_type {
            if !media_type.starts_with("image/") {
                tracing::warn!(media_type, "rejected non-image upload");
                return Err(Error::NotAnImage {
                    media_type: media_type.to_string(),
                });
            }
        }

        let decoded = source::decode(bytes)?;
        tracing::debug!(
            width = decoded.width(),
            height = decoded.height(),
            "source decoded"
        );

        let variants = pipeline::generate(&decoded)?;

        let container = IcnsContainer::from_variants(&variants);
        let mut icns = Vec::with_capacity(container.total_len() as usize);
        container.write(&mut icns).map_err(|e| Error::Render {
            detail: e.to_string(),
        })?;

        let archive = iconset::write_archive(&variants)?;

        let bundle = Bundle {
            base_name: base_name(file_name),
            variants,
            icns,
            archive,
        };
        Ok(self.current.insert(bundle))
    }
}

/// Strips the final extension from a file name, falling back to
/// `AppIcon` when nothing remains.
pub fn base_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    if stem.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        stem.to_string()
    }
}
