//! iconforge: macOS icon asset generation
//!
//! This crate turns one source image into the complete family of macOS
//! icon assets: ten template-composited PNG variants, an `.iconset` zip
//! archive with its `Contents.json` manifest, and an `.icns` container.
//!
//! # Example
//!
//! ```
//! use image::RgbaImage;
//! use iconforge::{IcnsContainer, generate};
//!
//! let source = RgbaImage::new(64, 64);
//! let variants = generate(&source).unwrap();
//! assert_eq!(variants.len(), 10);
//!
//! let container = IcnsContainer::from_variants(&variants);
//! let mut icns = Vec::new();
//! container.write(&mut icns).unwrap();
//! ```
//!
//! # Sessions
//!
//! For host surfaces that process one upload at a time, [`Session`] wraps
//! the whole flow (media-type gate, decode, pipeline, container, archive)
//! and owns the supersede semantics between runs:
//!
//! ```no_run
//! use iconforge::Session;
//!
//! let mut session = Session::new();
//! let bytes = std::fs::read("logo.png").unwrap();
//! let bundle = session.process("logo.png", Some("image/png"), &bytes).unwrap();
//! std::fs::write(bundle.icns_file_name(), &bundle.icns).unwrap();
//! std::fs::write(bundle.archive_file_name(), &bundle.archive).unwrap();
//! ```

mod error;
mod icns;
mod iconset;
mod pipeline;
mod raster;
mod session;
mod source;
mod template;
mod variant;

pub use error::Error;
pub use icns::{IcnsContainer, IcnsEntry, IcnsError, edge_for_tag, type_tag};
pub use iconset::{ICONSET_DIR, Manifest, ManifestImage, ManifestInfo, write_archive};
pub use pipeline::generate;
pub use session::{Bundle, Session, base_name};
pub use source::{decode as decode_source, media_type_for_extension};
pub use template::{TemplateGeometry, compose, encode_png};
pub use variant::{ICON_VARIANTS, VariantResult, VariantSet, VariantSpec};
