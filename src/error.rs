//! Crate-wide error type.
//!
//! Every failure is terminal for the current run: the session discards all
//! partial results before surfacing one of these variants. The `Display`
//! strings are the single-line, non-technical messages shown to the user;
//! full detail is logged at the failure site via `tracing`, not surfaced.

use std::io;

use thiserror::Error;

/// Errors produced while turning a source image into icon assets.
#[derive(Debug, Error)]
pub enum Error {
    /// The selected file's media type does not start with `image/`.
    /// Nothing is processed.
    #[error("select an image file such as PNG, JPEG, or SVG")]
    NotAnImage {
        /// The declared media type that was rejected.
        media_type: String,
    },

    /// Reading the source file failed before decoding began.
    #[error("failed to read the file; please try again")]
    Read(#[from] io::Error),

    /// The decoder could not interpret the file content as an image.
    #[error("unable to read the image; confirm the file is not corrupted")]
    Decode {
        /// Decoder detail, logged but never shown to the user.
        detail: String,
    },

    /// A rendering surface could not be acquired. Fatal and non-retryable
    /// for the whole run.
    #[error("2D raster rendering is not available")]
    Surface {
        /// The pixel edge of the surface that failed to allocate.
        edge: u32,
    },

    /// Compositing or encoding failed partway through a run.
    #[error("something went wrong while generating icons; please try another image")]
    Render {
        /// Renderer detail, logged but never shown to the user.
        detail: String,
    },

    /// Assembling the iconset zip archive failed.
    #[error("something went wrong while assembling the iconset archive")]
    Archive(#[from] zip::result::ZipError),
}
