//! Image loading and crop extraction.
//!
//! Thin wrapper around the `image` crate: decode a file into packed RGB8 and
//! slice crop rectangles out of it row by row. Load failures are returned as
//! errors for the pipeline to branch on; this module never aborts a batch.

use std::path::Path;

use anyhow::{Context, Result};

use crate::geometry::CropRect;

/// A decoded image: packed RGB8, row-major.
pub struct LoadedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode an image file into RGB8.
pub fn load_rgb(path: &Path) -> Result<LoadedImage> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgb8();
    let (width, height) = decoded.dimensions();
    Ok(LoadedImage {
        pixels: decoded.into_raw(),
        width,
        height,
    })
}

impl LoadedImage {
    /// Extract a crop rectangle as a packed RGB8 buffer.
    ///
    /// The rectangle must already be clamped to the image bounds, which
    /// `geometry::compute_crop` guarantees. An empty rectangle yields an
    /// empty buffer.
    pub fn crop(&self, rect: &CropRect) -> Vec<u8> {
        let width = self.width as usize;
        let (x0, x1) = (rect.x0 as usize, rect.x1 as usize);
        let mut out = Vec::with_capacity(rect.width() as usize * rect.height() as usize * 3);
        for y in rect.y0 as usize..rect.y1 as usize {
            let row_start = (y * width + x0) * 3;
            let row_end = (y * width + x1) * 3;
            out.extend_from_slice(&self.pixels[row_start..row_end]);
        }
        out
    }
}
