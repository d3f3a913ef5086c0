// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image normalization for the Cropsight pipeline.
//!
//! Decodes an arbitrary raster upload, bounds its longest edge, converts to
//! RGB, and re-encodes as JPEG for transport to the identification service.
//! A pure transform: no I/O, no shared state.

use std::io::Cursor;

use cropsight_config::model::ImageConfig;
use cropsight_core::CropsightError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

/// A normalized image ready for transport to the identification service.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG-encoded bytes.
    pub bytes: Vec<u8>,
    /// Width after normalization.
    pub width: u32,
    /// Height after normalization.
    pub height: u32,
}

/// Image normalizer with configured edge bound and encode quality.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    max_edge: u32,
    jpeg_quality: u8,
}

impl ImageNormalizer {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_edge: config.max_edge,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Decodes `raw` and returns a bounded, RGB, JPEG-encoded image.
    ///
    /// Fails with [`CropsightError::InvalidImage`] when the bytes are not a
    /// decodable raster image. Downscales with Lanczos3 when the longest
    /// edge exceeds the configured maximum; never upscales. Idempotent on
    /// geometry: re-normalizing an already-bounded image leaves its
    /// dimensions unchanged.
    pub fn normalize(&self, raw: &[u8]) -> Result<NormalizedImage, CropsightError> {
        let decoded = image::load_from_memory(raw)
            .map_err(|e| CropsightError::InvalidImage(format!("undecodable image data: {e}")))?;

        let (width, height) = (decoded.width(), decoded.height());
        let longest = width.max(height);

        let bounded = if longest > self.max_edge {
            debug!(width, height, max_edge = self.max_edge, "downscaling image");
            decoded.resize(self.max_edge, self.max_edge, FilterType::Lanczos3)
        } else {
            decoded
        };

        // Drop alpha before the lossy encode; the identification service
        // expects plain RGB JPEG.
        let rgb = bounded.to_rgb8();
        let (out_width, out_height) = (rgb.width(), rgb.height());

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| CropsightError::Internal(format!("JPEG encode failed: {e}")))?;

        debug!(
            in_bytes = raw.len(),
            out_bytes = bytes.len(),
            out_width,
            out_height,
            "normalized image"
        );

        Ok(NormalizedImage {
            bytes,
            width: out_width,
            height: out_height,
        })
    }
}

/// Checks that a declared content type belongs to the image category.
///
/// The gateway rejects uploads whose content type does not start with
/// `image/` before any decode is attempted.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}
