//! # Image Normalizer
//! Downsizes and re-encodes field imagery before transmission. Bandwidth in
//! disaster-affected connectivity is the dominant constraint, so every
//! submission goes through the same deterministic pipeline: cap the longer
//! axis, keep the aspect ratio, re-encode as JPEG at a fixed quality.
//!
//! Pure transform over its input; no shared state, safe to call concurrently.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

/// Default bound applied to the longer image axis.
pub const DEFAULT_MAX_DIM: u32 = 1024;

/// Fixed lossy re-encode quality (percent).
const JPEG_QUALITY: u8 = 85;

/// The source bytes could not be processed as an image. Fatal to the
/// enclosing submission — there is no fallback for a corrupt capture.
#[derive(Debug, Error)]
#[error("image could not be decoded: {0}")]
pub struct DecodeError(#[from] image::ImageError);

/// Re-encoded artifact with its final pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Compute the output dimensions for a `max_dim` bound: the longer axis is
/// brought down to exactly `max_dim`, the shorter axis scales with it
/// (rounded, floor 1px). Images already within the bound keep their size —
/// the scale factor is capped at 1.0, never upscaling.
pub fn bounded_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= max_dim || longer == 0 {
        return (width, height);
    }
    let scale = f64::from(max_dim) / f64::from(longer);
    let scaled = |axis: u32| ((f64::from(axis) * scale).round() as u32).max(1);
    if width >= height {
        (max_dim, scaled(height))
    } else {
        (scaled(width), max_dim)
    }
}

/// Decode `bytes`, downscale to fit `max_dim`, and re-encode as JPEG.
///
/// Semantic content is unchanged; byte size is bounded by the fixed
/// dimensions and quality. Fails only when the source is not a parseable
/// image (or the codec cannot re-encode it), which must abort the submission.
pub fn normalize_image(bytes: &[u8], max_dim: u32) -> Result<NormalizedImage, DecodeError> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = bounded_dimensions(img.width(), img.height(), max_dim);

    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha; flatten before encoding.
    let rgb = resized.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(&rgb)?;

    Ok(NormalizedImage {
        bytes: out,
        width,
        height,
    })
}
