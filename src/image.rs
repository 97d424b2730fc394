// src/image.rs
//! Background image loading and scaling.
//!
//! The provider hands back plain RGBA pixel buffers so nothing
//! toolkit-shaped leaks into the compositor. `SourceImage` is decoded
//! once at startup and is the single source of truth for every later
//! rescale; the on-screen copy is always derived from it, never from a
//! previously scaled buffer.

use crate::error::{ShellError, ShellResult};
use crate::events::Extent;

use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

/// The originally decoded background at its first-requested dimensions.
/// Read-only after creation.
#[derive(Debug, Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SourceImage {
    /// Wrap an RGBA buffer; `pixels` must be `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// On-screen copy at the source's own dimensions, used as the
    /// initially displayed image before the first resize.
    pub fn to_displayed(&self) -> ScaledImage {
        ScaledImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// A scaled on-screen buffer. Replaced wholesale on every
/// dimension-changing resize, never mutated in place.
#[derive(Debug, Clone)]
pub struct ScaledImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ScaledImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Image capability consumed by the compositor.
pub trait ImageProvider {
    /// Decode `path` scaled to `target`. When `preserve_aspect_ratio`
    /// is set the result fits within the target box at the source's
    /// ratio; otherwise it is stretched to the exact target.
    fn load(
        &self,
        path: &Path,
        target: Extent,
        preserve_aspect_ratio: bool,
    ) -> ShellResult<SourceImage>;

    /// Stretch `source` to exactly `target`. Aspect ratio is
    /// deliberately not re-applied here: after the initial load, resizes
    /// track the window allocation exactly, matching long-observed
    /// behavior of this shell.
    fn rescale(&self, source: &SourceImage, target: Extent) -> ShellResult<ScaledImage>;
}

/// Production provider backed by the `image` crate; scaling is bilinear.
#[derive(Debug, Default)]
pub struct BilinearScaler;

impl BilinearScaler {
    pub fn new() -> Self {
        Self
    }
}

impl ImageProvider for BilinearScaler {
    fn load(
        &self,
        path: &Path,
        target: Extent,
        preserve_aspect_ratio: bool,
    ) -> ShellResult<SourceImage> {
        let decoded = image::open(path)
            .map_err(|e| match e {
                image::ImageError::IoError(ref io)
                    if io.kind() == std::io::ErrorKind::NotFound =>
                {
                    ShellError::MissingFile {
                        path: path.to_path_buf(),
                    }
                }
                other => ShellError::Decode {
                    path: path.to_path_buf(),
                    message: other.to_string(),
                },
            })?
            .to_rgba8();

        let natural = Extent::new(decoded.width(), decoded.height());
        let dims = if preserve_aspect_ratio {
            aspect_fit(natural, target)
        } else {
            target
        };
        check_extent(dims)?;

        debug!(
            "loaded background {} ({} natural) at {}",
            path.display(),
            natural,
            dims
        );

        let scaled = image::imageops::resize(&decoded, dims.width, dims.height, FilterType::Triangle);
        Ok(SourceImage {
            width: dims.width,
            height: dims.height,
            pixels: scaled.into_raw(),
        })
    }

    fn rescale(&self, source: &SourceImage, target: Extent) -> ShellResult<ScaledImage> {
        check_extent(target)?;

        let buffer = RgbaImage::from_raw(source.width, source.height, source.pixels.clone())
            .ok_or_else(|| ShellError::Scale {
                width: target.width,
                height: target.height,
                message: "source pixel buffer does not match its dimensions".to_string(),
            })?;
        let scaled =
            image::imageops::resize(&buffer, target.width, target.height, FilterType::Triangle);
        Ok(ScaledImage {
            width: target.width,
            height: target.height,
            pixels: scaled.into_raw(),
        })
    }
}

fn check_extent(extent: Extent) -> ShellResult<()> {
    if extent.width == 0 || extent.height == 0 {
        return Err(ShellError::Scale {
            width: extent.width,
            height: extent.height,
            message: "zero-sized target".to_string(),
        });
    }
    Ok(())
}

/// Largest size at `source`'s aspect ratio that fits within `bounds`.
/// Mirrors the load-at-scale behavior of common pixel buffer loaders.
fn aspect_fit(source: Extent, bounds: Extent) -> Extent {
    let scale = f64::min(
        bounds.width as f64 / source.width as f64,
        bounds.height as f64 / source.height as f64,
    );
    Extent::new(
        ((source.width as f64 * scale).round() as u32).max(1),
        ((source.height as f64 * scale).round() as u32).max(1),
    )
}
