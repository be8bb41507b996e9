//! Image payload codec
//!
//! Grid cells hold images of any type implementing [`CellImage`]; autosave
//! turns them into text through an [`ImageCodec`]. The default codec,
//! [`PngCodec`], stores images as base64 encoded PNG.

use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, GenericImageView, ImageFormat};

/// Image content a grid cell can hold.
pub trait CellImage: Clone + fmt::Debug {
    /// Returns true if the image has no pixels and should not be persisted.
    fn is_empty(&self) -> bool;
}

/// Converts cell images to and from a text payload.
///
/// Both directions are fallible without an error type: a cell whose image
/// cannot be encoded is saved without one, and a payload that cannot be
/// decoded restores an empty cell.
pub trait ImageCodec {
    /// Image type handled by this codec.
    type Image: CellImage;

    /// Encodes an image, or returns `None` if it cannot be encoded.
    fn encode(&self, image: &Self::Image) -> Option<String>;

    /// Decodes a payload, or returns `None` if it is not a valid image.
    fn decode(&self, payload: &str) -> Option<Self::Image>;
}

/// Shared, immutable raster image.
///
/// Cloning is cheap, so the same image can sit in a cell and in an
/// in-flight encoding job.
#[derive(Clone)]
pub struct RasterImage(Arc<DynamicImage>);

impl RasterImage {
    /// Wraps a decoded image.
    #[must_use]
    pub fn new(image: DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decodes image bytes in any format the `image` crate recognizes.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the bytes are not a supported image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        image::load_from_memory(bytes).map(Self::new)
    }

    /// Returns the underlying image.
    #[must_use]
    pub fn image(&self) -> &DynamicImage {
        &self.0
    }

    /// Returns `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("RasterImage")
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

impl PartialEq for RasterImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.as_bytes() == other.0.as_bytes()
    }
}

impl CellImage for RasterImage {
    fn is_empty(&self) -> bool {
        let (width, height) = self.dimensions();
        width == 0 || height == 0
    }
}

/// Base64 encoded PNG codec for [`RasterImage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    type Image = RasterImage;

    fn encode(&self, image: &RasterImage) -> Option<String> {
        if image.is_empty() {
            return None;
        }
        let mut buffer = Cursor::new(Vec::new());
        if let Err(e) = image.image().write_to(&mut buffer, ImageFormat::Png) {
            tracing::warn!(error = %e, "Failed to encode cell image as PNG");
            return None;
        }
        Some(STANDARD.encode(buffer.into_inner()))
    }

    fn decode(&self, payload: &str) -> Option<RasterImage> {
        let bytes = match STANDARD.decode(payload.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Image payload is not valid base64");
                return None;
            }
        };
        match RasterImage::from_bytes(&bytes) {
            Ok(image) if !image.is_empty() => Some(image),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode image payload");
                None
            }
        }
    }
}
