use crate::error::Result;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single camera frame handed to the image classifier
#[derive(Debug, Clone)]
pub struct CameraImage {
    image: DynamicImage,
    source: Option<PathBuf>,
}

impl CameraImage {
    /// Wrap an already decoded image
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            source: None,
        }
    }

    /// Decode an image file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;
        debug!(
            "Loaded camera image {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self {
            image,
            source: Some(path.to_path_buf()),
        })
    }

    /// A black frame, used when no camera image is available
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(DynamicImage::ImageRgb8(RgbImage::new(width, height)))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// File the frame was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
