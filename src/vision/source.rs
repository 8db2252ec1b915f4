use super::CameraImage;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Cycles through the image files of a directory as camera frames
pub struct DirectoryImageSource {
    directory: PathBuf,
    blank_resolution: (u32, u32),
    next_index: usize,
}

impl DirectoryImageSource {
    pub fn new<P: AsRef<Path>>(directory: P, blank_resolution: (u32, u32)) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            blank_resolution,
            next_index: 0,
        }
    }

    /// Image files currently in the directory, sorted by path
    pub fn list_images(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "Cannot read image directory {}: {}",
                    self.directory.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut images: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();
        images.sort();
        images
    }

    /// Load the next frame, wrapping around; a blank frame when the directory has no images
    pub fn next_image(&mut self) -> Result<CameraImage> {
        let images = self.list_images();
        if images.is_empty() {
            warn!(
                "No images in {}, using a blank frame",
                self.directory.display()
            );
            let (width, height) = self.blank_resolution;
            return Ok(CameraImage::blank(width, height));
        }

        let index = self.next_index % images.len();
        self.next_index = index + 1;
        CameraImage::open(&images[index])
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_yields_blank_frame() {
        let mut source = DirectoryImageSource::new("/nonexistent/images", (32, 24));
        let frame = source.next_image().unwrap();

        assert_eq!(frame.dimensions(), (32, 24));
        assert!(frame.source().is_none());
    }

    #[test]
    fn test_cycles_through_images_in_order() {
        let temp_dir = TempDir::new().unwrap();
        RgbImage::new(2, 2).save(temp_dir.path().join("b.png")).unwrap();
        RgbImage::new(3, 3).save(temp_dir.path().join("a.png")).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = DirectoryImageSource::new(temp_dir.path(), (32, 24));
        assert_eq!(source.list_images().len(), 2);

        assert_eq!(source.next_image().unwrap().dimensions(), (3, 3));
        assert_eq!(source.next_image().unwrap().dimensions(), (2, 2));
        assert_eq!(source.next_image().unwrap().dimensions(), (3, 3));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        assert!(is_image_file(Path::new("cat.JPG")));
        assert!(!is_image_file(Path::new("cat.txt")));
        assert!(!is_image_file(Path::new("cat")));
    }
}
