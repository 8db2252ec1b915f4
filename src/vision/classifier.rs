use super::CameraImage;
use crate::error::{Result, SecurityError};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// External capability that decides whether a frame shows a cat
pub trait ImageClassifier: Send {
    /// Return true when a cat is found with at least `confidence_threshold` percent confidence
    fn image_contains_cat(&self, image: &CameraImage, confidence_threshold: f32) -> Result<bool>;
}

impl<T: ImageClassifier + ?Sized> ImageClassifier for Box<T> {
    fn image_contains_cat(&self, image: &CameraImage, confidence_threshold: f32) -> Result<bool> {
        (**self).image_contains_cat(image, confidence_threshold)
    }
}

/// Stand-in classifier that reports a cat at random
///
/// The confidence threshold is accepted but ignored. Supply a seed to get a
/// reproducible sequence of answers.
pub struct FakeImageClassifier {
    cat_probability: f64,
    rng: Mutex<StdRng>,
}

impl FakeImageClassifier {
    pub fn new(cat_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cat_probability = if cat_probability.is_nan() {
            0.0
        } else {
            cat_probability.clamp(0.0, 1.0)
        };

        Self {
            cat_probability,
            rng: Mutex::new(rng),
        }
    }

    pub fn cat_probability(&self) -> f64 {
        self.cat_probability
    }
}

impl ImageClassifier for FakeImageClassifier {
    fn image_contains_cat(&self, image: &CameraImage, confidence_threshold: f32) -> Result<bool> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SecurityError::classifier(format!(
                "cannot scan an empty {}x{} frame",
                width, height
            )));
        }

        let found = self.rng.lock().gen_bool(self.cat_probability);
        debug!(
            "Fake classifier scanned {}x{} frame (threshold {:.1}%): cat={}",
            width, height, confidence_threshold, found
        );
        Ok(found)
    }
}
