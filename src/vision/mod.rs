mod classifier;
mod frame;
mod source;

pub use classifier::{FakeImageClassifier, ImageClassifier};
pub use frame::CameraImage;
pub use source::DirectoryImageSource;
