pub mod config;
pub mod console;
pub mod controller;
pub mod data;
pub mod error;
pub mod events;
pub mod listener;
pub mod repository;
pub mod service;
pub mod vision;

pub use crate::config::SecurityConfig;
pub use console::{CommandOutcome, ConsoleStatusListener, ControlPanel, KeyCommand, KeyboardControl};
pub use controller::{DynSecurityService, SecurityController};
pub use data::{AlarmStatus, ArmingStatus, Sensor, SensorSet, SensorType};
pub use error::{EventBusError, Result, SecurityError};
pub use events::{EventBus, EventBusListener, EventFilter, EventReceiver, SecurityEvent};
pub use listener::{ListenerKey, ListenerRegistry, StatusListener};
pub use repository::{InMemorySecurityRepository, JsonFileSecurityRepository, SecurityRepository};
pub use service::{SecurityService, CAT_CONFIDENCE_THRESHOLD};
pub use vision::{CameraImage, DirectoryImageSource, FakeImageClassifier, ImageClassifier};
