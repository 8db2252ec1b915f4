use crate::data::SensorType;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SecurityConfig {
    pub repository: RepositoryConfig,
    pub classifier: ClassifierConfig,
    pub camera: CameraConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RepositoryConfig {
    /// Path of the JSON state file
    #[serde(default = "default_repository_path")]
    pub path: String,

    /// Persist state to disk (false keeps everything in memory)
    #[serde(default = "default_persist")]
    pub persist: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassifierConfig {
    /// Probability that the fake classifier reports a cat (0.0 - 1.0)
    #[serde(default = "default_cat_probability")]
    pub cat_probability: f64,

    /// Seed for reproducible classifier answers
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Directory of images served as camera frames
    #[serde(default = "default_image_dir")]
    pub image_dir: String,

    /// Size of the blank frame used when no image is available
    #[serde(default = "default_blank_resolution")]
    pub blank_resolution: (u32, u32),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    /// Sensors installed when the repository has none
    #[serde(default = "default_sensors")]
    pub default_sensors: Vec<DefaultSensor>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultSensor {
    pub name: String,
    pub sensor_type: SensorType,
}

impl SecurityConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("udasecurity.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("repository.path", default_repository_path())?
            .set_default("repository.persist", default_persist())?
            .set_default("classifier.cat_probability", default_cat_probability())?
            .set_default("camera.image_dir", default_image_dir())?
            .set_default(
                "camera.blank_resolution",
                vec![default_blank_resolution().0, default_blank_resolution().1],
            )?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Environment variables such as UDASECURITY_REPOSITORY__PATH
            .add_source(
                Environment::with_prefix("UDASECURITY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: SecurityConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.persist && self.repository.path.trim().is_empty() {
            return Err(ConfigError::Message(
                "Repository path must not be empty when persistence is enabled".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.classifier.cat_probability) {
            return Err(ConfigError::Message(
                "Classifier cat_probability must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.camera.blank_resolution.0 == 0 || self.camera.blank_resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera blank_resolution must be greater than 0".to_string(),
            ));
        }

        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        if self
            .system
            .default_sensors
            .iter()
            .any(|sensor| sensor.name.trim().is_empty())
        {
            return Err(ConfigError::Message(
                "Default sensors must have a name".to_string(),
            ));
        }

        Ok(())
    }

    /// Render this configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryConfig {
                path: default_repository_path(),
                persist: default_persist(),
            },
            classifier: ClassifierConfig {
                cat_probability: default_cat_probability(),
                seed: None,
            },
            camera: CameraConfig {
                image_dir: default_image_dir(),
                blank_resolution: default_blank_resolution(),
            },
            system: SystemConfig {
                event_bus_capacity: default_event_bus_capacity(),
                default_sensors: default_sensors(),
            },
        }
    }
}

// Default value functions
fn default_repository_path() -> String {
    "udasecurity-state.json".to_string()
}
fn default_persist() -> bool {
    true
}

fn default_cat_probability() -> f64 {
    0.5
}

fn default_image_dir() -> String {
    "./images".to_string()
}
fn default_blank_resolution() -> (u32, u32) {
    (640, 480)
}

fn default_event_bus_capacity() -> usize {
    100
}
fn default_sensors() -> Vec<DefaultSensor> {
    vec![
        DefaultSensor {
            name: "Front Door".to_string(),
            sensor_type: SensorType::Door,
        },
        DefaultSensor {
            name: "Back Window".to_string(),
            sensor_type: SensorType::Window,
        },
        DefaultSensor {
            name: "Hallway Motion".to_string(),
            sensor_type: SensorType::Motion,
        },
    ]
}
