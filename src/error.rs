use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Sensor not found: {id}")]
    SensorNotFound { id: String },

    #[error("Image classifier error: {message}")]
    Classifier { message: String },

    #[error("Listener '{listener}' failed: {message}")]
    Listener { listener: String, message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

/// Event bus specific errors
#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("Failed to publish event: {details}")]
    PublishFailed { details: String },

    #[error("Event bus channel closed")]
    ChannelClosed,
}

impl SecurityError {
    pub fn component<C: Into<String>, M: Into<String>>(component: C, message: M) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn sensor_not_found<S: Into<String>>(id: S) -> Self {
        Self::SensorNotFound { id: id.into() }
    }

    pub fn classifier<S: Into<String>>(message: S) -> Self {
        Self::Classifier {
            message: message.into(),
        }
    }

    pub fn listener<L: Into<String>, M: Into<String>>(listener: L, message: M) -> Self {
        Self::Listener {
            listener: listener.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SecurityError>;
