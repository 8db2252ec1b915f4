mod sensor;
mod status;

pub use sensor::{Sensor, SensorSet, SensorType};
pub use status::{AlarmStatus, ArmingStatus};
