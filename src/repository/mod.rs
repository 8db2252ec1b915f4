mod file;
mod memory;

pub use file::JsonFileSecurityRepository;
pub use memory::InMemorySecurityRepository;

use crate::data::{AlarmStatus, ArmingStatus, Sensor, SensorSet};
use crate::error::Result;

/// Storage for alarm state and sensors
///
/// Getters are served from the repository's current view and never fail.
/// Writes may fail when the implementation persists them.
pub trait SecurityRepository: Send {
    fn alarm_status(&self) -> AlarmStatus;

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()>;

    fn arming_status(&self) -> ArmingStatus;

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()>;

    fn sensors(&self) -> SensorSet;

    /// Look up a single sensor by id
    fn sensor(&self, id: &str) -> Option<Sensor> {
        self.sensors().get(id).cloned()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<()>;

    /// Remove a sensor; removing an unknown id is a no-op
    fn remove_sensor(&mut self, id: &str) -> Result<()>;

    /// Store the given sensor value, inserting it if the id is unknown
    fn update_sensor(&mut self, sensor: Sensor) -> Result<()>;
}

impl<T: SecurityRepository + ?Sized> SecurityRepository for Box<T> {
    fn alarm_status(&self) -> AlarmStatus {
        (**self).alarm_status()
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        (**self).set_alarm_status(status)
    }

    fn arming_status(&self) -> ArmingStatus {
        (**self).arming_status()
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        (**self).set_arming_status(status)
    }

    fn sensors(&self) -> SensorSet {
        (**self).sensors()
    }

    fn sensor(&self, id: &str) -> Option<Sensor> {
        (**self).sensor(id)
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&mut self, id: &str) -> Result<()> {
        (**self).remove_sensor(id)
    }

    fn update_sensor(&mut self, sensor: Sensor) -> Result<()> {
        (**self).update_sensor(sensor)
    }
}
