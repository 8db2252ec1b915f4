use super::SecurityRepository;
use crate::data::{AlarmStatus, ArmingStatus, Sensor, SensorSet};
use crate::error::Result;
use tracing::trace;

/// Volatile repository, used when persistence is disabled and in tests
#[derive(Debug, Clone, Default)]
pub struct InMemorySecurityRepository {
    alarm_status: AlarmStatus,
    arming_status: ArmingStatus,
    sensors: SensorSet,
}

impl InMemorySecurityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with state
    pub fn with_state(
        alarm_status: AlarmStatus,
        arming_status: ArmingStatus,
        sensors: SensorSet,
    ) -> Self {
        Self {
            alarm_status,
            arming_status,
            sensors,
        }
    }
}

impl SecurityRepository for InMemorySecurityRepository {
    fn alarm_status(&self) -> AlarmStatus {
        self.alarm_status
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        trace!("Storing alarm status {}", status);
        self.alarm_status = status;
        Ok(())
    }

    fn arming_status(&self) -> ArmingStatus {
        self.arming_status
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        trace!("Storing arming status {}", status);
        self.arming_status = status;
        Ok(())
    }

    fn sensors(&self) -> SensorSet {
        self.sensors.clone()
    }

    fn sensor(&self, id: &str) -> Option<Sensor> {
        self.sensors.get(id).cloned()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        self.sensors.insert(sensor);
        Ok(())
    }

    fn remove_sensor(&mut self, id: &str) -> Result<()> {
        self.sensors.remove(id);
        Ok(())
    }

    fn update_sensor(&mut self, sensor: Sensor) -> Result<()> {
        self.sensors.insert(sensor);
        Ok(())
    }
}
