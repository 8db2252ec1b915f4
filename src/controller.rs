use crate::config::SecurityConfig;
use crate::data::{AlarmStatus, ArmingStatus, Sensor, SensorSet};
use crate::error::Result;
use crate::listener::StatusListener;
use crate::repository::{InMemorySecurityRepository, JsonFileSecurityRepository, SecurityRepository};
use crate::service::SecurityService;
use crate::vision::{CameraImage, FakeImageClassifier, ImageClassifier};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Security service over boxed collaborators
pub type DynSecurityService =
    SecurityService<Box<dyn SecurityRepository>, Box<dyn ImageClassifier>>;

/// Cloneable handle that serializes access to the security service
///
/// Each method holds the lock for the whole operation, so the
/// read-decide-write sequence of one operation never interleaves with another.
#[derive(Clone)]
pub struct SecurityController {
    service: Arc<Mutex<DynSecurityService>>,
}

impl SecurityController {
    pub fn new(
        repository: Box<dyn SecurityRepository>,
        classifier: Box<dyn ImageClassifier>,
    ) -> Self {
        Self {
            service: Arc::new(Mutex::new(SecurityService::new(repository, classifier))),
        }
    }

    /// Wire up the repository and classifier described by the configuration
    pub fn from_config(config: &SecurityConfig) -> Result<Self> {
        config.validate()?;

        let repository: Box<dyn SecurityRepository> = if config.repository.persist {
            let repository = JsonFileSecurityRepository::open(&config.repository.path)?;
            info!("Persisting security state to {}", repository.path().display());
            Box::new(repository)
        } else {
            info!("Persistence disabled, using in-memory repository");
            Box::new(InMemorySecurityRepository::new())
        };

        let classifier = Box::new(FakeImageClassifier::new(
            config.classifier.cat_probability,
            config.classifier.seed,
        ));

        let controller = Self::new(repository, classifier);

        if controller.sensors().is_empty() {
            for sensor in &config.system.default_sensors {
                controller.add_sensor(Sensor::new(sensor.name.clone(), sensor.sensor_type))?;
            }
        }

        Ok(controller)
    }

    pub fn set_arming_status(&self, status: ArmingStatus) -> Result<()> {
        self.service.lock().set_arming_status(status)
    }

    pub fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        self.service.lock().set_alarm_status(status)
    }

    pub fn change_sensor_activation_status(&self, sensor_id: &str, active: bool) -> Result<()> {
        self.service
            .lock()
            .change_sensor_activation_status(sensor_id, active)
    }

    /// Flip a sensor's activation, returning the new value
    pub fn toggle_sensor(&self, sensor_id: &str) -> Result<bool> {
        let mut service = self.service.lock();
        let active = service
            .sensors()
            .get(sensor_id)
            .map(|sensor| !sensor.active)
            .unwrap_or(true);
        service.change_sensor_activation_status(sensor_id, active)?;
        Ok(active)
    }

    pub fn process_image(&self, image: &CameraImage) -> Result<()> {
        self.service.lock().process_image(image)
    }

    pub fn add_status_listener(&self, listener: Arc<dyn StatusListener>) {
        self.service.lock().add_status_listener(listener);
    }

    pub fn remove_status_listener(&self, listener: &Arc<dyn StatusListener>) {
        self.service.lock().remove_status_listener(listener);
    }

    pub fn alarm_status(&self) -> AlarmStatus {
        self.service.lock().alarm_status()
    }

    pub fn arming_status(&self) -> ArmingStatus {
        self.service.lock().arming_status()
    }

    pub fn cat_detected(&self) -> bool {
        self.service.lock().cat_detected()
    }

    pub fn sensors(&self) -> SensorSet {
        self.service.lock().sensors()
    }

    /// Sensor ids in a stable order, for mapping key presses to sensors
    pub fn sensor_ids(&self) -> Vec<String> {
        self.sensors().iter().map(|sensor| sensor.id.clone()).collect()
    }

    pub fn add_sensor(&self, sensor: Sensor) -> Result<()> {
        self.service.lock().add_sensor(sensor)
    }

    pub fn remove_sensor(&self, sensor_id: &str) -> Result<()> {
        self.service.lock().remove_sensor(sensor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SensorType;
    use crate::error::SecurityError;
    use tempfile::TempDir;

    fn memory_config() -> SecurityConfig {
        let mut config = SecurityConfig::default();
        config.repository.persist = false;
        config.classifier.cat_probability = 0.0;
        config
    }

    #[test]
    fn test_from_config_installs_default_sensors() {
        let controller = SecurityController::from_config(&memory_config()).unwrap();

        assert_eq!(controller.sensors().len(), 3);
        assert_eq!(controller.arming_status(), ArmingStatus::Disarmed);
        assert_eq!(controller.alarm_status(), AlarmStatus::NoAlarm);
    }

    #[test]
    fn test_from_config_rejects_invalid_probability() {
        let mut config = memory_config();
        config.classifier.cat_probability = f64::NAN;

        assert!(matches!(
            SecurityController::from_config(&config),
            Err(SecurityError::Config(_))
        ));
    }

    #[test]
    fn test_persisted_sensors_are_not_duplicated() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = memory_config();
        config.repository.persist = true;
        config.repository.path = temp_dir
            .path()
            .join("state.json")
            .to_string_lossy()
            .to_string();

        let first = SecurityController::from_config(&config).unwrap();
        first.set_arming_status(ArmingStatus::ArmedAway).unwrap();
        drop(first);

        let second = SecurityController::from_config(&config).unwrap();
        assert_eq!(second.sensors().len(), 3);
        assert_eq!(second.arming_status(), ArmingStatus::ArmedAway);
    }

    #[test]
    fn test_toggle_sensor_escalates() {
        let mut config = memory_config();
        config.system.default_sensors.clear();
        let controller = SecurityController::from_config(&config).unwrap();
        controller
            .add_sensor(Sensor::with_id("a", "Door", SensorType::Door))
            .unwrap();
        controller
            .add_sensor(Sensor::with_id("b", "Window", SensorType::Window))
            .unwrap();
        controller.set_arming_status(ArmingStatus::ArmedHome).unwrap();

        assert!(controller.toggle_sensor("a").unwrap());
        assert_eq!(controller.alarm_status(), AlarmStatus::PendingAlarm);
        assert!(controller.toggle_sensor("b").unwrap());
        assert_eq!(controller.alarm_status(), AlarmStatus::Alarm);
        assert!(!controller.toggle_sensor("a").unwrap());
        assert_eq!(controller.alarm_status(), AlarmStatus::Alarm);

        assert!(matches!(
            controller.toggle_sensor("missing"),
            Err(SecurityError::SensorNotFound { .. })
        ));
    }

    #[test]
    fn test_no_cat_scan_clears_alarm_once_sensors_reset() {
        let mut config = memory_config();
        config.system.default_sensors.clear();
        let controller = SecurityController::from_config(&config).unwrap();
        controller.set_alarm_status(AlarmStatus::Alarm).unwrap();

        controller.process_image(&CameraImage::blank(8, 8)).unwrap();

        assert!(!controller.cat_detected());
        assert_eq!(controller.alarm_status(), AlarmStatus::NoAlarm);
    }

    #[test]
    fn test_concurrent_toggles_keep_state_consistent() {
        let mut config = memory_config();
        config.system.default_sensors.clear();
        let controller = SecurityController::from_config(&config).unwrap();
        for i in 0..8 {
            controller
                .add_sensor(Sensor::with_id(format!("s{}", i), "Motion", SensorType::Motion))
                .unwrap();
        }
        controller.set_arming_status(ArmingStatus::ArmedAway).unwrap();

        let handles: Vec<_> = controller
            .sensor_ids()
            .into_iter()
            .map(|id| {
                let controller = controller.clone();
                std::thread::spawn(move || controller.toggle_sensor(&id).unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert!(controller.sensors().all_in_state(true));
        assert_eq!(controller.alarm_status(), AlarmStatus::Alarm);
    }
}
