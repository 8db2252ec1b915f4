//! Alarm state machine
//!
//! [`SecurityService`] combines arming changes, sensor activations and camera
//! scans into an [`AlarmStatus`], writes the result through the repository and
//! fans the change out to registered listeners.

use crate::data::{AlarmStatus, ArmingStatus, Sensor, SensorSet};
use crate::error::{Result, SecurityError};
use crate::listener::{ListenerRegistry, StatusListener};
use crate::repository::SecurityRepository;
use crate::vision::{CameraImage, ImageClassifier};
use std::sync::Arc;
use tracing::{debug, info};


/// Confidence (percent) the classifier must reach to report a cat
pub const CAT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Receives changes to the security system and decides the alarm status
pub struct SecurityService<R, C> {
    repository: R,
    classifier: C,
    listeners: ListenerRegistry,
    cat_detected: bool,
}

impl<R, C> SecurityService<R, C>
where
    R: SecurityRepository,
    C: ImageClassifier,
{
    pub fn new(repository: R, classifier: C) -> Self {
        Self {
            repository,
            classifier,
            listeners: ListenerRegistry::new(),
            cat_detected: false,
        }
    }

    /// Change the arming status
    ///
    /// Disarming forces `NoAlarm`. Arming resets every sensor to inactive and
    /// raises the alarm straight away if the last scan saw a cat.
    pub fn set_arming_status(&mut self, arming_status: ArmingStatus) -> Result<()> {
        info!("Arming status -> {}", arming_status);

        match arming_status {
            ArmingStatus::Disarmed => {
                self.set_alarm_status(AlarmStatus::NoAlarm)?;
            }
            ArmingStatus::ArmedHome | ArmingStatus::ArmedAway => {
                if self.cat_detected {
                    self.set_alarm_status(AlarmStatus::Alarm)?;
                }
                self.deactivate_all_sensors()?;
            }
        }

        self.repository.set_arming_status(arming_status)?;
        self.listeners.notify_sensor_status_changed();
        Ok(())
    }

    fn deactivate_all_sensors(&mut self) -> Result<()> {
        for sensor in self.repository.sensors() {
            self.repository.update_sensor(sensor.with_active(false))?;
        }
        Ok(())
    }

    /// Change the alarm status and notify listeners
    ///
    /// While every sensor is inactive, a pending alarm is cleared to
    /// `NoAlarm` whatever status was requested. Listeners are told the
    /// requested status either way.
    pub fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        let current = self.repository.alarm_status();

        if current == AlarmStatus::PendingAlarm && self.all_sensors_in_state(false) {
            debug!(
                "All sensors inactive while pending, storing {} instead of {}",
                AlarmStatus::NoAlarm,
                status
            );
            self.repository.set_alarm_status(AlarmStatus::NoAlarm)?;
        } else {
            debug!("Alarm status {} -> {}", current, status);
            self.repository.set_alarm_status(status)?;
        }

        self.listeners.notify_alarm_status(status);
        Ok(())
    }

    /// Change a sensor's activation and update the alarm status if needed
    ///
    /// Any change other than inactive -> active that involves an active value
    /// goes through the deactivation rule, including re-activating a sensor
    /// that is already active.
    pub fn change_sensor_activation_status(&mut self, sensor_id: &str, active: bool) -> Result<()> {
        let sensor = self
            .repository
            .sensor(sensor_id)
            .ok_or_else(|| SecurityError::sensor_not_found(sensor_id))?;

        debug!(
            "Sensor '{}' activation {} -> {}",
            sensor.name, sensor.active, active
        );

        match (sensor.active, active) {
            (false, true) => self.handle_sensor_activated()?,
            (true, _) => self.handle_sensor_deactivated()?,
            (false, false) => {}
        }

        self.repository.update_sensor(sensor.with_active(active))?;
        Ok(())
    }

    fn handle_sensor_activated(&mut self) -> Result<()> {
        if !self.repository.arming_status().is_armed() {
            return Ok(());
        }

        match self.repository.alarm_status() {
            AlarmStatus::NoAlarm => self.set_alarm_status(AlarmStatus::PendingAlarm),
            AlarmStatus::PendingAlarm => self.set_alarm_status(AlarmStatus::Alarm),
            AlarmStatus::Alarm => Ok(()),
        }
    }

    fn handle_sensor_deactivated(&mut self) -> Result<()> {
        if !self.repository.arming_status().is_armed() {
            return Ok(());
        }

        if self.repository.alarm_status() == AlarmStatus::PendingAlarm {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }
        Ok(())
    }

    /// Scan a camera frame for a cat and update the alarm status
    pub fn process_image(&mut self, image: &CameraImage) -> Result<()> {
        let cat = self
            .classifier
            .image_contains_cat(image, CAT_CONFIDENCE_THRESHOLD)?;
        self.cat_detected = cat;
        info!("Camera scan: cat {}", if cat { "detected" } else { "not detected" });

        self.handle_cat_detected(cat)
    }

    fn handle_cat_detected(&mut self, cat: bool) -> Result<()> {
        if cat && self.repository.arming_status() == ArmingStatus::ArmedHome {
            self.set_alarm_status(AlarmStatus::Alarm)?;
        } else if !cat && self.all_sensors_in_state(false) {
            self.set_alarm_status(AlarmStatus::NoAlarm)?;
        }

        self.listeners.notify_cat_detected(cat);
        Ok(())
    }

    fn all_sensors_in_state(&self, active: bool) -> bool {
        self.repository.sensors().all_in_state(active)
    }

    /// Register a listener; registering the same listener again has no effect
    pub fn add_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_status_listener(&mut self, listener: &Arc<dyn StatusListener>) {
        self.listeners.remove(listener);
    }

    pub fn alarm_status(&self) -> AlarmStatus {
        self.repository.alarm_status()
    }

    pub fn arming_status(&self) -> ArmingStatus {
        self.repository.arming_status()
    }

    pub fn sensors(&self) -> SensorSet {
        self.repository.sensors()
    }

    /// Result of the most recent camera scan
    pub fn cat_detected(&self) -> bool {
        self.cat_detected
    }

    pub fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        info!("Adding sensor {}", sensor);
        self.repository.add_sensor(sensor)
    }

    pub fn remove_sensor(&mut self, sensor_id: &str) -> Result<()> {
        info!("Removing sensor {}", sensor_id);
        self.repository.remove_sensor(sensor_id)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
