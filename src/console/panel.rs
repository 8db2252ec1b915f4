use super::KeyCommand;
use crate::controller::SecurityController;
use crate::data::ArmingStatus;
use crate::error::Result;
use crate::events::{EventBus, SecurityEvent};
use crate::vision::{CameraImage, DirectoryImageSource};
use chrono::Utc;
use tracing::{info, warn};

/// What the console loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Shutdown,
}

/// Applies console commands to the security controller
///
/// Holds the camera image source and the frame currently "on screen", the
/// way the camera panel of a GUI would.
pub struct ControlPanel {
    controller: SecurityController,
    image_source: DirectoryImageSource,
    current_image: Option<CameraImage>,
    event_bus: EventBus,
}

impl ControlPanel {
    pub fn new(
        controller: SecurityController,
        image_source: DirectoryImageSource,
        event_bus: EventBus,
    ) -> Self {
        Self {
            controller,
            image_source,
            current_image: None,
            event_bus,
        }
    }

    pub fn current_image(&self) -> Option<&CameraImage> {
        self.current_image.as_ref()
    }

    pub fn apply(&mut self, command: KeyCommand) -> Result<CommandOutcome> {
        match command {
            KeyCommand::Disarm => self.controller.set_arming_status(ArmingStatus::Disarmed)?,
            KeyCommand::ArmHome => self.controller.set_arming_status(ArmingStatus::ArmedHome)?,
            KeyCommand::ArmAway => self.controller.set_arming_status(ArmingStatus::ArmedAway)?,
            KeyCommand::ToggleSensor(index) => {
                let ids = self.controller.sensor_ids();
                match ids.get(index) {
                    Some(id) => {
                        let active = self.controller.toggle_sensor(id)?;
                        info!(
                            "Sensor #{} is now {}",
                            index + 1,
                            if active { "active" } else { "inactive" }
                        );
                    }
                    None => warn!("No sensor #{} ({} installed)", index + 1, ids.len()),
                }
            }
            KeyCommand::RefreshCamera => {
                let image = self.image_source.next_image()?;
                match image.source() {
                    Some(path) => info!("Camera showing {}", path.display()),
                    None => info!("Camera showing a blank frame"),
                }
                self.current_image = Some(image);
            }
            KeyCommand::ScanImage => {
                if self.current_image.is_none() {
                    self.current_image = Some(self.image_source.next_image()?);
                }
                if let Some(image) = &self.current_image {
                    self.controller.process_image(image)?;
                }
            }
            KeyCommand::Quit => {
                let event = SecurityEvent::ShutdownRequested {
                    reason: "User requested via keyboard".to_string(),
                    timestamp: Utc::now(),
                };
                if let Err(e) = self.event_bus.publish(event) {
                    warn!("Failed to publish shutdown event: {}", e);
                }
                return Ok(CommandOutcome::Shutdown);
            }
        }

        Ok(CommandOutcome::Continue)
    }
}
