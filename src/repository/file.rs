use super::SecurityRepository;
use crate::data::{AlarmStatus, ArmingStatus, Sensor, SensorSet};
use crate::error::{Result, SecurityError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk layout of the security state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PersistedState {
    #[serde(default)]
    alarm_status: AlarmStatus,
    #[serde(default)]
    arming_status: ArmingStatus,
    #[serde(default)]
    sensors: SensorSet,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Repository that writes its full state to a JSON file on every change
///
/// Reads are served from memory. Each write replaces the file through a
/// temporary sibling so a crash never leaves a half-written state file.
#[derive(Debug)]
pub struct JsonFileSecurityRepository {
    path: PathBuf,
    state: PersistedState,
}

impl JsonFileSecurityRepository {
    /// Open the state file at `path`, starting fresh if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let state: PersistedState = serde_json::from_str(&content)?;
            info!(
                "Loaded security state from {} ({} sensors, {}, {})",
                path.display(),
                state.sensors.len(),
                state.arming_status,
                state.alarm_status
            );
            state
        } else {
            info!(
                "No security state at {}, starting with defaults",
                path.display()
            );
            PersistedState::default()
        };

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last successful write, if any
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.state.updated_at
    }

    /// Write `next` to disk and adopt it only once the file is in place
    fn commit(&mut self, mut next: PersistedState) -> Result<()> {
        next.updated_at = Some(Utc::now());

        let json = serde_json::to_string_pretty(&next)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SecurityError::component(
                        "repository",
                        format!("Failed to create state directory: {}", e),
                    )
                })?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;

        self.state = next;
        debug!("Saved security state to {}", self.path.display());
        Ok(())
    }

    fn update<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut PersistedState),
    {
        let mut next = self.state.clone();
        change(&mut next);
        self.commit(next)
    }
}

impl SecurityRepository for JsonFileSecurityRepository {
    fn alarm_status(&self) -> AlarmStatus {
        self.state.alarm_status
    }

    fn set_alarm_status(&mut self, status: AlarmStatus) -> Result<()> {
        self.update(|state| state.alarm_status = status)
    }

    fn arming_status(&self) -> ArmingStatus {
        self.state.arming_status
    }

    fn set_arming_status(&mut self, status: ArmingStatus) -> Result<()> {
        self.update(|state| state.arming_status = status)
    }

    fn sensors(&self) -> SensorSet {
        self.state.sensors.clone()
    }

    fn sensor(&self, id: &str) -> Option<Sensor> {
        self.state.sensors.get(id).cloned()
    }

    fn add_sensor(&mut self, sensor: Sensor) -> Result<()> {
        self.update(|state| {
            state.sensors.insert(sensor);
        })
    }

    fn remove_sensor(&mut self, id: &str) -> Result<()> {
        if !self.state.sensors.contains(id) {
            return Ok(());
        }
        self.update(|state| {
            state.sensors.remove(id);
        })
    }

    fn update_sensor(&mut self, sensor: Sensor) -> Result<()> {
        self.update(|state| {
            state.sensors.insert(sensor);
        })
    }
}
