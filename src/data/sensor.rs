use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Kind of physical sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorType::Door => "DOOR",
            SensorType::Window => "WINDOW",
            SensorType::Motion => "MOTION",
        };
        f.write_str(name)
    }
}

/// A door, window or motion sensor
///
/// Sensors are plain values. The repository owns the stored copy and the
/// security service writes changes back with an explicit update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub sensor_type: SensorType,
    pub active: bool,
}

impl Sensor {
    /// Create a new inactive sensor with a random id
    pub fn new<S: Into<String>>(name: S, sensor_type: SensorType) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, sensor_type)
    }

    /// Create a new inactive sensor with a caller-chosen id
    pub fn with_id<I: Into<String>, S: Into<String>>(
        id: I,
        name: S,
        sensor_type: SensorType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    /// Return a copy of this sensor with the given activation
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {}",
            self.name,
            self.sensor_type,
            if self.active { "active" } else { "inactive" }
        )
    }
}

/// Sensors keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorSet {
    sensors: BTreeMap<String, Sensor>,
}

impl SensorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sensor, replacing any stored sensor with the same id
    pub fn insert(&mut self, sensor: Sensor) -> Option<Sensor> {
        self.sensors.insert(sensor.id.clone(), sensor)
    }

    pub fn remove(&mut self, id: &str) -> Option<Sensor> {
        self.sensors.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Sensor> {
        self.sensors.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sensors.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Iterate sensors in id order
    pub fn iter(&self) -> impl Iterator<Item = &Sensor> {
        self.sensors.values()
    }

    /// True when every sensor has the given activation (vacuously true when empty)
    pub fn all_in_state(&self, active: bool) -> bool {
        self.sensors.values().all(|sensor| sensor.active == active)
    }

    pub fn active_count(&self) -> usize {
        self.sensors.values().filter(|sensor| sensor.active).count()
    }
}

impl FromIterator<Sensor> for SensorSet {
    fn from_iter<T: IntoIterator<Item = Sensor>>(iter: T) -> Self {
        let mut set = SensorSet::new();
        for sensor in iter {
            set.insert(sensor);
        }
        set
    }
}

impl IntoIterator for SensorSet {
    type Item = Sensor;
    type IntoIter = std::collections::btree_map::IntoValues<String, Sensor>;

    fn into_iter(self) -> Self::IntoIter {
        self.sensors.into_values()
    }
}
