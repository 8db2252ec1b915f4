use serde::{Deserialize, Serialize};
use std::fmt;

/// Alarm escalation level of the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlarmStatus {
    #[default]
    NoAlarm,
    PendingAlarm,
    Alarm,
}

impl AlarmStatus {
    /// All alarm statuses, lowest escalation first
    pub const ALL: [AlarmStatus; 3] = [
        AlarmStatus::NoAlarm,
        AlarmStatus::PendingAlarm,
        AlarmStatus::Alarm,
    ];

    /// Human-readable status text shown on the status panel
    pub fn description(&self) -> &'static str {
        match self {
            AlarmStatus::NoAlarm => "Cool and Good",
            AlarmStatus::PendingAlarm => "I'm in Danger...",
            AlarmStatus::Alarm => "Awooga!",
        }
    }

    /// Panel background color as (r, g, b)
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            AlarmStatus::NoAlarm => (120, 200, 30),
            AlarmStatus::PendingAlarm => (200, 150, 20),
            AlarmStatus::Alarm => (250, 80, 50),
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlarmStatus::NoAlarm => "NO_ALARM",
            AlarmStatus::PendingAlarm => "PENDING_ALARM",
            AlarmStatus::Alarm => "ALARM",
        };
        f.write_str(name)
    }
}

/// Whether the system is disarmed or armed (and how)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArmingStatus {
    #[default]
    Disarmed,
    ArmedHome,
    ArmedAway,
}

impl ArmingStatus {
    pub const ALL: [ArmingStatus; 3] = [
        ArmingStatus::Disarmed,
        ArmingStatus::ArmedHome,
        ArmingStatus::ArmedAway,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            ArmingStatus::Disarmed => "Disarmed",
            ArmingStatus::ArmedHome => "Armed - At Home",
            ArmingStatus::ArmedAway => "Armed - Away",
        }
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self, ArmingStatus::Disarmed)
    }
}

impl fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArmingStatus::Disarmed => "DISARMED",
            ArmingStatus::ArmedHome => "ARMED_HOME",
            ArmingStatus::ArmedAway => "ARMED_AWAY",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(AlarmStatus::default(), AlarmStatus::NoAlarm);
        assert_eq!(ArmingStatus::default(), ArmingStatus::Disarmed);
    }

    #[test]
    fn test_alarm_presentation_metadata() {
        assert_eq!(AlarmStatus::Alarm.description(), "Awooga!");
        assert_eq!(AlarmStatus::NoAlarm.color(), (120, 200, 30));
        assert_eq!(AlarmStatus::PendingAlarm.to_string(), "PENDING_ALARM");
    }

    #[test]
    fn test_is_armed() {
        assert!(!ArmingStatus::Disarmed.is_armed());
        assert!(ArmingStatus::ArmedHome.is_armed());
        assert!(ArmingStatus::ArmedAway.is_armed());
    }
}
