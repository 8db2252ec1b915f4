use crate::data::AlarmStatus;
use crate::error::{EventBusError, Result};
use crate::listener::StatusListener;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Events published by the security system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SecurityEvent {
    /// The alarm status changed
    AlarmStatusChanged {
        status: AlarmStatus,
        timestamp: DateTime<Utc>,
    },
    /// A camera frame was scanned for a cat
    CatDetected {
        detected: bool,
        timestamp: DateTime<Utc>,
    },
    /// Sensor activation or arming changed
    SensorStatusChanged { timestamp: DateTime<Utc> },
    /// System shutdown requested
    ShutdownRequested {
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl SecurityEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SecurityEvent::AlarmStatusChanged { timestamp, .. } => *timestamp,
            SecurityEvent::CatDetected { timestamp, .. } => *timestamp,
            SecurityEvent::SensorStatusChanged { timestamp } => *timestamp,
            SecurityEvent::ShutdownRequested { timestamp, .. } => *timestamp,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            SecurityEvent::AlarmStatusChanged { status, .. } => {
                format!("Alarm status changed to {} ({})", status, status.description())
            }
            SecurityEvent::CatDetected { detected, .. } => {
                if *detected {
                    "Cat detected".to_string()
                } else {
                    "No cat detected".to_string()
                }
            }
            SecurityEvent::SensorStatusChanged { .. } => "Sensor status changed".to_string(),
            SecurityEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            SecurityEvent::AlarmStatusChanged { .. } => "alarm_status_changed",
            SecurityEvent::CatDetected { .. } => "cat_detected",
            SecurityEvent::SensorStatusChanged { .. } => "sensor_status_changed",
            SecurityEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Event bus for fanning security events out to async consumers
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SecurityEvent>,
}

impl EventBus {
    /// Create a new event bus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events and get a receiver
    pub fn subscribe(&self) -> broadcast::Receiver<SecurityEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers, returning how many received it
    pub fn publish(&self, event: SecurityEvent) -> std::result::Result<usize, EventBusError> {
        match &event {
            SecurityEvent::AlarmStatusChanged { status, .. } => match status {
                AlarmStatus::Alarm => warn!("ALARM: {}", status.description()),
                _ => info!("Alarm status: {}", status.description()),
            },
            SecurityEvent::CatDetected { detected: true, .. } => {
                info!("Cat detected by camera");
            }
            SecurityEvent::ShutdownRequested { reason, .. } => {
                info!("Shutdown requested: {}", reason);
            }
            _ => debug!("Event: {}", event.description()),
        }

        self.sender
            .send(event)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

/// Event filter for selective event handling
#[derive(Debug, Clone)]
pub enum EventFilter {
    All,
    EventTypes(Vec<&'static str>),
}

impl EventFilter {
    pub fn matches(&self, event: &SecurityEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::EventTypes(types) => types.contains(&event.event_type()),
        }
    }
}

/// Named, filtered receiver
pub struct EventReceiver {
    receiver: broadcast::Receiver<SecurityEvent>,
    filter: EventFilter,
    name: String,
}

impl EventReceiver {
    pub fn new(
        receiver: broadcast::Receiver<SecurityEvent>,
        filter: EventFilter,
        name: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            name,
        }
    }

    /// Receive the next event that passes the filter
    ///
    /// Lagging is logged and skipped; only a closed bus ends the stream.
    pub async fn recv(&mut self) -> std::result::Result<SecurityEvent, EventBusError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        debug!(
                            "Receiver '{}' received event: {}",
                            self.name,
                            event.description()
                        );
                        return Ok(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Receiver '{}' lagged behind by {} events", self.name, n);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed for receiver '{}'", self.name);
                    return Err(EventBusError::ChannelClosed);
                }
            }
        }
    }
}

/// Status listener that republishes every notification on an [`EventBus`]
pub struct EventBusListener {
    event_bus: EventBus,
}

impl EventBusListener {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    fn forward(&self, event: SecurityEvent) -> Result<()> {
        if let Err(e) = self.event_bus.publish(event) {
            // No subscribers is not a failure for the state machine
            debug!("Event not delivered: {}", e);
        }
        Ok(())
    }
}

impl StatusListener for EventBusListener {
    fn name(&self) -> &str {
        "event_bus"
    }

    fn notify(&self, status: AlarmStatus) -> Result<()> {
        self.forward(SecurityEvent::AlarmStatusChanged {
            status,
            timestamp: Utc::now(),
        })
    }

    fn cat_detected(&self, detected: bool) -> Result<()> {
        self.forward(SecurityEvent::CatDetected {
            detected,
            timestamp: Utc::now(),
        })
    }

    fn sensor_status_changed(&self) -> Result<()> {
        self.forward(SecurityEvent::SensorStatusChanged {
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_event_bus_basic_operations() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();

        let subscriber_count = event_bus
            .publish(SecurityEvent::CatDetected {
                detected: true,
                timestamp: Utc::now(),
            })
            .unwrap();
        assert_eq!(subscriber_count, 1);

        match receiver.recv().await.unwrap() {
            SecurityEvent::CatDetected { detected, .. } => assert!(detected),
            _ => panic!("Unexpected event type"),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_fails() {
        let event_bus = EventBus::new(10);
        assert!(!event_bus.has_subscribers());

        let result = event_bus.publish(SecurityEvent::SensorStatusChanged {
            timestamp: Utc::now(),
        });
        assert!(matches!(result, Err(EventBusError::PublishFailed { .. })));
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();
        assert_eq!(event_bus.subscriber_count(), 2);

        event_bus
            .publish(SecurityEvent::SensorStatusChanged {
                timestamp: Utc::now(),
            })
            .unwrap();

        let _ = timeout(Duration::from_millis(100), receiver1.recv())
            .await
            .unwrap()
            .unwrap();
        let _ = timeout(Duration::from_millis(100), receiver2.recv())
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_filtered_receiver() {
        let event_bus = EventBus::new(10);
        let filter = EventFilter::EventTypes(vec!["alarm_status_changed"]);
        let mut receiver = EventReceiver::new(event_bus.subscribe(), filter, "test".to_string());

        event_bus
            .publish(SecurityEvent::CatDetected {
                detected: false,
                timestamp: Utc::now(),
            })
            .unwrap();
        event_bus
            .publish(SecurityEvent::AlarmStatusChanged {
                status: AlarmStatus::PendingAlarm,
                timestamp: Utc::now(),
            })
            .unwrap();

        let event = timeout(Duration::from_millis(100), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event_type(), "alarm_status_changed");
    }

    #[tokio::test]
    async fn test_bus_listener_forwards_notifications() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();
        let listener = EventBusListener::new(event_bus.clone());

        listener.notify(AlarmStatus::Alarm).unwrap();
        listener.cat_detected(true).unwrap();
        listener.sensor_status_changed().unwrap();

        let types: Vec<&str> = vec![
            receiver.recv().await.unwrap().event_type(),
            receiver.recv().await.unwrap().event_type(),
            receiver.recv().await.unwrap().event_type(),
        ];
        assert_eq!(
            types,
            vec!["alarm_status_changed", "cat_detected", "sensor_status_changed"]
        );
    }

    #[test]
    fn test_bus_listener_tolerates_missing_subscribers() {
        let listener = EventBusListener::new(EventBus::new(4));
        assert!(listener.notify(AlarmStatus::NoAlarm).is_ok());
    }
}
