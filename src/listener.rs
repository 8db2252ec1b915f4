use crate::data::AlarmStatus;
use crate::error::{Result, SecurityError};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{trace, warn};

/// Observer of alarm, cat-detection and sensor changes
pub trait StatusListener: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        "listener"
    }

    /// The alarm status changed
    fn notify(&self, status: AlarmStatus) -> Result<()>;

    /// The camera was scanned for a cat
    fn cat_detected(&self, _detected: bool) -> Result<()> {
        Ok(())
    }

    /// Sensor activation or arming changed
    fn sensor_status_changed(&self) -> Result<()> {
        Ok(())
    }
}

/// Identity of a registered listener: the address of its shared allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(usize);

impl ListenerKey {
    pub fn of(listener: &Arc<dyn StatusListener>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }
}

/// Set of listeners deduplicated by [`ListenerKey`]
///
/// A listener that returns an error or panics is logged and skipped; the
/// remaining listeners are still notified.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<(ListenerKey, Arc<dyn StatusListener>)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns false if it was already registered
    pub fn add(&mut self, listener: Arc<dyn StatusListener>) -> bool {
        let key = ListenerKey::of(&listener);
        if self.contains_key(key) {
            trace!("Listener '{}' already registered", listener.name());
            return false;
        }
        self.listeners.push((key, listener));
        true
    }

    /// Unregister a listener; returns false if it was not registered
    pub fn remove(&mut self, listener: &Arc<dyn StatusListener>) -> bool {
        let key = ListenerKey::of(listener);
        let before = self.listeners.len();
        self.listeners.retain(|(k, _)| *k != key);
        self.listeners.len() != before
    }

    fn contains_key(&self, key: ListenerKey) -> bool {
        self.listeners.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_alarm_status(&self, status: AlarmStatus) {
        self.broadcast("alarm status", |listener| listener.notify(status));
    }

    pub fn notify_cat_detected(&self, detected: bool) {
        self.broadcast("cat detection", |listener| listener.cat_detected(detected));
    }

    pub fn notify_sensor_status_changed(&self) {
        self.broadcast("sensor status", |listener| listener.sensor_status_changed());
    }

    fn broadcast<F>(&self, what: &str, call: F)
    where
        F: Fn(&dyn StatusListener) -> Result<()>,
    {
        for (_, listener) in &self.listeners {
            let outcome = catch_unwind(AssertUnwindSafe(|| call(listener.as_ref())))
                .unwrap_or_else(|panic| {
                    Err(SecurityError::listener(
                        listener.name(),
                        format!("panicked: {}", panic_message(panic.as_ref())),
                    ))
                });

            if let Err(e) = outcome {
                warn!(listener = listener.name(), "Failed to deliver {} update: {}", what, e);
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
