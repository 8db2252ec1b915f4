use super::{CommandOutcome, ControlPanel};
use crate::error::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Console command bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Disarm,
    ArmHome,
    ArmAway,
    /// Toggle the nth installed sensor (zero-based)
    ToggleSensor(usize),
    RefreshCamera,
    ScanImage,
    Quit,
}

impl KeyCommand {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('d') => Some(KeyCommand::Disarm),
            KeyCode::Char('h') => Some(KeyCommand::ArmHome),
            KeyCode::Char('a') => Some(KeyCommand::ArmAway),
            KeyCode::Char(c @ '1'..='9') => {
                Some(KeyCommand::ToggleSensor(c as usize - '1' as usize))
            }
            KeyCode::Char('r') => Some(KeyCommand::RefreshCamera),
            KeyCode::Char('s') => Some(KeyCommand::ScanImage),
            KeyCode::Char('q') | KeyCode::Esc => Some(KeyCommand::Quit),
            _ => None,
        }
    }

    /// One-line key help for the console banner
    pub fn help() -> &'static str {
        "[d] disarm  [h] arm home  [a] arm away  [1-9] toggle sensor  [r] refresh camera  [s] scan  [q] quit"
    }
}

/// Keyboard front-end for the control panel
pub struct KeyboardControl {
    cancellation_token: CancellationToken,
}

impl KeyboardControl {
    pub fn new() -> Self {
        Self {
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Start reading keys on a blocking task; the task owns the panel
    pub fn start(&self, mut panel: ControlPanel) -> JoinHandle<()> {
        info!("Starting keyboard control: {}", KeyCommand::help());

        let cancellation_token = self.cancellation_token.clone();

        task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard control stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        let key_event = match event::read() {
                            Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                                key_event
                            }
                            _ => continue,
                        };

                        let Some(command) = KeyCommand::from_key(key_event.code) else {
                            debug!("Unbound key pressed: {:?}", key_event.code);
                            continue;
                        };

                        match panel.apply(command) {
                            Ok(CommandOutcome::Continue) => {}
                            Ok(CommandOutcome::Shutdown) => break,
                            Err(e) => warn!("Command {:?} failed: {}", command, e),
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            }
            debug!("Keyboard control task exited");
        })
    }

    /// Stop the keyboard task
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping keyboard control");
        self.cancellation_token.cancel();

        // Give the task a moment to leave raw mode itself
        tokio::time::sleep(Duration::from_millis(200)).await;
        let _ = disable_raw_mode();

        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

impl Default for KeyboardControl {
    fn default() -> Self {
        Self::new()
    }
}
