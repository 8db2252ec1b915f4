use crate::data::AlarmStatus;
use crate::error::Result;
use crate::listener::StatusListener;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::QueueableCommand;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Prints the alarm status line in the status color
///
/// Cat and sensor signals are ignored; only the alarm status is shown.
pub struct ConsoleStatusListener {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleStatusListener {
    /// Listener that writes to stdout
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Print the status line without going through the state machine
    pub fn render(&self, status: AlarmStatus) -> Result<()> {
        let (r, g, b) = status.color();
        let mut out = self.out.lock();

        out.queue(Print("System Status: "))?
            .queue(SetBackgroundColor(Color::Rgb { r, g, b }))?
            .queue(SetForegroundColor(Color::Black))?
            .queue(Print(format!(" {} ", status.description())))?
            .queue(ResetColor)?
            .queue(Print("\r\n"))?;
        out.flush()?;
        Ok(())
    }
}

impl StatusListener for ConsoleStatusListener {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, status: AlarmStatus) -> Result<()> {
        self.render(status)
    }
}
