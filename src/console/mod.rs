mod keyboard;
mod panel;
mod status;

pub use keyboard::{KeyCommand, KeyboardControl};
pub use panel::{CommandOutcome, ControlPanel};
pub use status::ConsoleStatusListener;
