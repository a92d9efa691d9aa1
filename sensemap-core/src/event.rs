//! Input events delivered to a session.

use serde::{Deserialize, Serialize};

use crate::UiCommand;

/// A position in viewport pixels, origin top-left, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// All input a session can receive, in delivery order.
///
/// Recorded sessions serialize as a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Primary button pressed.
    PointerDown {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Pointer moved (button state unknown to the source).
    PointerMove {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Primary button released.
    PointerUp {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Viewport resized.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },

    /// A semantic command, e.g. from a keyboard shortcut.
    Command {
        /// The command to run.
        command: UiCommand,
    },
}

impl InputEvent {
    /// The pointer position carried by pointer events.
    #[must_use]
    pub fn position(&self) -> Option<ScreenPoint> {
        match *self {
            InputEvent::PointerDown { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerUp { x, y } => Some(ScreenPoint::new(x, y)),
            InputEvent::Resize { .. } | InputEvent::Command { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sensation;

    #[test]
    fn test_event_log_round_trip() {
        let json = r#"[
            {"type": "resize", "width": 800, "height": 600},
            {"type": "command", "command": "select-sensation:pressure"},
            {"type": "pointer_down", "x": 10.0, "y": 20.5},
            {"type": "pointer_up", "x": 10.0, "y": 20.5}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).expect("parse");
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            InputEvent::Command {
                command: UiCommand::SelectSensation(Sensation::Pressure)
            }
        );
        assert_eq!(events[2].position(), Some(ScreenPoint::new(10.0, 20.5)));
        assert_eq!(events[0].position(), None);
    }
}
