//! Screen-space overlay controls and hit testing.
//!
//! There is no widget toolkit inside the 3D viewport. Controls are labels
//! drawn at fixed screen rectangles, and pointer presses are matched against
//! those rectangles by hand before they can reach the mesh.
//!
//! ```text
//!                                   W-150    W-50
//!   ┌──────────────────────────────────┬───────┬──┐
//!   │                          row 0   │Paresth│  │  y = 10 .. 35
//!   │                          row 1   │Pressur│  │  y = 50 .. 75
//!   │          3D view         ...     │  ...  │  │
//!   │                          row 8   │ Quit  │  │  y = 330 .. 355
//!   │                                  └───────┘  │
//!   └─────────────────────────────────────────────┘
//! ```
//!
//! The table is rebuilt wholesale whenever the viewport size or the active
//! command changes, so labels never go stale.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, FaceColor, ScreenPoint, Sensation};

const SELECT_PREFIX: &str = "select-sensation:";

/// A logical command bound to an overlay control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UiCommand {
    /// Start (or switch) painting with a sensation.
    SelectSensation(Sensation),
    /// Leave painting mode.
    Stop,
    /// Freeze the camera and suppress painting.
    Lock,
    /// Re-enable the camera.
    Unlock,
    /// Capture a snapshot of the current frame.
    Save,
    /// End the session.
    Quit,
}

impl UiCommand {
    /// Every command, in control-table row order.
    pub const ALL: [UiCommand; 9] = [
        UiCommand::SelectSensation(Sensation::Paresthesia),
        UiCommand::SelectSensation(Sensation::Pressure),
        UiCommand::SelectSensation(Sensation::Movement),
        UiCommand::SelectSensation(Sensation::Vibration),
        UiCommand::Stop,
        UiCommand::Save,
        UiCommand::Lock,
        UiCommand::Unlock,
        UiCommand::Quit,
    ];

    /// The plain display name of the control.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            UiCommand::SelectSensation(Sensation::Paresthesia) => "Paresthesia",
            UiCommand::SelectSensation(Sensation::Pressure) => "Pressure",
            UiCommand::SelectSensation(Sensation::Movement) => "Movement",
            UiCommand::SelectSensation(Sensation::Vibration) => "Vibration",
            UiCommand::Stop => "Stop",
            UiCommand::Save => "Save",
            UiCommand::Lock => "Lock",
            UiCommand::Unlock => "Unlock",
            UiCommand::Quit => "Quit",
        }
    }

    /// Label as drawn: upper-case when highlighted.
    #[must_use]
    pub fn label(self, highlighted: bool) -> String {
        if highlighted {
            self.title().to_uppercase()
        } else {
            self.title().to_string()
        }
    }

    /// Text color of the control.
    #[must_use]
    pub const fn color(self) -> FaceColor {
        match self {
            UiCommand::SelectSensation(sensation) => sensation.color(),
            UiCommand::Stop | UiCommand::Lock | UiCommand::Unlock => FaceColor::new(0.0, 0.0, 0.0),
            UiCommand::Save => FaceColor::new(0.0, 0.5, 0.0),
            UiCommand::Quit => FaceColor::new(1.0, 0.0, 0.0),
        }
    }
}

impl fmt::Display for UiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiCommand::SelectSensation(sensation) => write!(f, "{SELECT_PREFIX}{sensation}"),
            UiCommand::Stop => f.write_str("stop"),
            UiCommand::Lock => f.write_str("lock"),
            UiCommand::Unlock => f.write_str("unlock"),
            UiCommand::Save => f.write_str("save"),
            UiCommand::Quit => f.write_str("quit"),
        }
    }
}

impl FromStr for UiCommand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let command = match name.as_str() {
            "stop" => UiCommand::Stop,
            "lock" => UiCommand::Lock,
            "unlock" => UiCommand::Unlock,
            "save" => UiCommand::Save,
            "quit" => UiCommand::Quit,
            other => {
                let sensation = other.strip_prefix(SELECT_PREFIX).unwrap_or(other);
                UiCommand::SelectSensation(
                    sensation
                        .parse()
                        .map_err(|_| CoreError::UnknownCommand(s.to_string()))?,
                )
            }
        };
        Ok(command)
    }
}

impl TryFrom<String> for UiCommand {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UiCommand> for String {
    fn from(command: UiCommand) -> Self {
        command.to_string()
    }
}

/// Axis-aligned screen rectangle with inclusive bounds on all edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl Rect {
    /// Create a rectangle from its corners.
    #[must_use]
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Whether the point lies inside or on the border.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    /// Whether two rectangles share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Placement of the control column relative to the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Distance from the right edge of the viewport to each control's left edge.
    pub right_inset: f32,
    /// Control width.
    pub width: f32,
    /// Top edge of the first row.
    pub top_offset: f32,
    /// Vertical distance between consecutive rows.
    pub row_spacing: f32,
    /// Control height.
    pub row_height: f32,
    /// Label font size in points.
    pub font_size: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            right_inset: 150.0,
            width: 100.0,
            top_offset: 10.0,
            row_spacing: 40.0,
            row_height: 25.0,
            font_size: 16,
        }
    }
}

/// A control as it should be drawn and hit-tested right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiControl {
    /// Command run when the control is pressed.
    pub command: UiCommand,
    /// Hit rectangle in viewport pixels.
    pub rect: Rect,
    /// Text to draw.
    pub label: String,
    /// Text color.
    pub color: FaceColor,
    /// Whether this control matches the active mode or last action.
    pub highlighted: bool,
    /// Label font size in points.
    pub font_size: u32,
}

/// The control table for a viewport of a given size.
#[derive(Debug, Clone)]
pub struct OverlayLayout {
    style: OverlayStyle,
    width: u32,
    height: u32,
    active: Option<UiCommand>,
    controls: Vec<UiControl>,
}

impl OverlayLayout {
    /// Build the table for a `width` x `height` viewport with nothing
    /// highlighted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OverlappingControls`] if the style makes any two
    /// control rectangles share a point.
    pub fn new(style: OverlayStyle, width: u32, height: u32) -> CoreResult<Self> {
        let mut layout = Self {
            style,
            width,
            height,
            active: None,
            controls: Vec::new(),
        };
        layout.rebuild();
        layout.check_disjoint()?;
        Ok(layout)
    }

    /// Re-anchor every control to a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rebuild();
    }

    /// Change which control is highlighted.
    pub fn set_active(&mut self, active: Option<UiCommand>) {
        self.active = active;
        self.rebuild();
    }

    /// The first control whose rectangle contains `point`.
    #[must_use]
    pub fn hit_test(&self, point: ScreenPoint) -> Option<UiCommand> {
        self.controls
            .iter()
            .find(|control| control.rect.contains(point))
            .map(|control| control.command)
    }

    /// The current control table in row order.
    #[must_use]
    pub fn controls(&self) -> &[UiControl] {
        &self.controls
    }

    /// The highlighted command, if any.
    #[must_use]
    pub fn active(&self) -> Option<UiCommand> {
        self.active
    }

    /// Current viewport size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Rectangle of a specific control.
    #[must_use]
    pub fn rect_of(&self, command: UiCommand) -> Option<Rect> {
        self.controls
            .iter()
            .find(|control| control.command == command)
            .map(|control| control.rect)
    }

    #[allow(clippy::cast_precision_loss)]
    fn rebuild(&mut self) {
        let style = &self.style;
        let x0 = self.width as f32 - style.right_inset;
        self.controls = UiCommand::ALL
            .iter()
            .enumerate()
            .map(|(row, &command)| {
                let y0 = style.top_offset + row as f32 * style.row_spacing;
                let highlighted = self.active == Some(command);
                UiControl {
                    command,
                    rect: Rect::new(x0, y0, x0 + style.width, y0 + style.row_height),
                    label: command.label(highlighted),
                    color: command.color(),
                    highlighted,
                    font_size: style.font_size,
                }
            })
            .collect();
    }

    fn check_disjoint(&self) -> CoreResult<()> {
        for (i, a) in self.controls.iter().enumerate() {
            if let Some(b) = self.controls[i + 1..]
                .iter()
                .find(|b| a.rect.intersects(&b.rect))
            {
                return Err(CoreError::OverlappingControls {
                    first: a.command.to_string(),
                    second: b.command.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> OverlayLayout {
        OverlayLayout::new(OverlayStyle::default(), 800, 600).expect("disjoint layout")
    }

    #[test]
    fn test_control_table_order_and_geometry() {
        let layout = layout();
        let controls = layout.controls();
        assert_eq!(controls.len(), 9);
        assert_eq!(controls[0].command, UiCommand::SelectSensation(Sensation::Paresthesia));
        assert_eq!(controls[0].rect, Rect::new(650.0, 10.0, 750.0, 35.0));
        assert_eq!(controls[4].command, UiCommand::Stop);
        assert_eq!(controls[4].rect, Rect::new(650.0, 170.0, 750.0, 195.0));
        assert_eq!(controls[8].command, UiCommand::Quit);
        assert_eq!(controls[8].rect, Rect::new(650.0, 330.0, 750.0, 355.0));
    }

    #[test]
    fn test_hit_test_corners_inclusive() {
        let layout = layout();
        let rect = layout.rect_of(UiCommand::Save).expect("save control");
        for (x, y) in [
            (rect.x0, rect.y0),
            (rect.x1, rect.y0),
            (rect.x0, rect.y1),
            (rect.x1, rect.y1),
        ] {
            assert_eq!(layout.hit_test(ScreenPoint::new(x, y)), Some(UiCommand::Save));
        }
    }

    #[test]
    fn test_hit_test_one_unit_outside() {
        let layout = layout();
        let rect = layout.rect_of(UiCommand::Save).expect("save control");
        let mid_x = (rect.x0 + rect.x1) / 2.0;
        let mid_y = (rect.y0 + rect.y1) / 2.0;
        for point in [
            ScreenPoint::new(rect.x0 - 1.0, mid_y),
            ScreenPoint::new(rect.x1 + 1.0, mid_y),
            ScreenPoint::new(mid_x, rect.y0 - 1.0),
            ScreenPoint::new(mid_x, rect.y1 + 1.0),
        ] {
            assert_ne!(layout.hit_test(point), Some(UiCommand::Save), "{point:?}");
        }
    }

    #[test]
    fn test_miss_over_the_mesh() {
        assert_eq!(layout().hit_test(ScreenPoint::new(100.0, 300.0)), None);
    }

    #[test]
    fn test_resize_reanchors_to_right_edge() {
        let mut layout = layout();
        layout.resize(1200, 900);
        let rect = layout.rect_of(UiCommand::Quit).expect("quit control");
        assert_eq!(rect.x0, 1050.0);
        assert_eq!(layout.hit_test(ScreenPoint::new(700.0, 340.0)), None);
        assert_eq!(layout.hit_test(ScreenPoint::new(1100.0, 340.0)), Some(UiCommand::Quit));
    }

    #[test]
    fn test_exactly_one_highlight() {
        let mut layout = layout();
        assert!(layout.controls().iter().all(|c| !c.highlighted));

        layout.set_active(Some(UiCommand::SelectSensation(Sensation::Pressure)));
        let lit: Vec<_> = layout.controls().iter().filter(|c| c.highlighted).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].label, "PRESSURE");

        layout.set_active(Some(UiCommand::Lock));
        let lit: Vec<_> = layout.controls().iter().filter(|c| c.highlighted).collect();
        assert_eq!(lit.len(), 1);
        assert_eq!(lit[0].label, "LOCK");
        let pressure = &layout.controls()[1];
        assert_eq!(pressure.label, "Pressure");
    }

    #[test]
    fn test_overlapping_style_is_rejected() {
        let style = OverlayStyle {
            row_spacing: 20.0,
            row_height: 25.0,
            ..OverlayStyle::default()
        };
        let err = OverlayLayout::new(style, 800, 600).expect_err("rows overlap");
        assert!(matches!(err, CoreError::OverlappingControls { .. }));
    }

    #[test]
    fn test_touching_rows_are_rejected() {
        let style = OverlayStyle {
            row_spacing: 25.0,
            row_height: 25.0,
            ..OverlayStyle::default()
        };
        assert!(OverlayLayout::new(style, 800, 600).is_err());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(
            "Select-Sensation:VIBRATION".parse::<UiCommand>().ok(),
            Some(UiCommand::SelectSensation(Sensation::Vibration))
        );
        assert_eq!(
            "Pressure".parse::<UiCommand>().ok(),
            Some(UiCommand::SelectSensation(Sensation::Pressure))
        );
        assert_eq!("QUIT".parse::<UiCommand>().ok(), Some(UiCommand::Quit));
        assert!("redo".parse::<UiCommand>().is_err());
        for command in UiCommand::ALL {
            assert_eq!(command.to_string().parse::<UiCommand>().ok(), Some(command));
        }
    }
}
