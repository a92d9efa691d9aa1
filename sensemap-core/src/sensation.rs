//! Sensation categories and their canonical colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, FaceColor};

/// A categorical sensation a user can paint onto the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensation {
    /// Tingling, pins and needles.
    Paresthesia,
    /// Pressure.
    Pressure,
    /// Perceived movement.
    Movement,
    /// Vibration.
    Vibration,
}

impl Sensation {
    /// Every sensation, in control-table order.
    pub const ALL: [Sensation; 4] = [
        Sensation::Paresthesia,
        Sensation::Pressure,
        Sensation::Movement,
        Sensation::Vibration,
    ];

    /// The canonical color painted for this sensation.
    #[must_use]
    pub const fn color(self) -> FaceColor {
        match self {
            Sensation::Paresthesia => FaceColor::new(1.0, 0.0, 0.0),
            Sensation::Pressure => FaceColor::new(1.0, 0.5, 0.0),
            Sensation::Movement => FaceColor::new(0.0, 0.0, 1.0),
            Sensation::Vibration => FaceColor::new(0.0, 1.0, 0.0),
        }
    }

    /// Lower-case name, as used in command names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Sensation::Paresthesia => "paresthesia",
            Sensation::Pressure => "pressure",
            Sensation::Movement => "movement",
            Sensation::Vibration => "vibration",
        }
    }
}

impl fmt::Display for Sensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sensation::ALL
            .into_iter()
            .find(|sensation| sensation.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownCommand(s.to_string()))
    }
}
