//! Per-face colors and the blending rule for overlapping annotations.
//!
//! The first sensation painted on a face replaces the unpainted gray. Every
//! later application averages the incoming color with whatever the face
//! currently holds:
//!
//! ```text
//! unpainted ──paint(a)──▶ a ──paint(b)──▶ (a + b) / 2 ──paint(c)──▶ ((a + b) / 2 + c) / 2
//! ```
//!
//! Because each step averages against the accumulator rather than the set of
//! contributing sensations, the result depends on painting order.

use serde::{Deserialize, Serialize};

/// Per-channel tolerance used when comparing against the unpainted sentinel.
pub const COLOR_EPSILON: f32 = 1e-5;

/// An RGB color in `[0, 1]^3` stored for a single face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct FaceColor {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl FaceColor {
    /// The gray every face starts with.
    pub const UNPAINTED: FaceColor = FaceColor::new(0.8, 0.8, 0.8);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Whether every channel is within [`COLOR_EPSILON`] of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.r - other.r).abs() <= COLOR_EPSILON
            && (self.g - other.g).abs() <= COLOR_EPSILON
            && (self.b - other.b).abs() <= COLOR_EPSILON
    }

    /// Whether this face has never been annotated.
    #[must_use]
    pub fn is_unpainted(&self) -> bool {
        self.approx_eq(&Self::UNPAINTED)
    }

    /// Componentwise average of two colors.
    #[must_use]
    pub fn average(&self, other: &Self) -> Self {
        Self::new(
            (self.r + other.r) / 2.0,
            (self.g + other.g) / 2.0,
            (self.b + other.b) / 2.0,
        )
    }

    /// The channels as an array.
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize to 8-bit RGB, clamping out-of-range channels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Default for FaceColor {
    fn default() -> Self {
        Self::UNPAINTED
    }
}

impl From<[f32; 3]> for FaceColor {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<FaceColor> for [f32; 3] {
    fn from(color: FaceColor) -> Self {
        color.to_array()
    }
}

const RED: FaceColor = FaceColor::new(1.0, 0.0, 0.0);
const BLUE: FaceColor = FaceColor::new(0.0, 0.0, 1.0);

/// Combine a face's current color with an incoming sensation color.
///
/// An unpainted face takes `incoming` as-is. Anything else is averaged with
/// `incoming`, so painting red then blue yields `(0.5, 0.0, 0.5)`.
#[must_use]
pub fn blend(current: FaceColor, incoming: FaceColor) -> FaceColor {
    if current.is_unpainted() {
        return incoming;
    }

    let blended = current.average(&incoming);
    tracing::debug!(?current, ?incoming, ?blended, "Blended face color");
    if current.approx_eq(&RED) && incoming.approx_eq(&BLUE) {
        tracing::debug!("red+blue sanity case: averaging red and blue gives a purple hue");
    }
    blended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sensation;

    const GREEN: FaceColor = FaceColor::new(0.0, 1.0, 0.0);

    #[test]
    fn test_first_paint_overwrites() {
        for sensation in Sensation::ALL {
            assert_eq!(blend(FaceColor::UNPAINTED, sensation.color()), sensation.color());
        }
    }

    #[test]
    fn test_same_sensation_twice_is_stable() {
        let once = blend(FaceColor::UNPAINTED, RED);
        assert_eq!(blend(once, RED), RED);
    }

    #[test]
    fn test_red_plus_blue() {
        assert_eq!(blend(RED, BLUE), FaceColor::new(0.5, 0.0, 0.5));
    }

    #[test]
    fn test_order_sensitivity() {
        let forward = blend(blend(blend(FaceColor::UNPAINTED, RED), GREEN), BLUE);
        let backward = blend(blend(blend(FaceColor::UNPAINTED, BLUE), GREEN), RED);
        assert_ne!(forward, backward);
        assert_eq!(forward, FaceColor::new(0.25, 0.25, 0.5));
        assert_eq!(backward, FaceColor::new(0.5, 0.25, 0.25));
    }

    #[test]
    fn test_repeated_blend_keeps_moving() {
        let pressure = Sensation::Pressure.color();
        let first = blend(blend(FaceColor::UNPAINTED, RED), pressure);
        let second = blend(first, pressure);
        assert_ne!(first, second);
    }

    #[test]
    fn test_sentinel_tolerance() {
        let almost = FaceColor::new(0.8 + 1e-6, 0.8, 0.8 - 1e-6);
        assert!(almost.is_unpainted());
        assert!(!FaceColor::new(0.81, 0.8, 0.8).is_unpainted());
    }

    #[test]
    fn test_to_rgb8() {
        assert_eq!(FaceColor::new(1.0, 0.5, 0.0).to_rgb8(), [255, 128, 0]);
        assert_eq!(FaceColor::new(2.0, -1.0, 0.0).to_rgb8(), [255, 0, 0]);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&FaceColor::new(1.0, 0.5, 0.0)).expect("serialize");
        assert_eq!(json, "[1.0,0.5,0.0]");
        let back: FaceColor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, FaceColor::new(1.0, 0.5, 0.0));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_sensation() -> impl Strategy<Value = Sensation> {
            prop::sample::select(Sensation::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn prop_blending_stays_in_unit_cube(
                strokes in prop::collection::vec(arb_sensation(), 1..32)
            ) {
                let mut color = FaceColor::UNPAINTED;
                for sensation in &strokes {
                    color = blend(color, sensation.color());
                }
                for channel in color.to_array() {
                    prop_assert!(
                        (0.0..=1.0).contains(&channel),
                        "channel {} escaped [0, 1]",
                        channel
                    );
                }
            }

            #[test]
            fn prop_first_stroke_is_exact(sensation in arb_sensation()) {
                prop_assert_eq!(blend(FaceColor::UNPAINTED, sensation.color()), sensation.color());
            }
        }
    }
}
