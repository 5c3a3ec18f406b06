use crate::{Pt2, Real};
use serde::{Deserialize, Serialize};

/// One item found in a scan by the external detector.
///
/// Coordinates are in image pixels (item center). The detector is treated
/// as an untrusted source: the engine re-checks `is_correct` and rejects
/// non-finite geometry before evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedItem {
    pub item_slug: String,
    pub x_px: Real,
    pub y_px: Real,
    #[serde(default)]
    pub width_px: Real,
    #[serde(default)]
    pub height_px: Real,
    /// Rotation in degrees, image frame.
    #[serde(default)]
    pub rotation: Real,
    #[serde(default = "default_confidence")]
    pub confidence: Real,
    /// Set during triage; only `true` items are scored.
    #[serde(default = "default_is_correct")]
    pub is_correct: bool,
}

fn default_confidence() -> Real {
    1.0
}

fn default_is_correct() -> bool {
    true
}

impl DetectedItem {
    /// A triaged-correct detection at a pixel position.
    pub fn new(item_slug: impl Into<String>, x_px: Real, y_px: Real, rotation: Real) -> Self {
        Self {
            item_slug: item_slug.into(),
            x_px,
            y_px,
            width_px: 0.0,
            height_px: 0.0,
            rotation,
            confidence: 1.0,
            is_correct: true,
        }
    }

    pub fn position(&self) -> Pt2 {
        Pt2::new(self.x_px, self.y_px)
    }

    /// True when position and rotation are finite numbers.
    pub fn has_finite_geometry(&self) -> bool {
        self.x_px.is_finite() && self.y_px.is_finite() && self.rotation.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_take_defaults() {
        let item: DetectedItem =
            serde_json::from_str(r#"{"item_slug":"mouse","x_px":550,"y_px":320}"#).unwrap();
        assert!(item.is_correct);
        assert_eq!(item.rotation, 0.0);
        assert_eq!(item.confidence, 1.0);
        assert_eq!(item.position(), Pt2::new(550.0, 320.0));
    }

    #[test]
    fn non_finite_geometry_is_flagged() {
        let mut item = DetectedItem::new("cup", 1.0, 2.0, 0.0);
        assert!(item.has_finite_geometry());
        item.rotation = Real::NAN;
        assert!(!item.has_finite_geometry());
    }
}
