//! Engine configuration.
//!
//! Every component receives its slice of [`EngineConfig`] explicitly; there is
//! no ambient global state. All structs deserialize with per-field defaults,
//! so a partial JSON document overrides only what it names.

use crate::Real;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of a standard ID-1 card (credit card) in centimeters.
pub const STANDARD_CARD_WIDTH_CM: Real = 8.5;
/// Height of a standard ID-1 card in centimeters.
pub const STANDARD_CARD_HEIGHT_CM: Real = 5.4;

/// A configuration value the engine cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be {requirement}, got {value}")]
    InvalidValue {
        field: &'static str,
        value: Real,
        requirement: &'static str,
    },
    #[error("calibration.min_edge_px ({min}) must be below calibration.max_edge_px ({max})")]
    EdgeRange { min: Real, max: Real },
}

fn positive(field: &'static str, value: Real) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            requirement: "positive and finite",
        })
    }
}

fn non_negative(field: &'static str, value: Real) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            value,
            requirement: "non-negative and finite",
        })
    }
}

/// Top-level configuration passed into each engine component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub calibration: CalibrationConfig,
    pub mapping: MappingConfig,
    pub evaluation: EvaluationConfig,
    pub scoring: ScoringConfig,
}

impl EngineConfig {
    /// Checks value ranges. Severity cap and priority weights must be positive;
    /// tolerances must be non-negative.
    ///
    /// Reference object sizes are checked by calibration itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cal = &self.calibration;
        positive("calibration.aspect_tolerance", cal.aspect_tolerance)?;
        non_negative("calibration.min_edge_px", cal.min_edge_px)?;
        positive("calibration.max_edge_px", cal.max_edge_px)?;
        if cal.min_edge_px >= cal.max_edge_px {
            return Err(ConfigError::EdgeRange {
                min: cal.min_edge_px,
                max: cal.max_edge_px,
            });
        }
        non_negative("calibration.axis_tolerance_deg", cal.axis_tolerance_deg)?;
        non_negative("mapping.rotation_epsilon_deg", self.mapping.rotation_epsilon_deg)?;

        let eval = &self.evaluation;
        non_negative("evaluation.angle_tolerance_deg", eval.angle_tolerance_deg)?;
        positive("evaluation.max_severity", eval.max_severity)?;
        non_negative("evaluation.angle_weight", eval.angle_weight)?;

        const WEIGHT_FIELDS: [&str; 3] = [
            "scoring.priority_weights[0]",
            "scoring.priority_weights[1]",
            "scoring.priority_weights[2]",
        ];
        for (field, &w) in WEIGHT_FIELDS.iter().zip(&self.scoring.priority_weights) {
            positive(*field, w)?;
        }
        Ok(())
    }
}

/// Reference object and click-validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Physical length of the reference object's long edge.
    pub reference_width_cm: Real,
    /// Physical length of the reference object's short edge.
    pub reference_height_cm: Real,
    /// Allowed relative deviation between measured and expected aspect ratio.
    pub aspect_tolerance: Real,
    /// Edges shorter than this (pixels) are treated as duplicate clicks.
    pub min_edge_px: Real,
    /// Edges longer than this (pixels) are rejected as implausible.
    pub max_edge_px: Real,
    /// Edges within this angle of the image axes count as axis-aligned.
    pub axis_tolerance_deg: Real,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_width_cm: STANDARD_CARD_WIDTH_CM,
            reference_height_cm: STANDARD_CARD_HEIGHT_CM,
            aspect_tolerance: 0.15,
            min_edge_px: 10.0,
            max_edge_px: 10_000.0,
            axis_tolerance_deg: 1.0,
        }
    }
}

impl CalibrationConfig {
    /// Expected long/short aspect ratio of the reference object.
    pub fn expected_aspect(&self) -> Real {
        let long = self.reference_width_cm.max(self.reference_height_cm);
        let short = self.reference_width_cm.min(self.reference_height_cm);
        long / short
    }
}

/// Corner of a clicked quadrilateral, in photo terms.
///
/// Quadrilaterals are always stored clockwise starting at the top-left, so
/// each variant is also an index into that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCorner {
    TopLeft,
    TopRight,
    BottomRight,
    #[default]
    BottomLeft,
}

impl ReferenceCorner {
    /// Index into a clockwise `[TL, TR, BR, BL]` quad.
    pub fn index(self) -> usize {
        match self {
            ReferenceCorner::TopLeft => 0,
            ReferenceCorner::TopRight => 1,
            ReferenceCorner::BottomRight => 2,
            ReferenceCorner::BottomLeft => 3,
        }
    }

    /// Corner at the other end of the user edge (same photo row).
    pub fn along_user_edge(self) -> ReferenceCorner {
        match self {
            ReferenceCorner::TopLeft => ReferenceCorner::TopRight,
            ReferenceCorner::TopRight => ReferenceCorner::TopLeft,
            ReferenceCorner::BottomRight => ReferenceCorner::BottomLeft,
            ReferenceCorner::BottomLeft => ReferenceCorner::BottomRight,
        }
    }

    /// Corner across the desk from this one (same photo column).
    pub fn across_desk(self) -> ReferenceCorner {
        match self {
            ReferenceCorner::TopLeft => ReferenceCorner::BottomLeft,
            ReferenceCorner::TopRight => ReferenceCorner::BottomRight,
            ReferenceCorner::BottomRight => ReferenceCorner::TopRight,
            ReferenceCorner::BottomLeft => ReferenceCorner::TopLeft,
        }
    }
}

/// Desk frame convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Origin of the desk frame; the edge through it and
    /// [`ReferenceCorner::along_user_edge`] is the user edge.
    pub reference_corner: ReferenceCorner,
    /// Rotation deltas below this are treated as no rotation.
    pub rotation_epsilon_deg: Real,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            reference_corner: ReferenceCorner::BottomLeft,
            rotation_epsilon_deg: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Angle deviations up to this magnitude are acceptable.
    pub angle_tolerance_deg: Real,
    /// Item slugs whose ideal angle is mirrored for left-handed users.
    pub mirrored_items: Vec<String>,
    /// Upper bound of the per-check severity multiplier.
    pub max_severity: Real,
    /// Contribution of the angle severity relative to the distance severity.
    pub angle_weight: Real,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 15.0,
            mirrored_items: vec!["mouse".to_string(), "keyboard".to_string()],
            max_severity: 2.0,
            angle_weight: 0.5,
        }
    }
}

impl EvaluationConfig {
    pub fn is_mirrored(&self, item_slug: &str) -> bool {
        self.mirrored_items.iter().any(|s| s == item_slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base penalty per priority level, indexed by `priority - 1`.
    pub priority_weights: [Real; 3],
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            priority_weights: [60.0, 40.0, 20.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"evaluation":{"angle_tolerance_deg":10}}"#).unwrap();
        assert_eq!(cfg.evaluation.angle_tolerance_deg, 10.0);
        assert_eq!(cfg.evaluation.max_severity, 2.0);
        assert!(cfg.evaluation.is_mirrored("mouse"));
        assert_eq!(cfg.calibration, CalibrationConfig::default());
        assert_eq!(cfg.mapping.reference_corner, ReferenceCorner::BottomLeft);
    }

    #[test]
    fn defaults_validate() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_severity_cap_is_rejected() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"evaluation":{"max_severity":0}}"#).unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "evaluation.max_severity",
                ..
            }
        ));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn non_positive_priority_weights_are_rejected() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"scoring":{"priority_weights":[60,-40,20]}}"#).unwrap();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidValue {
                field: "scoring.priority_weights[1]",
                value: -40.0,
                requirement: "positive and finite",
            })
        );

        let mut cfg = EngineConfig::default();
        cfg.scoring.priority_weights = [0.0, 0.0, 0.0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_edge_range_is_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.calibration.min_edge_px = 500.0;
        cfg.calibration.max_edge_px = 100.0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EdgeRange {
                min: 500.0,
                max: 100.0
            })
        );
    }

    #[test]
    fn negative_tolerances_are_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.evaluation.angle_tolerance_deg = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.evaluation.angle_weight = Real::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.mapping.rotation_epsilon_deg = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn expected_aspect_ignores_orientation() {
        let mut cfg = CalibrationConfig::default();
        let landscape = cfg.expected_aspect();
        std::mem::swap(&mut cfg.reference_width_cm, &mut cfg.reference_height_cm);
        assert!((cfg.expected_aspect() - landscape).abs() < 1e-12);
        assert!((landscape - 8.5 / 5.4).abs() < 1e-12);
    }

    #[test]
    fn reference_corner_neighbours() {
        let c = ReferenceCorner::BottomLeft;
        assert_eq!(c.along_user_edge(), ReferenceCorner::BottomRight);
        assert_eq!(c.across_desk(), ReferenceCorner::TopLeft);
        assert_eq!(c.index(), 3);
        let parsed: ReferenceCorner = serde_json::from_str("\"top_right\"").unwrap();
        assert_eq!(parsed, ReferenceCorner::TopRight);
    }
}
