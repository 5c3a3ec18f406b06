//! Per-item placement verdicts.

use crate::rules::RuleResolution;
use deskopt_core::{
    DetectedItem, ErgonomicRule, EvaluationConfig, PriorityLevel, Real, angle_difference_deg,
};
use deskopt_linear::MappedPosition;
use serde::{Deserialize, Serialize};

/// Deviations below this fraction of the violated bound count as minor.
const MINOR_DEVIATION: Real = 0.1;
const MODERATE_DEVIATION: Real = 0.3;
const MAJOR_DEVIATION: Real = 0.5;

/// Overall label of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Ok,
    TooClose,
    TooFar,
    MisAngled,
    /// No rule exists for this role and item.
    Unregulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStatus {
    InZone,
    TooClose,
    TooFar,
}

/// Which detection a verdict belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRef {
    /// Index in the detection list handed to the engine.
    pub index: usize,
    pub item_slug: String,
    pub confidence: Real,
}

impl ItemRef {
    pub fn new(index: usize, item: &DetectedItem) -> Self {
        Self {
            index,
            item_slug: item.item_slug.clone(),
            confidence: item.confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceCheck {
    pub distance_cm: Real,
    pub min_cm: Real,
    pub max_cm: Real,
    pub status: DistanceStatus,
    /// Signed distance outside the violated bound: negative when too close,
    /// positive when too far, `0` in zone.
    pub deviation_cm: Real,
}

impl DistanceCheck {
    pub fn new(distance_cm: Real, min_cm: Real, max_cm: Real) -> Self {
        let below = min_cm - distance_cm;
        let above = distance_cm - max_cm;
        // With inverted bounds a distance can violate both; the nearer bound wins.
        let status = match (below > 0.0, above > 0.0) {
            (false, false) => DistanceStatus::InZone,
            (true, false) => DistanceStatus::TooClose,
            (false, true) => DistanceStatus::TooFar,
            (true, true) if below <= above => DistanceStatus::TooClose,
            (true, true) => DistanceStatus::TooFar,
        };
        let deviation_cm = match status {
            DistanceStatus::InZone => 0.0,
            DistanceStatus::TooClose => -below,
            DistanceStatus::TooFar => above,
        };
        Self {
            distance_cm,
            min_cm,
            max_cm,
            status,
            deviation_cm,
        }
    }

    pub fn in_zone(&self) -> bool {
        self.status == DistanceStatus::InZone
    }

    /// Deviation relative to the violated bound (bounds under 1 cm count as 1 cm).
    pub fn relative_deviation(&self) -> Real {
        let bound = match self.status {
            DistanceStatus::InZone => return 0.0,
            DistanceStatus::TooClose => self.min_cm,
            DistanceStatus::TooFar => self.max_cm,
        };
        self.deviation_cm.abs() / bound.max(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleCheck {
    pub rotation_deg: Real,
    /// Ideal angle after handedness mirroring.
    pub ideal_deg: Real,
    /// `rotation - ideal`, wrapped into `[-180, 180)`.
    pub deviation_deg: Real,
    pub tolerance_deg: Real,
}

impl AngleCheck {
    pub fn new(rotation_deg: Real, ideal_deg: Real, tolerance_deg: Real) -> Self {
        Self {
            rotation_deg,
            ideal_deg,
            deviation_deg: angle_difference_deg(rotation_deg, ideal_deg),
            tolerance_deg,
        }
    }

    pub fn within_tolerance(&self) -> bool {
        self.deviation_deg.abs() <= self.tolerance_deg
    }

    pub fn relative_deviation(&self) -> Real {
        if self.within_tolerance() {
            0.0
        } else {
            self.deviation_deg.abs() / 180.0
        }
    }
}

/// Outcome of checking an item against its rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementCheck {
    pub rule: ErgonomicRule,
    pub mirrored: bool,
    pub distance: DistanceCheck,
    pub angle: AngleCheck,
    /// Combined severity in `[0, max_severity]`; `0` when the item is OK.
    pub severity: Real,
}

impl PlacementCheck {
    pub fn is_ok(&self) -> bool {
        self.distance.in_zone() && self.angle.within_tolerance()
    }

    pub fn priority(&self) -> PriorityLevel {
        self.rule.priority_level
    }

    /// Size of the violation before severity banding: relative distance
    /// deviation plus relative angle deviation. Unlike `severity` it keeps
    /// growing past the cap, so it can rank items that both saturate.
    pub fn deviation_magnitude(&self) -> Real {
        self.distance.relative_deviation() + self.angle.relative_deviation()
    }

    /// Every violated aspect, distance first; `[Ok]` when nothing is violated.
    pub fn classifications(&self) -> Vec<Classification> {
        let mut out = Vec::with_capacity(2);
        match self.distance.status {
            DistanceStatus::InZone => {}
            DistanceStatus::TooClose => out.push(Classification::TooClose),
            DistanceStatus::TooFar => out.push(Classification::TooFar),
        }
        if !self.angle.within_tolerance() {
            out.push(Classification::MisAngled);
        }
        if out.is_empty() {
            out.push(Classification::Ok);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assessment {
    Unregulated,
    Regulated(PlacementCheck),
}

/// One item's placement verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub item: ItemRef,
    pub position: MappedPosition,
    pub assessment: Assessment,
}

impl Verdict {
    pub fn check(&self) -> Option<&PlacementCheck> {
        match &self.assessment {
            Assessment::Regulated(check) => Some(check),
            Assessment::Unregulated => None,
        }
    }

    pub fn is_regulated(&self) -> bool {
        self.check().is_some()
    }

    pub fn is_ok(&self) -> bool {
        self.check().is_some_and(PlacementCheck::is_ok)
    }

    pub fn priority(&self) -> Option<PriorityLevel> {
        self.check().map(PlacementCheck::priority)
    }

    /// Most significant label: a distance violation, else mis-angled, else OK.
    pub fn classification(&self) -> Classification {
        match self.check() {
            None => Classification::Unregulated,
            Some(check) => check.classifications()[0],
        }
    }

    pub fn severity(&self) -> Real {
        self.check().map_or(0.0, |c| c.severity)
    }
}

/// Compares mapped items against their resolved rules.
#[derive(Debug, Clone, Default)]
pub struct PlacementEvaluator {
    config: EvaluationConfig,
}

impl PlacementEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn evaluate(
        &self,
        index: usize,
        item: &DetectedItem,
        position: MappedPosition,
        resolution: Option<RuleResolution>,
    ) -> Verdict {
        let assessment = match resolution {
            None => Assessment::Unregulated,
            Some(res) => Assessment::Regulated(self.check(&position, res)),
        };
        Verdict {
            item: ItemRef::new(index, item),
            position,
            assessment,
        }
    }

    fn check(&self, position: &MappedPosition, res: RuleResolution) -> PlacementCheck {
        let distance = DistanceCheck::new(
            position.distance_cm(),
            res.rule.min_dist_cm,
            res.rule.max_dist_cm,
        );
        let angle = AngleCheck::new(
            position.rotation_deg,
            res.effective_ideal_angle,
            self.config.angle_tolerance_deg,
        );
        let severity = self.severity(&distance, &angle);
        PlacementCheck {
            rule: res.rule,
            mirrored: res.mirrored,
            distance,
            angle,
            severity,
        }
    }

    fn severity(&self, distance: &DistanceCheck, angle: &AngleCheck) -> Real {
        let mut total = 0.0;
        if !distance.in_zone() {
            total += severity_multiplier(distance.relative_deviation());
        }
        if !angle.within_tolerance() {
            total += self.config.angle_weight * severity_multiplier(angle.relative_deviation());
        }
        total.min(self.config.max_severity)
    }
}

/// Piecewise-linear growth of a violation's weight with its relative size:
/// `1.0` below 10%, rising to `1.5` at 30% and `2.0` at 50% and beyond.
pub fn severity_multiplier(relative_deviation: Real) -> Real {
    let d = relative_deviation.abs();
    if d < MINOR_DEVIATION {
        1.0
    } else if d < MODERATE_DEVIATION {
        1.0 + (d - MINOR_DEVIATION) * 2.5
    } else if d < MAJOR_DEVIATION {
        1.5 + (d - MODERATE_DEVIATION) * 2.5
    } else {
        2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard_rule() -> RuleResolution {
        RuleResolution {
            rule: ErgonomicRule::new(
                "coder",
                "keyboard",
                10.0,
                30.0,
                0.0,
                PriorityLevel::HIGHEST,
                "Keep keyboard centered and close to avoid shoulder strain",
            ),
            effective_ideal_angle: 0.0,
            mirrored: false,
            ambiguity: None,
        }
    }

    fn at(distance: Real, rotation: Real) -> MappedPosition {
        MappedPosition {
            x_cm: 50.0,
            y_cm: distance,
            rotation_deg: rotation,
            inside_reference_area: true,
        }
    }

    fn eval(distance: Real, rotation: Real) -> Verdict {
        let item = DetectedItem::new("keyboard", 0.0, 0.0, rotation);
        PlacementEvaluator::default().evaluate(0, &item, at(distance, rotation), Some(keyboard_rule()))
    }

    #[test]
    fn item_inside_zone_is_ok() {
        let v = eval(25.0, 0.0);
        assert!(v.is_ok());
        assert_eq!(v.classification(), Classification::Ok);
        assert_eq!(v.severity(), 0.0);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(eval(10.0, 15.0).is_ok());
        assert!(eval(30.0, -15.0).is_ok());
    }

    #[test]
    fn far_and_rotated_item_carries_both_deviations() {
        let v = eval(45.0, 20.0);
        let check = v.check().unwrap();
        assert_eq!(check.distance.status, DistanceStatus::TooFar);
        assert!((check.distance.deviation_cm - 15.0).abs() < 1e-12);
        assert!((check.angle.deviation_deg - 20.0).abs() < 1e-12);
        assert_eq!(
            check.classifications(),
            vec![Classification::TooFar, Classification::MisAngled]
        );
        assert_eq!(v.classification(), Classification::TooFar);
        // 50% beyond the far bound saturates the distance term.
        assert_eq!(v.severity(), 2.0);
    }

    #[test]
    fn too_close_deviation_is_negative() {
        let v = eval(4.0, 0.0);
        let check = v.check().unwrap();
        assert_eq!(check.distance.status, DistanceStatus::TooClose);
        assert!((check.distance.deviation_cm + 6.0).abs() < 1e-12);
        assert!((v.severity() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn angle_wraps_the_short_way() {
        let v = eval(20.0, 350.0);
        let check = v.check().unwrap();
        assert!((check.angle.deviation_deg + 10.0).abs() < 1e-9);
        assert!(v.is_ok());

        let v = eval(20.0, 200.0);
        assert_eq!(v.classification(), Classification::MisAngled);
        assert!((v.check().unwrap().angle.deviation_deg + 160.0).abs() < 1e-9);
    }

    #[test]
    fn missing_rule_is_unregulated() {
        let item = DetectedItem::new("stapler", 0.0, 0.0, 0.0);
        let v = PlacementEvaluator::default().evaluate(3, &item, at(90.0, 45.0), None);
        assert_eq!(v.classification(), Classification::Unregulated);
        assert!(!v.is_regulated());
        assert!(!v.is_ok());
        assert_eq!(v.severity(), 0.0);
        assert_eq!(v.item.index, 3);
    }

    #[test]
    fn inverted_bounds_use_nearer_bound() {
        // min 30 > max 10: every distance violates at least one bound.
        let mid = DistanceCheck::new(22.0, 30.0, 10.0);
        assert_eq!(mid.status, DistanceStatus::TooClose);
        assert!((mid.deviation_cm + 8.0).abs() < 1e-12);

        let low = DistanceCheck::new(14.0, 30.0, 10.0);
        assert_eq!(low.status, DistanceStatus::TooFar);
        assert!((low.deviation_cm - 4.0).abs() < 1e-12);

        assert_eq!(DistanceCheck::new(5.0, 30.0, 10.0).status, DistanceStatus::TooClose);
        assert_eq!(DistanceCheck::new(40.0, 30.0, 10.0).status, DistanceStatus::TooFar);
    }

    #[test]
    fn multiplier_is_piecewise_linear() {
        assert_eq!(severity_multiplier(0.05), 1.0);
        assert!((severity_multiplier(0.2) - 1.25).abs() < 1e-12);
        assert!((severity_multiplier(0.4) - 1.75).abs() < 1e-12);
        assert_eq!(severity_multiplier(0.9), 2.0);
    }

    #[test]
    fn deviation_magnitude_keeps_growing_past_the_severity_cap() {
        let near = eval(45.0, 0.0);
        let far = eval(100.0, 0.0);
        assert_eq!(near.severity(), far.severity());
        let near = near.check().unwrap().deviation_magnitude();
        let far = far.check().unwrap().deviation_magnitude();
        assert!((near - 0.5).abs() < 1e-12);
        assert!((far - 70.0 / 30.0).abs() < 1e-12);

        let turned = eval(25.0, 90.0).check().unwrap().deviation_magnitude();
        assert!((turned - 0.5).abs() < 1e-12);
        assert_eq!(eval(25.0, 0.0).check().unwrap().deviation_magnitude(), 0.0);
    }

    #[test]
    fn severity_is_capped() {
        let evaluator = PlacementEvaluator::new(EvaluationConfig {
            max_severity: 1.2,
            ..EvaluationConfig::default()
        });
        let item = DetectedItem::new("keyboard", 0.0, 0.0, 90.0);
        let v = evaluator.evaluate(0, &item, at(80.0, 90.0), Some(keyboard_rule()));
        assert_eq!(v.severity(), 1.2);
    }
}
