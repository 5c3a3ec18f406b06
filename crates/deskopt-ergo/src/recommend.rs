//! Corrective moves for misplaced items.

use crate::evaluate::{DistanceStatus, ItemRef, PlacementCheck, Verdict};
use crate::rules::RuleBook;
use deskopt_core::{PriorityLevel, Pt2, Real, Vec2};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Moves shorter than this would print as `0.0 cm`.
const MIN_PRINTED_MOVE_CM: Real = 0.05;

/// Where and how to move one item.
///
/// Positions are desk-frame centimeters: `x` along the user edge, `y` the
/// distance from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item: ItemRef,
    pub display_name: String,
    pub priority: PriorityLevel,
    pub current: Pt2,
    pub target: Pt2,
    /// Set when the distance is out of zone.
    pub target_distance_cm: Option<Real>,
    /// Set when the item is mis-angled.
    pub target_rotation_deg: Option<Real>,
    pub move_vector_cm: Vec2,
    /// Signed rotation to apply; positive is clockwise as seen in the photo.
    pub rotate_by_deg: Real,
    pub severity: Real,
    /// Unsaturated violation size, see [`PlacementCheck::deviation_magnitude`].
    pub deviation: Real,
    pub advice: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationGenerator;

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self
    }

    /// One recommendation per regulated, non-OK verdict; most urgent first
    /// (priority ascending, deviation descending, detection order).
    pub fn generate(&self, verdicts: &[Verdict], book: &RuleBook) -> Vec<Recommendation> {
        let mut out: Vec<Recommendation> = verdicts
            .iter()
            .filter_map(|v| {
                let check = v.check().filter(|c| !c.is_ok())?;
                Some(recommend(v, check, book))
            })
            .collect();
        out.sort_by(recommendation_order);
        out
    }
}

fn recommend(verdict: &Verdict, check: &PlacementCheck, book: &RuleBook) -> Recommendation {
    let current = verdict.position.point();
    let display_name = book.display_name(&verdict.item.item_slug).to_string();

    let target_distance_cm = match check.distance.status {
        DistanceStatus::InZone => None,
        _ if check.rule.has_inverted_bounds() => Some(check.rule.zone_midpoint_cm()),
        _ => Some(
            check
                .distance
                .distance_cm
                .clamp(check.rule.min_dist_cm, check.rule.max_dist_cm),
        ),
    };
    let target_rotation_deg =
        (!check.angle.within_tolerance()).then_some(check.angle.ideal_deg);

    let target = Pt2::new(current.x, target_distance_cm.unwrap_or(current.y));
    let move_vector_cm = target - current;
    let rotate_by_deg = if target_rotation_deg.is_some() {
        -check.angle.deviation_deg
    } else {
        0.0
    };

    let instruction = instruction(&display_name, move_vector_cm.y, rotate_by_deg);

    Recommendation {
        item: verdict.item.clone(),
        display_name,
        priority: check.priority(),
        current,
        target,
        target_distance_cm,
        target_rotation_deg,
        move_vector_cm,
        rotate_by_deg,
        severity: check.severity,
        deviation: check.deviation_magnitude(),
        advice: check.rule.advice_text.clone(),
        instruction,
    }
}

fn instruction(name: &str, dy_cm: Real, rotate_by_deg: Real) -> String {
    let movement = match dy_cm {
        d if d >= MIN_PRINTED_MOVE_CM => Some(format!("{d:.1} cm further away")),
        d if d <= -MIN_PRINTED_MOVE_CM => Some(format!("{:.1} cm closer to you", -d)),
        d if d > 0.0 => Some("slightly further away".to_string()),
        d if d < 0.0 => Some("slightly closer to you".to_string()),
        _ => None,
    };
    let rotation = if rotate_by_deg > 0.0 {
        Some(format!("{:.0}° clockwise", rotate_by_deg))
    } else if rotate_by_deg < 0.0 {
        Some(format!("{:.0}° counter-clockwise", -rotate_by_deg))
    } else {
        None
    };

    match (movement, rotation) {
        (Some(m), Some(r)) => format!("Move {name} {m} and rotate it {r}"),
        (Some(m), None) => format!("Move {name} {m}"),
        (None, Some(r)) => format!("Rotate {name} {r}"),
        (None, None) => format!("Check the placement of {name}"),
    }
}

fn recommendation_order(a: &Recommendation, b: &Recommendation) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.deviation.total_cmp(&a.deviation))
        .then_with(|| a.item.index.cmp(&b.item.index))
}
