use crate::Real;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A known physical object type; the join key between detections and rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemCategory {
    /// Stable slug, e.g. `"mouse"`.
    pub slug: String,
    /// Human-facing name, e.g. `"Mouse"`.
    pub display_name: String,
}

impl ItemCategory {
    pub fn new(slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            display_name: display_name.into(),
        }
    }
}

/// Rule urgency: 1 = must move, 3 = nice to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PriorityLevel(u8);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("priority level must be between 1 and 3, got {value}")]
pub struct InvalidPriority {
    pub value: u8,
}

impl PriorityLevel {
    pub const HIGHEST: PriorityLevel = PriorityLevel(1);
    pub const MEDIUM: PriorityLevel = PriorityLevel(2);
    pub const LOWEST: PriorityLevel = PriorityLevel(3);

    pub fn new(value: u8) -> Result<Self, InvalidPriority> {
        if (Self::HIGHEST.0..=Self::LOWEST.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidPriority { value })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index (priority 1 -> 0), handy for weight tables.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for PriorityLevel {
    type Error = InvalidPriority;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PriorityLevel::new(value)
    }
}

impl From<PriorityLevel> for u8 {
    fn from(p: PriorityLevel) -> Self {
        p.0
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Ideal placement zone of one item for one role.
///
/// Distances are measured in centimeters from the desk edge nearest the
/// user; `ideal_angle` is a signed rotation in degrees, `0` meaning the item
/// faces the user squarely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErgonomicRule {
    /// Persistence identifier, if the rule came from storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub role_slug: String,
    pub item_slug: String,
    pub min_dist_cm: Real,
    pub max_dist_cm: Real,
    #[serde(default)]
    pub ideal_angle: Real,
    pub priority_level: PriorityLevel,
    #[serde(default)]
    pub advice_text: String,
}

impl ErgonomicRule {
    pub fn new(
        role_slug: impl Into<String>,
        item_slug: impl Into<String>,
        min_dist_cm: Real,
        max_dist_cm: Real,
        ideal_angle: Real,
        priority_level: PriorityLevel,
        advice_text: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            role_slug: role_slug.into(),
            item_slug: item_slug.into(),
            min_dist_cm,
            max_dist_cm,
            ideal_angle,
            priority_level,
            advice_text: advice_text.into(),
        }
    }

    /// True when `min_dist_cm > max_dist_cm` (an authoring mistake the
    /// evaluator tolerates).
    pub fn has_inverted_bounds(&self) -> bool {
        self.min_dist_cm > self.max_dist_cm
    }

    /// Midpoint of the distance zone.
    pub fn zone_midpoint_cm(&self) -> Real {
        0.5 * (self.min_dist_cm + self.max_dist_cm)
    }
}
