//! Ergonomic policy data and rule resolution.
//!
//! A [`RuleBook`] is the read-only policy for one analysis: the known item
//! categories and the rules keyed by `(role_slug, item_slug)`. Nothing
//! enforces uniqueness of that key, so [`RuleMatcher`] applies an explicit
//! order: lowest priority level first, then first inserted.

use deskopt_core::{
    ErgonomicRule, EvaluationConfig, Handedness, ItemCategory, PriorityLevel, Real, Role,
    wrap_degrees,
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleBookError {
    #[error("item category slug must not be empty")]
    EmptyCategorySlug,
    #[error("duplicate item category {0:?}")]
    DuplicateCategory(String),
    #[error("rule #{position} ({role}/{item}): {reason}")]
    InvalidRule {
        position: usize,
        role: String,
        item: String,
        reason: String,
    },
}

/// Serialized form of a [`RuleBook`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBookSource {
    #[serde(default)]
    pub categories: Vec<ItemCategory>,
    #[serde(default)]
    pub rules: Vec<ErgonomicRule>,
}

/// Validated item categories and ergonomic rules.
///
/// Rule order is insertion order and participates in tie-breaking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleBookSource", into = "RuleBookSource")]
pub struct RuleBook {
    categories: Vec<ItemCategory>,
    rules: Vec<ErgonomicRule>,
}

impl RuleBook {
    /// Validate policy data.
    ///
    /// Malformed rules (empty slugs, negative or non-finite distances,
    /// non-finite angle) are errors. Rules for an unknown role or an item
    /// slug without a category are dropped with a warning so a single bad
    /// row cannot leak into another item's evaluation.
    pub fn new(
        categories: Vec<ItemCategory>,
        rules: Vec<ErgonomicRule>,
    ) -> Result<Self, RuleBookError> {
        let mut seen = HashSet::new();
        for c in &categories {
            if c.slug.trim().is_empty() {
                return Err(RuleBookError::EmptyCategorySlug);
            }
            if !seen.insert(c.slug.clone()) {
                return Err(RuleBookError::DuplicateCategory(c.slug.clone()));
            }
        }

        let mut kept = Vec::with_capacity(rules.len());
        for (position, rule) in rules.into_iter().enumerate() {
            validate_rule(position, &rule)?;
            if rule.role_slug.parse::<Role>().is_err() {
                warn!(
                    "dropping rule #{position}: unknown role {:?} for item {:?}",
                    rule.role_slug, rule.item_slug
                );
                continue;
            }
            if !seen.contains(rule.item_slug.as_str()) {
                warn!(
                    "dropping rule #{position}: item {:?} has no category (role {:?})",
                    rule.item_slug, rule.role_slug
                );
                continue;
            }
            kept.push(rule);
        }

        Ok(Self {
            categories,
            rules: kept,
        })
    }

    pub fn categories(&self) -> &[ItemCategory] {
        &self.categories
    }

    pub fn rules(&self) -> &[ErgonomicRule] {
        &self.rules
    }

    pub fn category(&self, slug: &str) -> Option<&ItemCategory> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Display name of a category, falling back to the slug itself.
    pub fn display_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.category(slug)
            .map(|c| c.display_name.as_str())
            .unwrap_or(slug)
    }

    /// All rules of one role, in insertion order.
    pub fn rules_for_role(&self, role: Role) -> impl Iterator<Item = &ErgonomicRule> + '_ {
        self.rules.iter().filter(move |r| role_matches(r, role))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The seeded catalog: twelve desk items and the default rules of the
    /// coder, artist, gamer and admin roles.
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(slug, name)| ItemCategory::new(*slug, *name))
            .collect();
        let rules = BUILTIN_RULES
            .iter()
            .map(|s| {
                ErgonomicRule::new(
                    s.role,
                    s.item,
                    s.min,
                    s.max,
                    s.angle,
                    s.priority,
                    s.advice,
                )
            })
            .collect();
        Self { categories, rules }
    }
}

impl TryFrom<RuleBookSource> for RuleBook {
    type Error = RuleBookError;

    fn try_from(src: RuleBookSource) -> Result<Self, Self::Error> {
        RuleBook::new(src.categories, src.rules)
    }
}

impl From<RuleBook> for RuleBookSource {
    fn from(book: RuleBook) -> Self {
        RuleBookSource {
            categories: book.categories,
            rules: book.rules,
        }
    }
}

fn validate_rule(position: usize, rule: &ErgonomicRule) -> Result<(), RuleBookError> {
    let invalid = |reason: &str| RuleBookError::InvalidRule {
        position,
        role: rule.role_slug.clone(),
        item: rule.item_slug.clone(),
        reason: reason.to_string(),
    };
    if rule.role_slug.trim().is_empty() || rule.item_slug.trim().is_empty() {
        return Err(invalid("role and item slugs must not be empty"));
    }
    if !rule.min_dist_cm.is_finite() || !rule.max_dist_cm.is_finite() {
        return Err(invalid("distance bounds must be finite"));
    }
    if rule.min_dist_cm < 0.0 || rule.max_dist_cm < 0.0 {
        return Err(invalid("distance bounds must not be negative"));
    }
    if !rule.ideal_angle.is_finite() {
        return Err(invalid("ideal angle must be finite"));
    }
    Ok(())
}

fn role_matches(rule: &ErgonomicRule, role: Role) -> bool {
    rule.role_slug.eq_ignore_ascii_case(role.slug())
}

/// Several rules competed for one `(role, item)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAmbiguity {
    pub role_slug: String,
    pub item_slug: String,
    /// Position of the winning rule in [`RuleBook::rules`].
    pub chosen: usize,
    /// Positions of the rules that lost, in resolution order.
    pub shadowed: Vec<usize>,
}

/// The rule that applies to one item for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResolution {
    pub rule: ErgonomicRule,
    /// `rule.ideal_angle`, negated for mirrored items of left-handed users.
    pub effective_ideal_angle: Real,
    pub mirrored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<RuleAmbiguity>,
}

impl RuleResolution {
    pub fn priority(&self) -> PriorityLevel {
        self.rule.priority_level
    }
}

/// Looks up rules by exact `(role, item)` key; never falls back to other roles.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatcher<'a> {
    book: &'a RuleBook,
    evaluation: &'a EvaluationConfig,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(book: &'a RuleBook, evaluation: &'a EvaluationConfig) -> Self {
        Self { book, evaluation }
    }

    /// Matching rules with their positions, in resolution order.
    fn ranked(&self, role: Role, item_slug: &str) -> Vec<(usize, &'a ErgonomicRule)> {
        let mut hits: Vec<_> = self
            .book
            .rules
            .iter()
            .enumerate()
            .filter(|(_, r)| role_matches(r, role) && r.item_slug == item_slug)
            .collect();
        hits.sort_by_key(|&(position, r)| (r.priority_level, position));
        hits
    }

    /// All rules for `(role, item_slug)`: priority ascending, then insertion order.
    pub fn matching(&self, role: Role, item_slug: &str) -> Vec<&'a ErgonomicRule> {
        self.ranked(role, item_slug)
            .into_iter()
            .map(|(_, r)| r)
            .collect()
    }

    /// Pick the applicable rule, or `None` when the item is unregulated for
    /// this role.
    pub fn resolve(
        &self,
        role: Role,
        handedness: Handedness,
        item_slug: &str,
    ) -> Option<RuleResolution> {
        let ranked = self.ranked(role, item_slug);
        let (&(chosen, rule), rest) = ranked.split_first()?;

        let ambiguity = (!rest.is_empty()).then(|| {
            let shadowed: Vec<usize> = rest.iter().map(|(p, _)| *p).collect();
            warn!(
                "{} rules for {}/{}: using #{} ({}), ignoring {:?}",
                ranked.len(),
                role,
                item_slug,
                chosen,
                rule.priority_level,
                shadowed
            );
            RuleAmbiguity {
                role_slug: role.slug().to_string(),
                item_slug: item_slug.to_string(),
                chosen,
                shadowed,
            }
        });

        let mirrored = handedness == Handedness::Left && self.evaluation.is_mirrored(item_slug);
        let effective_ideal_angle = if mirrored {
            wrap_degrees(-rule.ideal_angle)
        } else {
            rule.ideal_angle
        };

        Some(RuleResolution {
            rule: rule.clone(),
            effective_ideal_angle,
            mirrored,
            ambiguity,
        })
    }
}

struct SeedRule {
    role: &'static str,
    item: &'static str,
    min: Real,
    max: Real,
    angle: Real,
    priority: PriorityLevel,
    advice: &'static str,
}

const fn seed(
    role: &'static str,
    item: &'static str,
    min: Real,
    max: Real,
    angle: Real,
    priority: PriorityLevel,
    advice: &'static str,
) -> SeedRule {
    SeedRule {
        role,
        item,
        min,
        max,
        angle,
        priority,
        advice,
    }
}

const P1: PriorityLevel = PriorityLevel::HIGHEST;
const P2: PriorityLevel = PriorityLevel::MEDIUM;
const P3: PriorityLevel = PriorityLevel::LOWEST;

const BUILTIN_CATEGORIES: &[(&str, &str)] = &[
    ("keyboard", "Keyboard"),
    ("mouse", "Mouse"),
    ("monitor", "Monitor"),
    ("laptop", "Laptop"),
    ("phone", "Phone"),
    ("tablet", "Tablet"),
    ("cup", "Coffee Mug"),
    ("notebook", "Notebook"),
    ("pen", "Pen"),
    ("lamp", "Desk Lamp"),
    ("speaker", "Speaker"),
    ("headphones", "Headphones"),
];

#[rustfmt::skip]
const BUILTIN_RULES: &[SeedRule] = &[
    seed("coder", "keyboard", 10.0, 30.0, 0.0, P1, "Keep keyboard centered and close to avoid shoulder strain"),
    seed("coder", "mouse", 15.0, 35.0, 15.0, P1, "Mouse should be within easy reach, slightly to the right for right-handed users"),
    seed("coder", "monitor", 40.0, 70.0, 0.0, P1, "Monitor at arm's length, centered with keyboard"),
    seed("coder", "laptop", 35.0, 60.0, 0.0, P2, "Laptop should be centered, consider external monitor"),
    seed("coder", "phone", 20.0, 40.0, 45.0, P3, "Keep phone within reach but not in primary workspace"),
    seed("coder", "cup", 25.0, 50.0, -30.0, P3, "Place drinks to the side to avoid spills"),

    seed("artist", "keyboard", 40.0, 60.0, -45.0, P2, "Move keyboard aside to clear space for drawing tablet"),
    seed("artist", "tablet", 15.0, 35.0, 0.0, P1, "Drawing tablet should be centered and close"),
    seed("artist", "pen", 10.0, 25.0, 0.0, P1, "Keep pen/pencil within easy reach of tablet"),
    seed("artist", "monitor", 40.0, 70.0, 0.0, P1, "Monitor at arm's length, slightly above tablet"),
    seed("artist", "lamp", 30.0, 50.0, 45.0, P2, "Good lighting is essential for detailed work"),

    seed("gamer", "keyboard", 10.0, 25.0, 0.0, P1, "Keyboard should be close for quick access"),
    seed("gamer", "mouse", 10.0, 30.0, 20.0, P1, "Mouse needs space for wide movements, positioned for dominant hand"),
    seed("gamer", "monitor", 35.0, 60.0, 0.0, P1, "Monitor closer than typical work setup for better focus"),
    seed("gamer", "headphones", 15.0, 35.0, -45.0, P2, "Headphones within easy reach for communication"),
    seed("gamer", "speaker", 40.0, 70.0, 30.0, P3, "Speakers positioned for good audio without cluttering workspace"),

    seed("admin", "keyboard", 15.0, 35.0, 0.0, P1, "Keyboard centered at comfortable typing distance"),
    seed("admin", "mouse", 15.0, 35.0, 15.0, P1, "Mouse positioned for easy access without overreaching"),
    seed("admin", "monitor", 45.0, 75.0, 0.0, P1, "Monitor at proper distance to reduce eye strain"),
    seed("admin", "phone", 10.0, 30.0, -30.0, P2, "Phone within easy reach for frequent calls"),
    seed("admin", "notebook", 20.0, 40.0, -45.0, P3, "Notebook for taking notes during calls"),
    seed("admin", "lamp", 30.0, 50.0, 45.0, P2, "Good lighting to reduce eye strain"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(role: &str, item: &str, min: Real, priority: u8) -> ErgonomicRule {
        ErgonomicRule::new(
            role,
            item,
            min,
            min + 20.0,
            0.0,
            PriorityLevel::new(priority).unwrap(),
            "",
        )
    }

    fn cats() -> Vec<ItemCategory> {
        vec![
            ItemCategory::new("keyboard", "Keyboard"),
            ItemCategory::new("mouse", "Mouse"),
        ]
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let book = RuleBook::builtin();
        assert_eq!(book.categories().len(), 12);
        assert_eq!(book.rules().len(), 22);
        let rebuilt = RuleBook::new(book.categories().to_vec(), book.rules().to_vec()).unwrap();
        assert_eq!(rebuilt, book);
        assert_eq!(book.display_name("cup"), "Coffee Mug");
        assert_eq!(book.display_name("stapler"), "stapler");
        assert_eq!(book.rules_for_role(Role::Gamer).count(), 5);
    }

    #[test]
    fn unknown_item_rules_are_dropped() {
        let book = RuleBook::new(
            cats(),
            vec![rule("coder", "keyboard", 10.0, 1), rule("coder", "stapler", 5.0, 1)],
        )
        .unwrap();
        assert_eq!(book.rules().len(), 1);
        assert_eq!(book.rules()[0].item_slug, "keyboard");
    }

    #[test]
    fn unknown_role_rules_are_dropped() {
        let book = RuleBook::new(cats(), vec![rule("designer", "keyboard", 10.0, 1)]).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn malformed_rules_and_categories_are_errors() {
        let mut bad = rule("coder", "keyboard", 10.0, 1);
        bad.max_dist_cm = Real::NAN;
        assert!(matches!(
            RuleBook::new(cats(), vec![bad]),
            Err(RuleBookError::InvalidRule { position: 0, .. })
        ));

        let mut dup = cats();
        dup.push(ItemCategory::new("mouse", "Other Mouse"));
        assert_eq!(
            RuleBook::new(dup, vec![]),
            Err(RuleBookError::DuplicateCategory("mouse".into()))
        );
    }

    #[test]
    fn no_fallback_to_other_roles() {
        let book = RuleBook::builtin();
        let cfg = EvaluationConfig::default();
        let matcher = RuleMatcher::new(&book, &cfg);
        // Only artists have a tablet rule.
        assert!(matcher.matching(Role::Coder, "tablet").is_empty());
        assert!(matcher.resolve(Role::Coder, Handedness::Right, "tablet").is_none());
        assert!(matcher.resolve(Role::Artist, Handedness::Right, "tablet").is_some());
    }

    #[test]
    fn ties_resolve_by_priority_then_insertion() {
        let book = RuleBook::new(
            cats(),
            vec![
                rule("coder", "keyboard", 1.0, 3),
                rule("coder", "keyboard", 2.0, 1),
                rule("coder", "keyboard", 3.0, 1),
                rule("coder", "mouse", 4.0, 2),
            ],
        )
        .unwrap();
        let cfg = EvaluationConfig::default();
        let matcher = RuleMatcher::new(&book, &cfg);

        let order: Vec<Real> = matcher
            .matching(Role::Coder, "keyboard")
            .iter()
            .map(|r| r.min_dist_cm)
            .collect();
        assert_eq!(order, vec![2.0, 3.0, 1.0]);

        let res = matcher
            .resolve(Role::Coder, Handedness::Right, "keyboard")
            .unwrap();
        assert_eq!(res.rule.min_dist_cm, 2.0);
        let amb = res.ambiguity.unwrap();
        assert_eq!(amb.chosen, 1);
        assert_eq!(amb.shadowed, vec![2, 0]);

        let single = matcher
            .resolve(Role::Coder, Handedness::Right, "mouse")
            .unwrap();
        assert!(single.ambiguity.is_none());
    }

    #[test]
    fn left_handed_users_get_mirrored_angles() {
        let book = RuleBook::builtin();
        let cfg = EvaluationConfig::default();
        let matcher = RuleMatcher::new(&book, &cfg);

        let right = matcher.resolve(Role::Coder, Handedness::Right, "mouse").unwrap();
        assert_eq!(right.effective_ideal_angle, 15.0);
        assert!(!right.mirrored);

        let left = matcher.resolve(Role::Coder, Handedness::Left, "mouse").unwrap();
        assert_eq!(left.effective_ideal_angle, -15.0);
        assert!(left.mirrored);

        // Cups are not in the mirrored set.
        let cup = matcher.resolve(Role::Coder, Handedness::Left, "cup").unwrap();
        assert_eq!(cup.effective_ideal_angle, -30.0);
        assert!(!cup.mirrored);
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let json = r#"{
            "categories": [{"slug": "keyboard", "display_name": "Keyboard"}],
            "rules": [
                {"role_slug": "coder", "item_slug": "keyboard", "min_dist_cm": 10,
                 "max_dist_cm": 30, "priority_level": 1},
                {"role_slug": "coder", "item_slug": "pen", "min_dist_cm": 10,
                 "max_dist_cm": 30, "priority_level": 2}
            ]
        }"#;
        let book: RuleBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.rules().len(), 1);

        let negative = r#"{
            "categories": [{"slug": "keyboard", "display_name": "Keyboard"}],
            "rules": [{"role_slug": "coder", "item_slug": "keyboard", "min_dist_cm": -1,
                       "max_dist_cm": 30, "priority_level": 1}]
        }"#;
        assert!(serde_json::from_str::<RuleBook>(negative).is_err());
    }
}
