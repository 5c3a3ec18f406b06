//! Rule lookup, evaluation, scoring and recommendations over the built-in
//! catalog, with positions given directly in desk centimeters.

use deskopt_core::{DetectedItem, EngineConfig, Handedness, Real, Role};
use deskopt_ergo::{
    Classification, PlacementEvaluator, RecommendationGenerator, RuleBook, RuleMatcher,
    ScoreAggregator, ScoreOutcome, Verdict,
};
use deskopt_linear::MappedPosition;

fn evaluate_all(
    role: Role,
    handedness: Handedness,
    items: &[(&str, Real, Real)],
) -> (Vec<Verdict>, RuleBook, EngineConfig) {
    let book = RuleBook::builtin();
    let config = EngineConfig::default();
    let verdicts = {
        let matcher = RuleMatcher::new(&book, &config.evaluation);
        let evaluator = PlacementEvaluator::new(config.evaluation.clone());
        items
            .iter()
            .enumerate()
            .map(|(i, &(slug, distance, rotation))| {
                let item = DetectedItem::new(slug, 0.0, 0.0, rotation);
                let pos = MappedPosition {
                    x_cm: 60.0,
                    y_cm: distance,
                    rotation_deg: rotation,
                    inside_reference_area: true,
                };
                evaluator.evaluate(i, &item, pos, matcher.resolve(role, handedness, slug))
            })
            .collect()
    };
    (verdicts, book, config)
}

#[test]
fn keyboard_inside_zone_contributes_nothing() {
    let (verdicts, book, config) =
        evaluate_all(Role::Coder, Handedness::Right, &[("keyboard", 25.0, 0.0)]);
    assert_eq!(verdicts[0].classification(), Classification::Ok);

    let outcome = ScoreAggregator::from_config(&config).aggregate(&verdicts);
    assert_eq!(outcome.value(), Some(100.0));
    assert!(RecommendationGenerator::new().generate(&verdicts, &book).is_empty());
}

#[test]
fn keyboard_too_far_and_rotated() {
    let (verdicts, book, config) =
        evaluate_all(Role::Coder, Handedness::Right, &[("keyboard", 45.0, 20.0)]);
    let check = verdicts[0].check().expect("regulated");
    assert_eq!(
        check.classifications(),
        vec![Classification::TooFar, Classification::MisAngled]
    );
    assert!((check.distance.deviation_cm - 15.0).abs() < 1e-12);
    assert!((check.angle.deviation_deg - 20.0).abs() < 1e-12);

    let outcome = ScoreAggregator::from_config(&config).aggregate(&verdicts);
    assert!(outcome.value().unwrap() < 100.0);

    let recs = RecommendationGenerator::new().generate(&verdicts, &book);
    assert_eq!(recs[0].target_distance_cm, Some(30.0));
    assert_eq!(recs[0].target_rotation_deg, Some(0.0));
}

#[test]
fn unknown_items_are_ignored_by_score_and_advice() {
    let items = [("keyboard", 45.0, 0.0), ("mouse", 20.0, 15.0)];
    let (base, _, config) = evaluate_all(Role::Coder, Handedness::Right, &items);

    let with_extra = [
        ("keyboard", 45.0, 0.0),
        ("mouse", 20.0, 15.0),
        ("stapler", 150.0, 90.0),
        ("tablet", 150.0, 90.0),
    ];
    let (extra, book, _) = evaluate_all(Role::Coder, Handedness::Right, &with_extra);
    assert_eq!(extra[2].classification(), Classification::Unregulated);
    // Tablets are only regulated for artists.
    assert_eq!(extra[3].classification(), Classification::Unregulated);

    let agg = ScoreAggregator::from_config(&config);
    assert_eq!(agg.aggregate(&base).value(), agg.aggregate(&extra).value());

    let recs = RecommendationGenerator::new().generate(&extra, &book);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].item.item_slug, "keyboard");
}

#[test]
fn left_handed_mouse_is_judged_against_mirrored_angle() {
    let items = [("mouse", 20.0, 15.0)];
    let (right, _, _) = evaluate_all(Role::Coder, Handedness::Right, &items);
    let (left, _, _) = evaluate_all(Role::Coder, Handedness::Left, &items);
    assert!(right[0].is_ok());
    // Ideal is -15 for a left-handed user: 30 degrees off.
    assert_eq!(left[0].classification(), Classification::MisAngled);
}

#[test]
fn no_scorable_items_means_insufficient_data() {
    let (verdicts, _, config) = evaluate_all(Role::Gamer, Handedness::Right, &[("pen", 5.0, 0.0)]);
    let outcome = ScoreAggregator::from_config(&config).aggregate(&verdicts);
    assert!(matches!(outcome, ScoreOutcome::InsufficientData { .. }));
}
