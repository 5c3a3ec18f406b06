//! Analyze a synthetic, slightly keystoned desk photo.
//!
//! 1. Build a synthetic desk seen at an angle
//! 2. Click the reference card and desk corners (with a little jitter)
//! 3. Run the analysis for a coder and print score and recommendations
//!
//! Run with: `cargo run -p deskopt --example synthetic_desk`

use anyhow::Result;
use deskopt::prelude::*;
use deskopt::synthetic::{SyntheticDesk, UniformPixelNoise, noise::ClickStream};

fn main() -> Result<()> {
    println!("=== Desk Analysis (Synthetic Photo) ===\n");

    let desk = SyntheticDesk::top_down(140.0, 70.0, 8.0, Pt2::new(80.0, 800.0))
        .rotated(4.0)
        .with_perspective(0.0, 0.003);
    let noise = UniformPixelNoise::new(42, 0.4);

    let card = noise.jitter_all(
        ClickStream::Calibration,
        &desk.card_corners_px(Pt2::new(110.0, 20.0), 8.5, 5.4),
    );
    let boundary = noise.jitter_all(ClickStream::DeskBoundary, &desk.desk_corners_px());

    let detections = vec![
        desk.detection("keyboard", Pt2::new(60.0, 38.0), 12.0),
        desk.detection("mouse", Pt2::new(95.0, 22.0), 15.0),
        desk.detection("monitor", Pt2::new(60.0, 60.0), 0.0),
        desk.detection("cup", Pt2::new(125.0, 15.0), 0.0),
        desk.detection("plant", Pt2::new(130.0, 65.0), 0.0),
    ];

    let request = ScanRequest {
        profile: ProfileRef {
            role: Role::Coder,
            handedness: Handedness::Right,
        },
        calibration_points: card,
        desk_boundary: Some(boundary),
        detections,
    };

    let report = run_analysis(&request, &RuleBook::builtin(), &EngineConfig::default())?;

    println!(
        "Calibration: {:.4} cm/px, aspect {:.3}, projective={}",
        report.calibration.cm_per_px, report.calibration.aspect_ratio, report.calibration.projective
    );
    if let Some(dims) = report.desk_dimensions {
        println!("Desk: {:.1} x {:.1} cm\n", dims.width_cm, dims.depth_cm);
    }

    println!("--- Verdicts ---");
    for v in &report.verdicts {
        println!(
            "  {:<10} {:>6.1} cm {:>7.1} deg  {:?}",
            v.item.item_slug,
            v.position.distance_cm(),
            v.position.rotation_deg,
            v.classification()
        );
    }

    println!("\n--- Score ---");
    match &report.score {
        ScoreOutcome::Scored(score) => println!(
            "  {:.1} / 100 ({} items scored, {} issues)",
            score.value,
            score.scored_items,
            score.issues.len()
        ),
        ScoreOutcome::InsufficientData { .. } => println!("  insufficient data"),
    }

    println!("\n--- Recommendations ---");
    for r in &report.recommendations {
        println!("  [{}] {}", r.priority, r.instruction);
        println!("        {}", r.advice);
    }

    Ok(())
}
