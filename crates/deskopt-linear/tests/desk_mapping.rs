use deskopt_core::synthetic::{SyntheticDesk, UniformPixelNoise, noise::ClickStream};
use deskopt_core::{
    CalibrationConfig, MappingConfig, Pt2, Real, STANDARD_CARD_HEIGHT_CM, STANDARD_CARD_WIDTH_CM,
};
use deskopt_linear::{CalibrationSolver, CoordinateMapper, DeskBoundary};

const DESK_W: Real = 120.0;
const DESK_D: Real = 60.0;

fn card_center() -> Pt2 {
    Pt2::new(60.0, 30.0)
}

fn mapper_for(card_clicks: &[Pt2], desk_clicks: &[Pt2]) -> CoordinateMapper {
    let cal = CalibrationSolver::default()
        .solve(card_clicks)
        .expect("calibration");
    let boundary =
        DeskBoundary::new(desk_clicks, &CalibrationConfig::default()).expect("desk boundary");
    let mapper = CoordinateMapper::new(&cal, Some(&boundary), &MappingConfig::default())
        .expect("mapper");
    assert!(mapper.boundary_known());
    mapper
}

fn sample_points() -> Vec<Pt2> {
    vec![
        Pt2::new(10.0, 5.0),
        Pt2::new(60.0, 25.0),
        Pt2::new(100.0, 45.0),
        Pt2::new(30.0, 58.0),
    ]
}

fn assert_recovers(desk: &SyntheticDesk, tol_cm: Real) {
    let card = desk.card_corners_px(card_center(), STANDARD_CARD_WIDTH_CM, STANDARD_CARD_HEIGHT_CM);
    let mapper = mapper_for(&card, &desk.desk_corners_px());

    for p in sample_points() {
        let det = desk.detection("keyboard", p, 10.0);
        let m = mapper
            .map(&det.position(), det.rotation)
            .expect("sample maps");
        assert!((m.x_cm - p.x).abs() < tol_cm, "x {} vs {}", m.x_cm, p.x);
        assert!(
            (m.distance_cm() - p.y).abs() < tol_cm,
            "distance {} vs {}",
            m.distance_cm(),
            p.y
        );
        assert!((m.rotation_deg - 10.0).abs() < 1e-6, "rotation {}", m.rotation_deg);
        assert!(m.inside_reference_area);
    }

    let dims = mapper.desk_dimensions().expect("dimensions");
    assert!((dims.width_cm - DESK_W).abs() < tol_cm);
    assert!((dims.depth_cm - DESK_D).abs() < tol_cm);
}

#[test]
fn calibration_corners_recover_card_width() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 10.0, Pt2::new(100.0, 900.0)).rotated(12.0);
    let card = desk.card_corners_px(card_center(), STANDARD_CARD_WIDTH_CM, STANDARD_CARD_HEIGHT_CM);
    let cal = CalibrationSolver::default().solve(&card).unwrap();
    let mapper = CoordinateMapper::new(&cal, None, &MappingConfig::default()).unwrap();
    assert!(!mapper.boundary_known());

    let corners = cal.quad.corners();
    let tl = mapper.map(&corners[0], 0.0).unwrap();
    let tr = mapper.map(&corners[1], 0.0).unwrap();
    let width = (tr.point() - tl.point()).norm();
    assert!((width - STANDARD_CARD_WIDTH_CM).abs() < 1e-8, "width {width}");
}

#[test]
fn top_down_desk_maps_exactly() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 10.0, Pt2::new(100.0, 900.0));
    assert_recovers(&desk, 1e-8);
}

#[test]
fn rotated_photo_maps_exactly_and_compensates_rotation() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 10.0, Pt2::new(100.0, 900.0)).rotated(20.0);
    assert_recovers(&desk, 1e-6);
}

#[test]
fn keystoned_photo_maps_through_homography() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 10.0, Pt2::new(100.0, 900.0))
        .with_perspective(0.0, 0.004);
    let card = desk.card_corners_px(card_center(), STANDARD_CARD_WIDTH_CM, STANDARD_CARD_HEIGHT_CM);
    let cal = CalibrationSolver::default().solve(&card).unwrap();
    assert!(cal.transform.is_projective());
    assert_recovers(&desk, 1e-6);
}

#[test]
fn horizontally_keystoned_photo_keeps_item_rotation() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 10.0, Pt2::new(100.0, 900.0))
        .with_perspective(0.002, 0.003);
    let far_left = desk.detection("keyboard", Pt2::new(10.0, 5.0), 10.0);
    let far_right = desk.detection("keyboard", Pt2::new(100.0, 45.0), 10.0);
    // The photo shows the same desk angle differently across the image.
    assert!((far_left.rotation - far_right.rotation).abs() > 1.0);
    assert_recovers(&desk, 1e-6);
}

#[test]
fn jittered_clicks_stay_close_to_ground_truth() {
    let desk = SyntheticDesk::top_down(DESK_W, DESK_D, 20.0, Pt2::new(100.0, 1400.0)).rotated(8.0);
    let noise = UniformPixelNoise::new(7, 0.3);
    let card = noise.jitter_all(
        ClickStream::Calibration,
        &desk.card_corners_px(card_center(), STANDARD_CARD_WIDTH_CM, STANDARD_CARD_HEIGHT_CM),
    );
    let desk_clicks = noise.jitter_all(ClickStream::DeskBoundary, &desk.desk_corners_px());
    let mapper = mapper_for(&card, &desk_clicks);

    let truth = Pt2::new(60.0, 25.0);
    let det = desk.detection("monitor", truth, 0.0);
    let m = mapper.map(&det.position(), det.rotation).unwrap();
    assert!((m.distance_cm() - truth.y).abs() < 1.5, "distance {}", m.distance_cm());
    assert!(m.rotation_deg.abs() < 1.0, "rotation {}", m.rotation_deg);
}
