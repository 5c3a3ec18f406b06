//! One calibrated scan.

use crate::analysis::{
    AnalysisError, AnalysisReport, CalibrationSummary, RejectedDetection, RejectionReason,
};
use deskopt_core::{DetectedItem, EngineConfig, ProfileRef, Pt2};
use deskopt_ergo::{
    PlacementEvaluator, RecommendationGenerator, RuleAmbiguity, RuleBook, RuleMatcher,
    ScoreAggregator,
};
use deskopt_linear::{Calibration, CalibrationError, CalibrationSolver, CoordinateMapper, DeskBoundary};
use log::{debug, info, warn};

/// Calibration, optional desk boundary and the resulting desk frame of one
/// photo.
///
/// The calibration is fixed for the session's lifetime; calibrating again
/// means building a new session.
#[derive(Debug, Clone)]
pub struct ScanSession {
    config: EngineConfig,
    calibration: Calibration,
    boundary: Option<DeskBoundary>,
    mapper: CoordinateMapper,
}

impl ScanSession {
    /// Solve the calibration from four reference-card clicks.
    ///
    /// The configuration is validated first. Without a desk boundary,
    /// positions are measured from the card.
    pub fn calibrate(clicks: &[Pt2], config: &EngineConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let calibration = CalibrationSolver::new(config.calibration.clone()).solve(clicks)?;
        let mapper = CoordinateMapper::new(&calibration, None, &config.mapping)?;
        Ok(Self {
            config: config.clone(),
            calibration,
            boundary: None,
            mapper,
        })
    }

    /// Measure distances from the desk's user edge instead of the card.
    pub fn with_desk_boundary(self, clicks: &[Pt2]) -> Result<Self, CalibrationError> {
        let boundary = DeskBoundary::new(clicks, &self.config.calibration)?;
        let mapper = CoordinateMapper::new(&self.calibration, Some(&boundary), &self.config.mapping)?;
        Ok(Self {
            boundary: Some(boundary),
            mapper,
            ..self
        })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn desk_boundary(&self) -> Option<&DeskBoundary> {
        self.boundary.as_ref()
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn boundary_known(&self) -> bool {
        self.mapper.boundary_known()
    }

    /// Evaluate a profile's detections against the rule book.
    ///
    /// Unconfirmed detections and detections with unusable geometry are
    /// listed as rejected; unknown slugs are evaluated as unregulated.
    pub fn analyze(
        &self,
        profile: &ProfileRef,
        detections: &[DetectedItem],
        book: &RuleBook,
    ) -> AnalysisReport {
        let matcher = RuleMatcher::new(book, &self.config.evaluation);
        let evaluator = PlacementEvaluator::new(self.config.evaluation.clone());

        let mut verdicts = Vec::with_capacity(detections.len());
        let mut rejected = Vec::new();
        let mut ambiguities: Vec<RuleAmbiguity> = Vec::new();

        for (index, item) in detections.iter().enumerate() {
            let reject = |reason| RejectedDetection {
                index,
                item_slug: item.item_slug.clone(),
                reason,
            };
            if !item.is_correct {
                debug!("skipping unconfirmed detection #{index} ({})", item.item_slug);
                rejected.push(reject(RejectionReason::Unconfirmed));
                continue;
            }
            if !item.has_finite_geometry() {
                warn!("rejecting detection #{index} ({}): non-finite geometry", item.item_slug);
                rejected.push(reject(RejectionReason::NonFiniteGeometry));
                continue;
            }
            let Some(position) = self.mapper.map(&item.position(), item.rotation) else {
                warn!("rejecting detection #{index} ({}): not mappable onto the desk", item.item_slug);
                rejected.push(reject(RejectionReason::Unmappable));
                continue;
            };

            let resolution = matcher.resolve(profile.role, profile.handedness, &item.item_slug);
            if let Some(amb) = resolution.as_ref().and_then(|r| r.ambiguity.as_ref()) {
                if !ambiguities.contains(amb) {
                    ambiguities.push(amb.clone());
                }
            }

            let verdict = evaluator.evaluate(index, item, position, resolution);
            debug!(
                "#{index} {} at {:.1} cm, {:.1} deg: {:?}",
                item.item_slug,
                position.distance_cm(),
                position.rotation_deg,
                verdict.classification()
            );
            verdicts.push(verdict);
        }

        let score = ScoreAggregator::from_config(&self.config).aggregate(&verdicts);
        let recommendations = RecommendationGenerator::new().generate(&verdicts, book);

        match score.value() {
            Some(value) => info!(
                "{} scan: score {:.1} from {} verdicts, {} recommendations",
                profile.role,
                value,
                verdicts.len(),
                recommendations.len()
            ),
            None => info!(
                "{} scan: insufficient data ({} verdicts, {} rejected)",
                profile.role,
                verdicts.len(),
                rejected.len()
            ),
        }

        AnalysisReport {
            profile: *profile,
            calibration: CalibrationSummary::from(&self.calibration),
            boundary_known: self.mapper.boundary_known(),
            desk_dimensions: self.mapper.desk_dimensions(),
            verdicts,
            score,
            recommendations,
            ambiguities,
            rejected,
        }
    }
}
