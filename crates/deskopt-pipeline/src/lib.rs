//! Scan-level workflow for `deskopt`.
//!
//! A [`ScanSession`] owns one photo's calibration and desk frame. Analysis
//! is a pure function of the session, the profile, the detections and the
//! rule book: the same inputs always give the same [`AnalysisReport`].
//!
//! ```
//! use deskopt_core::{DetectedItem, EngineConfig, Handedness, ProfileRef, Pt2, Role};
//! use deskopt_ergo::RuleBook;
//! use deskopt_pipeline::ScanSession;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::default();
//! let card = [
//!     Pt2::new(500.0, 700.0),
//!     Pt2::new(585.0, 700.0),
//!     Pt2::new(585.0, 754.0),
//!     Pt2::new(500.0, 754.0),
//! ];
//! let desk = [
//!     Pt2::new(100.0, 300.0),
//!     Pt2::new(1300.0, 300.0),
//!     Pt2::new(1300.0, 900.0),
//!     Pt2::new(100.0, 900.0),
//! ];
//! let session = ScanSession::calibrate(&card, &config)?.with_desk_boundary(&desk)?;
//!
//! let profile = ProfileRef { role: Role::Coder, handedness: Handedness::Right };
//! let items = [DetectedItem::new("keyboard", 700.0, 650.0, 0.0)];
//! let report = session.analyze(&profile, &items, &RuleBook::builtin());
//! assert_eq!(report.score.value(), Some(100.0));
//! # Ok(())
//! # }
//! ```

mod analysis;
mod session;

pub use analysis::*;
pub use session::*;
