//! Core math and domain primitives for `deskopt`.
//!
//! This crate provides the foundational building blocks used by all other
//! crates in the workspace:
//!
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, and friends) and
//!   homogeneous / angle helpers,
//! - the domain records the engine consumes (profiles, item categories,
//!   ergonomic rules, detected items),
//! - the explicit [`EngineConfig`] passed into every component,
//! - deterministic synthetic scene helpers for tests and examples.
//!
//! Pipeline (conceptually):
//! `clicks -> calibration -> desk cm -> rule -> verdict -> score/recommendations`
//!
//! # Modules
//!
//! - \[`math`\]: basic type aliases, homogeneous helpers, angle wrapping.
//! - \[`types`\]: profile, catalog and detection records.
//! - \[`config`\]: engine configuration with serde defaults.
//! - \[`synthetic`\]: deterministic synthetic data helpers (tests/examples).
//!
//! # Example
//!
//! ```
//! use deskopt_core::{EngineConfig, Handedness, Profile, Role};
//!
//! let profile = Profile::new("Ada", Role::Coder, Handedness::Right).unwrap();
//! assert_eq!(profile.role.slug(), "coder");
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.calibration.reference_width_cm, 8.5);
//! ```

/// Engine configuration (calibration, mapping, evaluation, scoring).
mod config;
/// Linear algebra type aliases and helpers.
mod math;
/// Deterministic synthetic data generation helpers.
///
/// Builds card quadrilaterals, desk outlines and detections with known
/// ground truth. Used in workspace tests and the facade crate's examples.
pub mod synthetic;
/// Domain records shared by the engine crates.
mod types;

pub use config::*;
pub use math::*;
pub use types::*;
