//! Closed-form geometry for `deskopt`.
//!
//! - [`CalibrationSolver`]: four clicked reference-card corners to a
//!   pixel-to-centimeter transform (pure scale, or a homography when the
//!   card is seen askew).
//! - [`CoordinateMapper`]: pixel positions to desk-relative centimeters,
//!   with the origin at the configured corner of the user edge.
//!
//! Everything here is a pure function of its inputs and the explicit
//! configuration.

mod calibration;
mod homography;
mod mapping;
mod math;
mod quad;

pub use calibration::*;
pub use homography::*;
pub use mapping::*;
pub use math::*;
pub use quad::*;
