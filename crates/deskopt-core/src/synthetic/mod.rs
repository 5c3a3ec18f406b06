//! Deterministic synthetic scenes for tests and examples.
//!
//! Nothing here touches `thread_rng`; every value is a pure function of its
//! inputs so fixtures are stable across platforms and versions.

pub mod noise;
pub mod scene;

pub use noise::UniformPixelNoise;
pub use scene::SyntheticDesk;
