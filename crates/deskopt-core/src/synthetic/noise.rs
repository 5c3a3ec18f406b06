//! Deterministic click jitter.
//!
//! Simulates the imprecision of a user clicking corners and of detector
//! centers without depending on the internal algorithm of any RNG crate.

use crate::{Pt2, Real, Vec2};

/// Independent jitter streams, so calibration and desk clicks never share noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStream {
    Calibration,
    DeskBoundary,
    Detection,
}

impl ClickStream {
    fn salt(self) -> u64 {
        match self {
            ClickStream::Calibration => 0x2545_F491_4F6C_DD1D,
            ClickStream::DeskBoundary => 0x9E37_79B9_7F4A_7C15,
            ClickStream::Detection => 0xD1B5_4A32_D192_ED03,
        }
    }
}

/// Deterministic uniform pixel noise in `[-max_abs_px, +max_abs_px]` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformPixelNoise {
    pub seed: u64,
    pub max_abs_px: Real,
}

impl UniformPixelNoise {
    pub fn new(seed: u64, max_abs_px: Real) -> Self {
        Self { seed, max_abs_px }
    }

    /// Offset for the `index`-th click of a stream.
    pub fn sample(&self, stream: ClickStream, index: usize) -> Vec2 {
        let max_abs = self.max_abs_px.abs();
        if max_abs == 0.0 {
            return Vec2::zeros();
        }

        let key = self.seed ^ stream.salt() ^ (index as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        let u = unit_interval(splitmix64(key));
        let v = unit_interval(splitmix64(key ^ 0x94D0_49BB_1331_11EB));
        Vec2::new((u - 0.5) * 2.0 * max_abs, (v - 0.5) * 2.0 * max_abs)
    }

    pub fn jitter(&self, stream: ClickStream, index: usize, p: Pt2) -> Pt2 {
        p + self.sample(stream, index)
    }

    pub fn jitter_all(&self, stream: ClickStream, points: &[Pt2]) -> Vec<Pt2> {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| self.jitter(stream, i, *p))
            .collect()
    }
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// Top 53 bits as a double in [0, 1).
fn unit_interval(x: u64) -> Real {
    ((x >> 11) as Real) * (1.0 / ((1u64 << 53) as Real))
}
