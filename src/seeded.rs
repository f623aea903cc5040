//! Deterministic pseudo-random values derived from string seeds.
//!
//! Synthetic readings must be identical every time the same location is rendered, so
//! nothing here touches an ambient RNG: a seed is hashed into 32 bits of state and
//! stirred with xorshift-style rounds. All arithmetic is wrapping `u32`.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, Quality};
use std::fmt::Display;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// A stream of reproducible values in [0, 1) keyed on a seed string.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Hashes the seed (FNV-1a over UTF-16 code units) into the initial state.
    ///
    /// The empty seed is valid and starts from the offset basis.
    pub fn new(seed: &str) -> Self {
        let state = seed
            .encode_utf16()
            .fold(FNV_OFFSET_BASIS, |h, unit| (h ^ u32::from(unit)).wrapping_mul(FNV_PRIME));
        Self { state }
    }

    /// Advances the state by one mixing round and maps it into [0, 1) in steps of 1e-4.
    pub fn next_unit(&mut self) -> f64 {
        let mut h = self.state;
        h = h.wrapping_add(h << 13);
        h ^= h >> 7;
        h = h.wrapping_add(h << 3);
        h ^= h >> 17;
        h = h.wrapping_add(h << 5);
        self.state = h;
        f64::from(h % 10_000) / 10_000.0
    }
}

/// The first value of the stream for `seed`, scaled linearly into [min, max].
///
/// Accepts string and numeric seeds alike; numbers are seeded by their decimal form.
pub fn seeded_value(seed: impl Display, min: f64, max: f64) -> Result<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "generator bounds must be finite, got [{}, {}]",
            min, max
        )));
    }
    let unit = SeededRng::new(&seed.to_string()).next_unit();
    Ok(min + unit * (max - min))
}

/// A seeded value with geographic variation applied, rounded to two decimals.
///
/// Latitudes nearer the equator than 40 degrees are scaled by 1.2 (0.8 otherwise);
/// longitudes whose `|lng| mod 10` is below 5 by 0.9 (1.1 otherwise).
pub fn realistic_value(min: f64, max: f64, coords: Coordinates, label: Option<&str>) -> Result<f64> {
    let seed = match label {
        Some(label) => format!("{}_{}", label, coords.seed_label()),
        None => coords.seed_label(),
    };
    let base = seeded_value(seed, min, max)?;
    let urban_factor = if coords.lat.abs() < 40.0 { 1.2 } else { 0.8 };
    let coastal_factor = if coords.lng.abs() % 10.0 < 5.0 { 0.9 } else { 1.1 };
    let scaled = base * urban_factor * coastal_factor;
    Ok(((scaled * 100.0).round() / 100.0).max(0.0))
}

/// Classifies a synthetic 0-100 pollution score for the location.
pub fn determine_quality(coords: Coordinates, label: Option<&str>) -> Result<Quality> {
    realistic_value(0.0, 100.0, coords, label).map(Quality::from_score)
}
