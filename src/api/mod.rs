//! Provides clients and utilities for interacting with external APIs.
//!
//! Includes:
//! - `satellite`: Client for the (simulated) NASA TEMPO satellite endpoint.
//! - `openaq`: Client for OpenAQ ground station data.
//! - `openweather`: Client for OpenWeatherMap current conditions.
//! - `synthetic`: Deterministic stand-in data used whenever a live source fails.
//!
//! Every client implements [`AirDataSource`]: one live attempt, then a silent fallback
//! to synthetic data. Only a failure of the synthetic generator itself is returned as an error.

mod openaq;
mod openweather;
mod satellite;
mod synthetic;

pub use openaq::*;
pub use openweather::*;
pub use satellite::*;
pub use synthetic::*;

use crate::error::Result;
use crate::models::{Coordinates, Sourced};
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::info;

/// A single data source with a live path and a deterministic fallback.
pub trait AirDataSource {
    type Reading;

    /// Short name used in log lines.
    const NAME: &'static str;

    /// One attempt against the live API. Any error triggers the fallback.
    async fn fetch_live(&self, coords: Coordinates) -> Result<Self::Reading>;

    /// Deterministic reading for `coords`, stamped with `now` where the reading has a time.
    fn synthesize(&self, coords: Coordinates, now: DateTime<Utc>) -> Result<Self::Reading>;

    /// Live reading if available, synthetic otherwise.
    async fn fetch(&self, coords: Coordinates) -> Result<Sourced<Self::Reading>> {
        with_fallback(Self::NAME, coords, self.fetch_live(coords), || {
            self.synthesize(coords, Utc::now())
        })
        .await
    }
}

/// Awaits `live`; on error logs the reason and returns `synthesize()` instead.
///
/// Exactly one info line is emitted per call, naming the path taken.
pub async fn with_fallback<T, L, S>(
    source: &str,
    coords: Coordinates,
    live: L,
    synthesize: S,
) -> Result<Sourced<T>>
where
    L: Future<Output = Result<T>>,
    S: FnOnce() -> Result<T>,
{
    match live.await {
        Ok(reading) => {
            info!(source, %coords, "Using live data");
            Ok(Sourced::Live(reading))
        },
        Err(e) => {
            info!(source, %coords, reason = %e, "Falling back to synthetic data");
            synthesize().map(Sourced::Synthetic)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Provenance;

    #[tokio::test]
    async fn test_with_fallback_prefers_live() {
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        let result = with_fallback("test", coords, async { Ok(7) }, || Ok(0))
            .await
            .unwrap();
        assert_eq!(result, Sourced::Live(7));
    }

    #[tokio::test]
    async fn test_with_fallback_swallows_live_errors() {
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        let result = with_fallback(
            "test",
            coords,
            async { Err::<i32, _>(AppError::SourceUnavailable("down".into())) },
            || Ok(3),
        )
        .await
        .unwrap();
        assert_eq!(result.provenance(), Provenance::Synthetic);
        assert_eq!(result.into_inner(), 3);
    }

    #[tokio::test]
    async fn test_with_fallback_surfaces_generator_failure() {
        let coords = Coordinates::new(1.0, 2.0).unwrap();
        let result = with_fallback(
            "test",
            coords,
            async { Err::<i32, _>(AppError::SourceUnavailable("down".into())) },
            || Err(AppError::InvalidInput("bad bounds".into())),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
