//! Wire structures for the satellite endpoint.
//!
//! There is no public TEMPO API; this is the payload the service accepts from whatever
//! endpoint is configured. Anything else is treated as malformed.

use super::{Coordinates, Quality, SatelliteMeasurements, SatelliteReading};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SatelliteResponse {
    pub timestamp: Option<DateTime<Utc>>,
    pub measurements: SatelliteResponseMeasurements,
    pub quality: Option<Quality>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteResponseMeasurements {
    pub no2: f64,
    pub formaldehyde: f64,
    pub ozone: f64,
    pub aerosol_optical_depth: f64,
}

impl SatelliteResponseMeasurements {
    /// True when every value is a finite, non-negative number.
    pub fn is_physical(&self) -> bool {
        [self.no2, self.formaldehyde, self.ozone, self.aerosol_optical_depth]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl SatelliteResponse {
    /// Builds the reading; `fallback_quality` is used when the payload has no classification.
    pub fn into_reading(
        self,
        location: Coordinates,
        now: DateTime<Utc>,
        fallback_quality: Quality,
    ) -> SatelliteReading {
        let m = self.measurements;
        SatelliteReading {
            timestamp: self.timestamp.unwrap_or(now),
            location,
            measurements: SatelliteMeasurements {
                no2: m.no2,
                formaldehyde: m.formaldehyde,
                ozone: m.ozone,
                aerosol_optical_depth: m.aerosol_optical_depth,
            },
            quality: self.quality.unwrap_or(fallback_quality),
        }
    }
}
