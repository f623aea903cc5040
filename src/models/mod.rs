//! Defines the data structures and models used throughout the application.
//!
//! This includes the domain readings produced by the source adapters and the
//! wire structures used to deserialize each live API's responses.

mod air_quality;
mod openaq;
mod openweather;
mod satellite;

pub use air_quality::*;
pub use openaq::*;
pub use openweather::*;
pub use satellite::*;
