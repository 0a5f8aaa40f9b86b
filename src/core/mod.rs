//! Converter domain: rates, state, arithmetic and the rendering surface

pub mod alerts;
pub mod binder;
pub mod calculator;
pub mod config;
pub mod converter;
pub mod error;
pub mod log;
pub mod provider;
pub mod snapshot;
pub mod state;
pub mod surface;

// Re-export main types for cleaner imports
pub use converter::Converter;
pub use error::ConverterError;
pub use provider::RateProvider;
pub use snapshot::{RateSnapshot, RateTable};
pub use state::RateState;
pub use surface::{MemorySurface, Surface, Widget};
