//! Exchange-rate source abstraction

use crate::core::error::ConverterError;
use crate::core::snapshot::RateSnapshot;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest rates relative to `base`. Provider-side error payloads come back as `Err`.
    async fn latest(&self, base: &str) -> Result<RateSnapshot, ConverterError>;
}
