use crate::{Config, RawRecord, provider::aviationweather::AviationWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod aviationweather;

/// Source of METAR records.
#[async_trait]
pub trait MetarProvider: Send + Sync + Debug {
    /// Most recent METAR for `icao`.
    ///
    /// `Ok(None)` means the service answered but had no record for us.
    async fn fetch(&self, icao: &str) -> anyhow::Result<Option<RawRecord>>;
}

/// Construct the data-server provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn MetarProvider>> {
    config.validate()?;

    let provider = AviationWeatherProvider::new(config.endpoint.clone(), config.hours_before_now)
        .with_timeout(config.timeout())?;

    Ok(Box::new(provider))
}
