use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::record::RawRecord;

use super::MetarProvider;

pub const DEFAULT_ENDPOINT: &str = "https://www.aviationweather.gov/adds/dataserver_current/httpparam";
pub const DEFAULT_HOURS_BEFORE_NOW: u32 = 3;

/// Client for the aviationweather.gov ADDS data server.
#[derive(Debug, Clone)]
pub struct AviationWeatherProvider {
    endpoint: String,
    hours_before_now: u32,
    http: Client,
}

impl AviationWeatherProvider {
    pub fn new(endpoint: String, hours_before_now: u32) -> Self {
        Self {
            endpoint,
            hours_before_now,
            http: Client::new(),
        }
    }

    /// Replace the HTTP client with one that gives up after `timeout`.
    /// `None` keeps the transport default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Result<Self> {
        if let Some(timeout) = timeout {
            self.http = Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build HTTP client")?;
        }
        Ok(self)
    }

    fn query<'a>(&self, icao: &'a str, hours: &'a str) -> [(&'static str, &'a str); 6] {
        [
            ("dataSource", "metars"),
            ("requestType", "retrieve"),
            ("format", "xml"),
            ("stationString", icao),
            ("hoursBeforeNow", hours),
            ("mostRecent", "true"),
        ]
    }
}

#[async_trait]
impl MetarProvider for AviationWeatherProvider {
    async fn fetch(&self, icao: &str) -> Result<Option<RawRecord>> {
        let hours = self.hours_before_now.to_string();

        let res = self
            .http
            .get(&self.endpoint)
            .query(&self.query(icao, &hours))
            .send()
            .await
            .with_context(|| format!("Failed to send METAR request for {icao}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read METAR response body")?;

        if !status.is_success() {
            tracing::error!(
                "METAR request for {icao} failed with status {status}: {}",
                truncate_body(&body)
            );
            return Ok(None);
        }

        let record = RawRecord::from_xml(&body)
            .with_context(|| format!("Failed to parse METAR response for {icao}"))?;

        tracing::debug!("Fetched METAR for {icao} with {} fields", record.len());
        Ok(Some(record))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
