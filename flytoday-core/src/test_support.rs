//! Fixtures and in-memory doubles shared by unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::{
    model::WeatherFacts,
    provider::MetarProvider,
    record::RawRecord,
    templates::{ResponseTemplate, TemplateError, TemplateStore},
};

pub const METAR_XML: &str = include_str!("../testdata/metar.xml");

pub fn fixture_record() -> RawRecord {
    RawRecord::from_xml(METAR_XML).expect("fixture parses")
}

/// Facts of the fixture as seen three hours after observation.
pub fn fixture_facts() -> WeatherFacts {
    let now = Utc.with_ymd_and_hms(2018, 10, 2, 21, 0, 0).unwrap() + Duration::hours(3);
    WeatherFacts::derive_at(&fixture_record(), now)
}

#[derive(Debug, Default)]
pub struct MapTemplateStore {
    templates: HashMap<(String, String), ResponseTemplate>,
}

impl MapTemplateStore {
    pub fn with(mut self, category: &str, key: &str, template: ResponseTemplate) -> Self {
        self.templates
            .insert((category.to_owned(), key.to_owned()), template);
        self
    }
}

impl TemplateStore for MapTemplateStore {
    fn lookup(&self, category: &str, key: &str) -> Result<ResponseTemplate, TemplateError> {
        self.templates
            .get(&(category.to_owned(), key.to_owned()))
            .cloned()
            .ok_or_else(|| TemplateError::KeyNotFound {
                category: category.to_owned(),
                key: key.to_owned(),
            })
    }
}

/// Provider answering every station with the same canned result.
#[derive(Debug)]
pub enum StaticProvider {
    Record(RawRecord),
    Unavailable,
    Failing,
}

#[async_trait]
impl MetarProvider for StaticProvider {
    async fn fetch(&self, _icao: &str) -> anyhow::Result<Option<RawRecord>> {
        match self {
            StaticProvider::Record(record) => Ok(Some(record.clone())),
            StaticProvider::Unavailable => Ok(None),
            StaticProvider::Failing => Err(anyhow::anyhow!("connection refused")),
        }
    }
}
