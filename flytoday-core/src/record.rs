use std::mem;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use thiserror::Error;

const METAR_TAG: &str = "metar";
const SKY_CONDITION_TAG: &str = "sky_condition";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to parse METAR XML")]
    Xml(#[from] quick_xml::Error),
}

/// One `sky_condition` element of a METAR record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyConditionRecord {
    pub sky_cover: String,
    pub cloud_base_ft_agl: Option<String>,
}

impl SkyConditionRecord {
    pub fn new(sky_cover: impl Into<String>, cloud_base_ft_agl: Option<&str>) -> Self {
        Self {
            sky_cover: sky_cover.into(),
            cloud_base_ft_agl: cloud_base_ft_agl.map(str::to_owned),
        }
    }
}

/// A METAR record as delivered by the data server: tag/value pairs in
/// document order plus the repeated sky condition sub-records.
///
/// No field is guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
    sky_conditions: Option<Vec<SkyConditionRecord>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the first `<METAR>` element of a data server response.
    ///
    /// A response without any METAR element yields an empty record.
    pub fn from_xml(xml: &str) -> Result<Self, RecordError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut record = RawRecord::new();
        let mut sky = Vec::new();
        let mut in_metar = false;
        let mut depth = 0usize;
        let mut current: Option<String> = None;
        let mut text = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = tag_name(&e);
                    if !in_metar {
                        in_metar = name == METAR_TAG;
                        continue;
                    }
                    depth += 1;
                    if name == SKY_CONDITION_TAG {
                        sky.push(sky_condition(&e)?);
                    } else if depth == 1 {
                        current = Some(name);
                        text.clear();
                    }
                }
                Event::Empty(e) if in_metar && depth == 0 => {
                    if tag_name(&e) == SKY_CONDITION_TAG {
                        sky.push(sky_condition(&e)?);
                    }
                }
                Event::Text(t) if depth == 1 && current.is_some() => {
                    text.push_str(&t.unescape()?);
                }
                Event::CData(c) if depth == 1 && current.is_some() => {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
                Event::End(_) if in_metar => {
                    if depth == 0 {
                        break;
                    }
                    if depth == 1 {
                        if let Some(tag) = current.take() {
                            if !text.is_empty() {
                                record.insert(tag, mem::take(&mut text));
                            }
                        }
                    }
                    depth -= 1;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !sky.is_empty() {
            record.sky_conditions = Some(sky);
        }

        Ok(record)
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Set a field, replacing an existing value in place.
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == tag) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((tag, value)),
        }
    }

    pub fn remove(&mut self, tag: &str) -> Option<String> {
        let index = self.fields.iter().position(|(name, _)| name == tag)?;
        Some(self.fields.remove(index).1)
    }

    pub fn sky_conditions(&self) -> Option<&[SkyConditionRecord]> {
        self.sky_conditions.as_deref()
    }

    pub fn set_sky_conditions(&mut self, conditions: Option<Vec<SkyConditionRecord>>) {
        self.sky_conditions = conditions;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of tag/value fields, not counting sky conditions.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.sky_conditions.is_none()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (tag, value) in iter {
            record.insert(tag, value);
        }
        record
    }
}

fn tag_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).to_ascii_lowercase()
}

fn sky_condition(start: &BytesStart<'_>) -> Result<SkyConditionRecord, RecordError> {
    let mut sky_cover = String::new();
    let mut cloud_base = None;

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"sky_cover" => sky_cover = value,
            b"cloud_base_ft_agl" => cloud_base = Some(value),
            _ => {}
        }
    }

    Ok(SkyConditionRecord {
        sky_cover,
        cloud_base_ft_agl: cloud_base,
    })
}
