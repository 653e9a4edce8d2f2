//! Derivation of typed weather facts from a [`RawRecord`].
//!
//! A fact whose source fields are missing (or unreadable) is `None`; nothing
//! here fails. Paired values such as Celsius/Fahrenheit are always derived
//! together.

use chrono::{DateTime, Timelike, Utc};

use crate::{
    codes::sky_cover_label,
    model::{
        Elevation, ObservationTime, SkyCondition, Temperature, Visibility, WeatherFacts, Wind,
    },
    record::RawRecord,
    units,
};

pub const STATION_ID: &str = "station_id";
pub const OBSERVATION_TIME: &str = "observation_time";
pub const WIND_SPEED: &str = "wind_speed_kt";
pub const WIND_DIRECTION: &str = "wind_dir_degrees";
pub const VISIBILITY: &str = "visibility_statute_mi";
pub const ALTIMETER: &str = "altim_in_hg";
pub const TEMPERATURE: &str = "temp_c";
pub const DEWPOINT: &str = "dewpoint_c";
pub const ELEVATION: &str = "elevation_m";
pub const FLIGHT_CATEGORY: &str = "flight_category";
pub const RAW_TEXT: &str = "raw_text";

impl WeatherFacts {
    pub fn derive(record: &RawRecord) -> Self {
        Self::derive_at(record, Utc::now())
    }

    /// Derive every fact, computing relative time against `now`.
    pub fn derive_at(record: &RawRecord, now: DateTime<Utc>) -> Self {
        Self {
            station_id: station_id(record),
            observation_time: observation_time_at(record, now),
            wind: wind(record),
            visibility: visibility(record),
            altimeter: altimeter(record),
            temperature: temperature(record),
            dewpoint: dewpoint(record),
            elevation: elevation(record),
            flight_category: flight_category(record),
            raw_text: raw_text(record),
            sky_conditions: sky_conditions(record),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn wind(record: &RawRecord) -> Option<Wind> {
    let speed = record.get(WIND_SPEED)?;
    let direction = record.get(WIND_DIRECTION)?;
    Some(Wind {
        speed_kt: speed.trim().to_owned(),
        direction_deg: direction.trim().to_owned(),
    })
}

pub fn visibility(record: &RawRecord) -> Option<Visibility> {
    let statute_mi = number(record, VISIBILITY)?;
    Some(Visibility {
        statute_mi,
        km: units::statute_miles_to_km(statute_mi),
    })
}

pub fn altimeter(record: &RawRecord) -> Option<String> {
    record.get(ALTIMETER).map(str::to_owned)
}

pub fn temperature(record: &RawRecord) -> Option<Temperature> {
    celsius(record, TEMPERATURE)
}

pub fn dewpoint(record: &RawRecord) -> Option<Temperature> {
    celsius(record, DEWPOINT)
}

pub fn elevation(record: &RawRecord) -> Option<Elevation> {
    let meters = number(record, ELEVATION)?;
    Some(Elevation {
        meters,
        feet: units::meters_to_feet(meters),
    })
}

/// Raw report with every line break removed (not replaced).
pub fn raw_text(record: &RawRecord) -> Option<String> {
    record
        .get(RAW_TEXT)
        .map(|raw| raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect())
}

/// Flight category code, trimmed and upper-cased.
pub fn flight_category(record: &RawRecord) -> Option<String> {
    match record.get(FLIGHT_CATEGORY) {
        Some(category) => Some(category.trim().to_uppercase()),
        None => {
            tracing::warn!("{FLIGHT_CATEGORY} not present in METAR record");
            None
        }
    }
}

pub fn station_id(record: &RawRecord) -> Option<String> {
    record.get(STATION_ID).map(|id| id.trim().to_uppercase())
}

pub fn observation_time(record: &RawRecord) -> Option<ObservationTime> {
    observation_time_at(record, Utc::now())
}

pub fn observation_time_at(record: &RawRecord, now: DateTime<Utc>) -> Option<ObservationTime> {
    let raw = record.get(OBSERVATION_TIME)?;
    let observed = match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(err) => {
            tracing::debug!("Unreadable observation time {raw:?}: {err}");
            return None;
        }
    };

    Some(ObservationTime {
        zulu: format!("{:02}{:02}", observed.hour(), observed.minute()),
        relative: humanize(observed, now),
    })
}

/// Sky conditions with their cover codes translated. An empty list is `None`.
pub fn sky_conditions(record: &RawRecord) -> Option<Vec<SkyCondition>> {
    let conditions: Vec<SkyCondition> = record
        .sky_conditions()?
        .iter()
        .map(|sky| SkyCondition {
            label: sky_cover_label(&sky.sky_cover).to_owned(),
            cloud_base_ft_agl: sky.cloud_base_ft_agl.clone(),
        })
        .collect();

    (!conditions.is_empty()).then_some(conditions)
}

/// Relative description of `then` as seen from `now`, e.g. `"3 hours ago"`.
pub fn humanize(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let delta = (now - then).num_seconds();
    let secs = delta.unsigned_abs();
    let days = secs / DAY;

    let phrase = match secs {
        0..10 => return "just now".to_string(),
        10..45 => "seconds".to_string(),
        45..90 => "a minute".to_string(),
        90..2700 => format!("{} minutes", (secs / MINUTE).max(2)),
        2700..5400 => "an hour".to_string(),
        5400..79_200 => format!("{} hours", (secs / HOUR).max(2)),
        79_200..129_600 => "a day".to_string(),
        _ if days < 26 => format!("{} days", days.max(2)),
        _ if days < 45 => "a month".to_string(),
        _ if days < 320 => format!("{} months", (days / 30).max(2)),
        _ if days < 548 => "a year".to_string(),
        _ => format!("{} years", (days / 365).max(2)),
    };

    if delta >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn celsius(record: &RawRecord, tag: &str) -> Option<Temperature> {
    let celsius = number(record, tag)?;
    Some(Temperature {
        celsius,
        fahrenheit: units::celsius_to_fahrenheit(celsius),
    })
}

// The data server reports unbounded visibility as e.g. "10+".
fn number(record: &RawRecord, tag: &str) -> Option<f64> {
    let raw = record.get(tag)?;
    match raw.trim().trim_end_matches('+').parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::debug!("Field {tag} is not numeric: {raw:?}");
            None
        }
    }
}
