/// Phrase returned whenever a request cannot be answered.
pub const STANDARD_ERROR_MESSAGE: &str =
    "Sorry, we couldn't get the weather right now, try again soon.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wind {
    pub speed_kt: String,
    pub direction_deg: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    pub statute_mi: f64,
    pub km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elevation {
    pub meters: f64,
    pub feet: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationTime {
    /// Hour and minute in UTC, e.g. `"2100"`.
    pub zulu: String,
    /// e.g. `"3 hours ago"`.
    pub relative: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkyCondition {
    pub label: String,
    pub cloud_base_ft_agl: Option<String>,
}

/// Typed view of a METAR record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherFacts {
    pub station_id: Option<String>,
    pub observation_time: Option<ObservationTime>,
    pub wind: Option<Wind>,
    pub visibility: Option<Visibility>,
    pub altimeter: Option<String>,
    pub temperature: Option<Temperature>,
    pub dewpoint: Option<Temperature>,
    pub elevation: Option<Elevation>,
    pub flight_category: Option<String>,
    pub raw_text: Option<String>,
    /// Never `Some` of an empty list.
    pub sky_conditions: Option<Vec<SkyCondition>>,
}

/// Speech and display text answering one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub speech: String,
    pub text: String,
}

impl RenderedResponse {
    pub fn new(speech: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            text: text.into(),
        }
    }

    /// Same phrase on both channels.
    pub fn both(phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        Self {
            speech: phrase.clone(),
            text: phrase,
        }
    }

    pub fn standard_error() -> Self {
        Self::both(STANDARD_ERROR_MESSAGE)
    }
}
