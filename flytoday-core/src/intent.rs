use std::fmt;

use crate::{
    model::{RenderedResponse, WeatherFacts},
    render::Renderer,
};

/// What the user asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    FlightCondition,
    Wind,
    Visibility,
    Altimeter,
    Temperature,
    Elevation,
    MetarRaw,
    MetarParsed,
    /// Anything else, including a request that carried no intent at all.
    Unrecognized(Option<String>),
}

impl Intent {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("get_flight_condition") => Intent::FlightCondition,
            Some("get_wind_information" | "get_wind_speed") => Intent::Wind,
            Some("get_visibility") => Intent::Visibility,
            Some("get_altimeter") => Intent::Altimeter,
            Some("get_temperature") => Intent::Temperature,
            Some("get_elevation") => Intent::Elevation,
            Some("get_metar_raw") => Intent::MetarRaw,
            Some("get_metar_parsed") => Intent::MetarParsed,
            other => Intent::Unrecognized(other.map(str::to_owned)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Intent::FlightCondition => "get_flight_condition",
            Intent::Wind => "get_wind_information",
            Intent::Visibility => "get_visibility",
            Intent::Altimeter => "get_altimeter",
            Intent::Temperature => "get_temperature",
            Intent::Elevation => "get_elevation",
            Intent::MetarRaw => "get_metar_raw",
            Intent::MetarParsed => "get_metar_parsed",
            Intent::Unrecognized(Some(name)) => name,
            Intent::Unrecognized(None) => "No Intent",
        }
    }

    pub fn all() -> &'static [Intent] {
        KNOWN_INTENTS
    }
}

const KNOWN_INTENTS: &[Intent] = &[
    Intent::FlightCondition,
    Intent::Wind,
    Intent::Visibility,
    Intent::Altimeter,
    Intent::Temperature,
    Intent::Elevation,
    Intent::MetarRaw,
    Intent::MetarParsed,
];

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer `intent` from `facts`.
///
/// Never fails: an unrecognized intent, or one whose facts or templates are
/// missing, gets the standard error phrase.
pub fn dispatch(intent: &Intent, facts: &WeatherFacts, renderer: &Renderer<'_>) -> RenderedResponse {
    let rendered = match intent {
        Intent::FlightCondition => renderer.flight_category(facts),
        Intent::Wind => renderer.wind(facts),
        Intent::Visibility => renderer.visibility(facts),
        Intent::Altimeter => renderer.altimeter(facts),
        Intent::Temperature => renderer.temperature(facts),
        Intent::Elevation => renderer.elevation(facts),
        Intent::MetarRaw => renderer.metar_raw(facts),
        Intent::MetarParsed => renderer.metar_parsed(facts),
        Intent::Unrecognized(_) => {
            tracing::error!("An unexpected intent occurred: {intent}");
            return RenderedResponse::standard_error();
        }
    };

    rendered.unwrap_or_else(|err| {
        tracing::error!("Failed to answer {intent}: {err}");
        RenderedResponse::standard_error()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::STANDARD_ERROR_MESSAGE,
        templates::BuiltinTemplateStore,
        test_support::fixture_facts,
    };

    #[test]
    fn intent_name_roundtrip() {
        for intent in Intent::all() {
            assert_eq!(Intent::from_name(Some(intent.as_str())), *intent);
        }
    }

    #[test]
    fn wind_speed_is_an_alias() {
        assert_eq!(Intent::from_name(Some("get_wind_speed")), Intent::Wind);
    }

    #[test]
    fn unknown_and_missing_intents() {
        assert_eq!(
            Intent::from_name(Some("get_lunch")),
            Intent::Unrecognized(Some("get_lunch".into()))
        );
        assert_eq!(Intent::from_name(None), Intent::Unrecognized(None));
        assert_eq!(Intent::from_name(None).to_string(), "No Intent");
    }

    #[test]
    fn dispatches_to_the_matching_rendering() {
        let renderer = Renderer::new(&BuiltinTemplateStore, "Test Airport");
        let facts = fixture_facts();

        let out = dispatch(&Intent::Wind, &facts, &renderer);
        assert_eq!(out.speech, "At Test Airport, winds are currently 8 knots at 340 degrees.");

        let out = dispatch(&Intent::FlightCondition, &facts, &renderer);
        assert_eq!(out.speech, "It's looking like low IFR right now at Test Airport.");
    }

    #[test]
    fn unrecognized_intent_gets_standard_error_on_both_channels() {
        let renderer = Renderer::new(&BuiltinTemplateStore, "Test Airport");
        let out = dispatch(&Intent::from_name(Some("get_lunch")), &fixture_facts(), &renderer);
        assert_eq!(out.speech, STANDARD_ERROR_MESSAGE);
        assert_eq!(out.text, STANDARD_ERROR_MESSAGE);
    }

    #[test]
    fn missing_fact_gets_standard_error() {
        let renderer = Renderer::new(&BuiltinTemplateStore, "Test Airport");
        let mut facts = fixture_facts();
        facts.visibility = None;

        let out = dispatch(&Intent::Visibility, &facts, &renderer);
        assert_eq!(out, RenderedResponse::standard_error());
    }
}
