//! Dialogflow fulfillment: request accessors and the end-to-end handler.

use serde::{Deserialize, Serialize};

use crate::{
    intent::{Intent, dispatch},
    model::{RenderedResponse, WeatherFacts},
    provider::MetarProvider,
    render::Renderer,
    templates::TemplateStore,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<IntentRef>,
    #[serde(default)]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub airport: Option<Airport>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Airport {
    #[serde(rename = "ICAO")]
    pub icao: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
}

impl WebhookRequest {
    fn airport(&self) -> Option<&Airport> {
        self.query_result.as_ref()?.parameters.as_ref()?.airport.as_ref()
    }

    pub fn icao_code(&self) -> Option<&str> {
        self.airport()?
            .icao
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub fn airport_name(&self) -> Option<&str> {
        self.airport()?.name.as_deref()
    }

    /// Airport name as read to the user: the city is appended unless the
    /// name already mentions it.
    pub fn airport_display_name(&self) -> Option<String> {
        let airport = self.airport()?;
        let name = airport.name.as_deref()?;
        match airport.city.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() && !name.to_lowercase().contains(&city.to_lowercase()) => {
                Some(format!("{name}, {city}"))
            }
            _ => Some(name.to_owned()),
        }
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.query_result
            .as_ref()?
            .intent
            .as_ref()?
            .display_name
            .as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl From<RenderedResponse> for WebhookResponse {
    fn from(rendered: RenderedResponse) -> Self {
        Self {
            fulfillment_text: rendered.speech,
        }
    }
}

/// Answers fulfillment requests with a METAR provider and a template store.
#[derive(Debug)]
pub struct WebhookHandler {
    provider: Box<dyn MetarProvider>,
    templates: Box<dyn TemplateStore>,
}

impl WebhookHandler {
    pub fn new(provider: Box<dyn MetarProvider>, templates: Box<dyn TemplateStore>) -> Self {
        Self {
            provider,
            templates,
        }
    }

    /// Handle a raw JSON request body. Unreadable bodies get the standard error.
    pub async fn handle_json(&self, body: &str) -> WebhookResponse {
        match serde_json::from_str::<WebhookRequest>(body) {
            Ok(request) => self.handle(&request).await,
            Err(err) => {
                tracing::error!("Unreadable webhook request: {err}");
                RenderedResponse::standard_error().into()
            }
        }
    }

    pub async fn handle(&self, request: &WebhookRequest) -> WebhookResponse {
        let Some(icao) = request.icao_code() else {
            tracing::error!("No ICAO code provided.");
            return RenderedResponse::standard_error().into();
        };

        let airport = request.airport_display_name();
        self.answer(icao, airport.as_deref(), request.intent_name())
            .await
            .into()
    }

    /// Fetch the METAR for `icao` and answer `intent_name` about it.
    pub async fn answer(
        &self,
        icao: &str,
        airport_name: Option<&str>,
        intent_name: Option<&str>,
    ) -> RenderedResponse {
        let record = match self.provider.fetch(icao).await {
            Ok(Some(record)) => record,
            Ok(None) => Default::default(),
            Err(err) => {
                tracing::error!("Failed to fetch METAR for {icao}: {err:#}");
                Default::default()
            }
        };

        let facts = WeatherFacts::derive(&record);
        if facts.is_empty() {
            tracing::error!("Wasn't able to get a METAR record for {icao}.");
            return RenderedResponse::standard_error();
        }

        let intent = Intent::from_name(intent_name);
        let airport = airport_name.unwrap_or(icao);
        tracing::info!("Answering {intent} for {icao}");

        let renderer = Renderer::new(self.templates.as_ref(), airport);
        dispatch(&intent, &facts, &renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::STANDARD_ERROR_MESSAGE,
        templates::BuiltinTemplateStore,
        test_support::{StaticProvider, fixture_record},
    };

    const SAMPLE_REQUEST: &str = r#"{
        "responseId": "a1b2c3",
        "queryResult": {
            "queryText": "what's the weather like at London",
            "parameters": {
                "airport": {
                    "ICAO": "CYXU",
                    "IATA": "YXU",
                    "name": "London",
                    "city": "London",
                    "country": "Canada"
                }
            },
            "intent": {
                "name": "projects/fly-today/agent/intents/1234",
                "displayName": "get_flight_condition"
            },
            "languageCode": "en"
        }
    }"#;

    fn handler(provider: StaticProvider) -> WebhookHandler {
        WebhookHandler::new(Box::new(provider), Box::new(BuiltinTemplateStore))
    }

    fn error_response() -> WebhookResponse {
        WebhookResponse {
            fulfillment_text: STANDARD_ERROR_MESSAGE.to_string(),
        }
    }

    #[test]
    fn reads_airport_and_intent_from_request() {
        let request: WebhookRequest = serde_json::from_str(SAMPLE_REQUEST).unwrap();
        assert_eq!(request.icao_code(), Some("CYXU"));
        assert_eq!(request.airport_name(), Some("London"));
        assert_eq!(request.intent_name(), Some("get_flight_condition"));
    }

    #[test]
    fn missing_parts_read_as_none() {
        let request: WebhookRequest = serde_json::from_str(r#"{"queryResult": {}}"#).unwrap();
        assert_eq!(request.icao_code(), None);
        assert_eq!(request.airport_name(), None);
        assert_eq!(request.intent_name(), None);

        let request: WebhookRequest =
            serde_json::from_str(r#"{"queryResult": {"parameters": {"airport": {"ICAO": ""}}}}"#)
                .unwrap();
        assert_eq!(request.icao_code(), None);
    }

    #[test]
    fn display_name_adds_city_when_missing() {
        let request: WebhookRequest = serde_json::from_str(SAMPLE_REQUEST).unwrap();
        assert_eq!(request.airport_display_name().as_deref(), Some("London"));

        let body = r#"{"queryResult": {"parameters": {"airport": {
            "ICAO": "CYYZ", "name": "Pearson International", "city": "Toronto"
        }}}}"#;
        let request: WebhookRequest = serde_json::from_str(body).unwrap();
        assert_eq!(
            request.airport_display_name().as_deref(),
            Some("Pearson International, Toronto")
        );
    }

    #[test]
    fn response_serializes_fulfillment_text() {
        let response = WebhookResponse::from(RenderedResponse::new("spoken", "shown"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "fulfillmentText": "spoken" }));
    }

    #[tokio::test]
    async fn end_to_end_flight_condition() {
        let handler = handler(StaticProvider::Record(fixture_record()));
        let response = handler.handle_json(SAMPLE_REQUEST).await;
        assert_eq!(
            response.fulfillment_text,
            "It's looking like low IFR right now at London."
        );
    }

    #[tokio::test]
    async fn answers_each_intent_from_the_record() {
        let handler = handler(StaticProvider::Record(fixture_record()));

        let wind = handler.answer("CYYZ", Some("Pearson"), Some("get_wind_information")).await;
        assert_eq!(wind.speech, "At Pearson, winds are currently 8 knots at 340 degrees.");

        let vis = handler.answer("CYYZ", Some("Pearson"), Some("get_visibility")).await;
        assert_eq!(vis.speech, "Visibility is looking around 1.5 statute miles (2.4 km).");

        let raw = handler.answer("CYYZ", Some("Pearson"), Some("get_metar_raw")).await;
        assert!(raw.speech.starts_with("CYYZ 022100Z"));
    }

    #[tokio::test]
    async fn airport_name_falls_back_to_icao() {
        let handler = handler(StaticProvider::Record(fixture_record()));
        let out = handler.answer("CYYZ", None, Some("get_flight_condition")).await;
        assert_eq!(out.speech, "It's looking like low IFR right now at CYYZ.");
    }

    #[tokio::test]
    async fn missing_icao_code_is_an_error() {
        let handler = handler(StaticProvider::Record(fixture_record()));
        let body = r#"{"queryResult": {"intent": {"displayName": "get_flight_condition"}}}"#;
        assert_eq!(handler.handle_json(body).await, error_response());
    }

    #[tokio::test]
    async fn unreadable_body_is_an_error() {
        let handler = handler(StaticProvider::Record(fixture_record()));
        assert_eq!(handler.handle_json("not json").await, error_response());
    }

    #[tokio::test]
    async fn fetch_failures_are_errors() {
        for provider in [StaticProvider::Unavailable, StaticProvider::Failing] {
            let handler = handler(provider);
            assert_eq!(handler.handle_json(SAMPLE_REQUEST).await, error_response());
        }
    }

    #[tokio::test]
    async fn empty_record_is_an_error() {
        let handler = handler(StaticProvider::Record(Default::default()));
        assert_eq!(handler.handle_json(SAMPLE_REQUEST).await, error_response());
    }

    #[tokio::test]
    async fn unknown_intent_is_an_error() {
        let handler = handler(StaticProvider::Record(fixture_record()));
        let out = handler.answer("CYYZ", Some("Pearson"), Some("get_lunch")).await;
        assert_eq!(out, RenderedResponse::standard_error());

        let out = handler.answer("CYYZ", Some("Pearson"), None).await;
        assert_eq!(out, RenderedResponse::standard_error());
    }
}
