//! Phrases answering each kind of weather question.

use thiserror::Error;

use crate::{
    codes::{flight_category_label, spell_phonetic},
    model::{RenderedResponse, SkyCondition, WeatherFacts},
    templates::{Context, TemplateError, TemplateStore, substitute},
    units::format_measure,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("METAR record has no {0}")]
    MissingFact(&'static str),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl RenderError {
    /// The store has no template under the requested category and key.
    pub fn is_missing_template(&self) -> bool {
        matches!(self, Self::Template(err) if err.is_not_found())
    }
}

/// Renders responses for one airport against a template store.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    store: &'a dyn TemplateStore,
    airport: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a dyn TemplateStore, airport: &'a str) -> Self {
        Self { store, airport }
    }

    fn context(&self) -> Context {
        Context::new().with("airport", self.airport)
    }

    fn fill(&self, category: &str, key: &str, context: &Context) -> Result<RenderedResponse, RenderError> {
        Ok(self.store.lookup(category, key)?.render(context)?)
    }

    /// Falls back to a generic phrase when the category has no usable template.
    pub fn flight_category(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let category = facts
            .flight_category
            .as_deref()
            .ok_or(RenderError::MissingFact("flight category"))?;
        let context = self.context().with("category", category);

        match self.fill("FlightConditions", category, &context) {
            Ok(rendered) => Ok(rendered),
            Err(err) => {
                if err.is_missing_template() {
                    tracing::debug!("No flight conditions template for {category}: {err}");
                } else {
                    tracing::warn!("Unusable flight conditions template for {category}: {err}");
                }
                Ok(RenderedResponse::both(format!(
                    "It's currently {category} at {}.",
                    self.airport
                )))
            }
        }
    }

    pub fn wind(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let wind = facts.wind.as_ref().ok_or(RenderError::MissingFact("wind"))?;
        let context = self
            .context()
            .with("wind_speed", wind.speed_kt.as_str())
            .with("wind_dir", wind.direction_deg.as_str());
        self.fill("Wind", "default", &context)
    }

    pub fn visibility(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let visibility = facts.visibility.ok_or(RenderError::MissingFact("visibility"))?;
        let context = self
            .context()
            .with("visibility", format_measure(visibility.statute_mi))
            .with("visibility_km", format_measure(visibility.km));
        self.fill("Visibility", "default", &context)
    }

    pub fn altimeter(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let altimeter = facts
            .altimeter
            .as_deref()
            .ok_or(RenderError::MissingFact("altimeter"))?;
        let context = self.context().with("altimeter", altimeter);
        self.fill("Altimeter", "default", &context)
    }

    /// Temperature, followed by the dew point when the record has one.
    pub fn temperature(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let temp = facts.temperature.ok_or(RenderError::MissingFact("temperature"))?;
        let mut context = self
            .context()
            .with("temp_c", format_measure(temp.celsius))
            .with("temp_f", format_measure(temp.fahrenheit));
        let mut rendered = self.fill("Temperature", "current", &context)?;

        if let Some(dew) = facts.dewpoint {
            context.insert("dew_c", format_measure(dew.celsius));
            context.insert("dew_f", format_measure(dew.fahrenheit));
            let dewpoint = self.fill("Temperature", "dewpoint", &context)?;
            rendered.speech.push_str(&dewpoint.speech);
            rendered.text.push_str(&dewpoint.text);
        }

        Ok(rendered)
    }

    pub fn elevation(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let elevation = facts.elevation.ok_or(RenderError::MissingFact("elevation"))?;
        let context = self
            .context()
            .with("elevation_m", format_measure(elevation.meters))
            .with("elevation_ft", format_measure(elevation.feet));
        self.fill("Elevation", "default", &context)
    }

    pub fn metar_raw(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let raw = facts.raw_text.as_deref().ok_or(RenderError::MissingFact("raw report"))?;
        Ok(RenderedResponse::both(raw))
    }

    /// The whole report read out clause by clause.
    ///
    /// Facts missing from the record are skipped. Codes and numbers in the
    /// speech channel are spelled with the phonetic alphabet.
    pub fn metar_parsed(&self, facts: &WeatherFacts) -> Result<RenderedResponse, RenderError> {
        let mut clauses: Vec<RenderedResponse> = Vec::new();

        if let Some(station) = &facts.station_id {
            clauses.push(self.spoken_clause("station", &[("station", station.as_str())], &[])?);
        }
        if let Some(time) = &facts.observation_time {
            clauses.push(self.spoken_clause(
                "time",
                &[("zulu", time.zulu.as_str())],
                &[("relative", time.relative.as_str())],
            )?);
        }
        if let Some(wind) = &facts.wind {
            clauses.push(self.spoken_clause(
                "wind",
                &[
                    ("wind_dir", wind.direction_deg.as_str()),
                    ("wind_speed", wind.speed_kt.as_str()),
                ],
                &[],
            )?);
        }
        if let Some(category) = &facts.flight_category {
            let label = flight_category_label(category);
            clauses.push(self.spoken_clause("category", &[], &[("category", label)])?);
        }
        if let Some(visibility) = facts.visibility {
            let miles = format_measure(visibility.statute_mi);
            clauses.push(self.spoken_clause("visibility", &[], &[("visibility", miles.as_str())])?);
        }
        if let Some(altimeter) = &facts.altimeter {
            clauses.push(self.spoken_clause("altimeter", &[("altimeter", altimeter.as_str())], &[])?);
        }
        if let Some(temp) = facts.temperature {
            let celsius = format_measure(temp.celsius);
            clauses.push(self.spoken_clause("temperature", &[], &[("temp_c", celsius.as_str())])?);
        }
        if let Some(dew) = facts.dewpoint {
            let celsius = format_measure(dew.celsius);
            clauses.push(self.spoken_clause("dewpoint", &[], &[("dew_c", celsius.as_str())])?);
        }
        if let Some(sky) = &facts.sky_conditions {
            for condition in sky {
                clauses.push(self.sky_clause(condition)?);
            }
        }

        if clauses.is_empty() {
            return Err(RenderError::MissingFact("report"));
        }

        let (speech, text): (Vec<String>, Vec<String>) =
            clauses.into_iter().map(|c| (c.speech, c.text)).unzip();
        Ok(RenderedResponse::new(speech.join(" "), text.join(" ")))
    }

    // `spelled` values are read phonetically on the speech channel only.
    fn spoken_clause(
        &self,
        key: &str,
        spelled: &[(&'static str, &str)],
        plain: &[(&'static str, &str)],
    ) -> Result<RenderedResponse, RenderError> {
        let template = self.store.lookup("Report", key)?;

        let mut speech = self.context();
        let mut text = self.context();
        for &(name, value) in spelled {
            speech.insert(name, spell_phonetic(value));
            text.insert(name, value);
        }
        for &(name, value) in plain {
            speech.insert(name, value);
            text.insert(name, value);
        }

        Ok(RenderedResponse {
            speech: substitute(&template.speech, &speech)?,
            text: substitute(&template.text, &text)?,
        })
    }

    fn sky_clause(&self, condition: &SkyCondition) -> Result<RenderedResponse, RenderError> {
        match condition.cloud_base_ft_agl.as_deref() {
            Some(altitude) => self.spoken_clause(
                "sky",
                &[],
                &[("condition", condition.label.as_str()), ("altitude", altitude)],
            ),
            None => self.spoken_clause("sky_clear", &[], &[("condition", condition.label.as_str())]),
        }
    }
}
