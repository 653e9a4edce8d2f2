//! Core library for the FlyToday weather webhook.
//!
//! This crate defines:
//! - METAR record parsing and typed weather facts
//! - Response templates and rendering per intent
//! - The METAR provider abstraction and the ADDS data server client
//! - Configuration and the Dialogflow webhook handler
//!
//! It is used by `flytoday-cli`, but can also be embedded in other services.

pub mod codes;
pub mod config;
pub mod facts;
pub mod intent;
pub mod model;
pub mod provider;
pub mod record;
pub mod render;
pub mod templates;
pub mod units;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use intent::{Intent, dispatch};
pub use model::{RenderedResponse, STANDARD_ERROR_MESSAGE, WeatherFacts};
pub use provider::{MetarProvider, provider_from_config};
pub use record::{RawRecord, SkyConditionRecord};
pub use render::{RenderError, Renderer};
pub use templates::{BuiltinTemplateStore, ResponseTemplate, TemplateError, TemplateStore, TomlTemplateStore};
pub use webhook::{WebhookHandler, WebhookRequest, WebhookResponse};
