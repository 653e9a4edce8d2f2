//! Response phrase templates.
//!
//! Templates live in a two-level TOML table (`[Category.key]`) holding a
//! `speech` and a `text` phrase. Stores read their backing document on every
//! lookup, so edits to a template file apply to the next request.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::model::RenderedResponse;

/// Templates shipped with the crate.
pub const BUILTIN_TEMPLATES: &str = include_str!("../templates/responses.toml");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("No template category '{0}'")]
    CategoryNotFound(String),

    #[error("No template '{key}' in category '{category}'")]
    KeyNotFound { category: String, key: String },

    #[error("Failed to read template file: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template store is not valid")]
    InvalidStore(#[from] toml::de::Error),

    #[error("Unbalanced brace at byte {0} of template")]
    Malformed(usize),

    #[error("No value for placeholder '{0}'")]
    MissingPlaceholder(String),
}

impl TemplateError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CategoryNotFound(_) | Self::KeyNotFound { .. })
    }
}

/// A speech/text phrase pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseTemplate {
    pub speech: String,
    pub text: String,
}

impl ResponseTemplate {
    pub fn new(speech: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            text: text.into(),
        }
    }

    pub fn render(&self, context: &Context) -> Result<RenderedResponse, TemplateError> {
        Ok(RenderedResponse {
            speech: substitute(&self.speech, context)?,
            text: substitute(&self.text, context)?,
        })
    }
}

pub trait TemplateStore: Send + Sync + Debug {
    fn lookup(&self, category: &str, key: &str) -> Result<ResponseTemplate, TemplateError>;
}

type TemplateTable = HashMap<String, HashMap<String, ResponseTemplate>>;

fn lookup_in(document: &str, category: &str, key: &str) -> Result<ResponseTemplate, TemplateError> {
    let mut table: TemplateTable = toml::from_str(document)?;
    let mut entries = table
        .remove(category)
        .ok_or_else(|| TemplateError::CategoryNotFound(category.to_owned()))?;
    entries.remove(key).ok_or_else(|| TemplateError::KeyNotFound {
        category: category.to_owned(),
        key: key.to_owned(),
    })
}

/// Store backed by [`BUILTIN_TEMPLATES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateStore;

impl TemplateStore for BuiltinTemplateStore {
    fn lookup(&self, category: &str, key: &str) -> Result<ResponseTemplate, TemplateError> {
        lookup_in(BUILTIN_TEMPLATES, category, key)
    }
}

/// Store backed by a TOML file on disk.
#[derive(Debug, Clone)]
pub struct TomlTemplateStore {
    path: PathBuf,
}

impl TomlTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateStore for TomlTemplateStore {
    fn lookup(&self, category: &str, key: &str) -> Result<ResponseTemplate, TemplateError> {
        let document = fs::read_to_string(&self.path).map_err(|source| TemplateError::Unreadable {
            path: self.path.clone(),
            source,
        })?;
        lookup_in(&document, category, key)
    }
}

/// Named values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: Vec<(&'static str, String)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Replace every `{name}` in `template` with its value from `context`.
pub fn substitute(template: &str, context: &Context) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => out.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => out.push('}'),
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => return Err(TemplateError::Malformed(pos)),
                        Some((_, ch)) => name.push(ch),
                    }
                }
                let name = name.trim();
                let value = context
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingPlaceholder(name.to_owned()))?;
                out.push_str(value);
            }
            '}' => return Err(TemplateError::Malformed(pos)),
            _ => out.push(c),
        }
    }

    Ok(out)
}
