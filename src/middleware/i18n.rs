// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::models::chart::ChartLabels;

// Idiomas com rótulos de gráfico traduzidos
const SUPPORTED_LANGUAGES: [&str; 3] = ["en", "es", "pt"];
const DEFAULT_LANGUAGE: &str = "en";

// Extrator de idioma (Accept-Language)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    /// Escolhe o primeiro idioma suportado do cabeçalho, na ordem de preferência.
    pub fn from_header(accept_language: Option<&str>) -> Self {
        let lang = accept_language
            .map(accept_language::parse)
            .unwrap_or_default()
            .into_iter()
            // "es-AR" -> "es"
            .map(|tag| tag.split('-').next().unwrap_or(&tag).to_lowercase())
            .find(|primary| SUPPORTED_LANGUAGES.contains(&primary.as_str()))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Locale(lang)
    }

    pub fn chart_labels(&self) -> ChartLabels {
        ChartLabels::for_language(&self.0)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        Ok(Locale::from_header(header_value))
    }
}
