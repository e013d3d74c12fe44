// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::report::MetricKind;

// Falha isolada de UMA métrica. Nunca aborta a agregação inteira.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Métrica indisponível: {metric} ({cause})")]
pub struct MetricUnavailable {
    pub metric: MetricKind,
    pub cause: String,
}

impl MetricUnavailable {
    pub fn new(metric: MetricKind, cause: impl ToString) -> Self {
        Self {
            metric,
            cause: cause.to_string(),
        }
    }
}

// Erros dentro de uma fonte de relatórios (HTTP upstream ou Postgres).
// O agregador converte qualquer um deles em `MetricUnavailable`.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Erro HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("A API de relatórios respondeu com status {0}")]
    Status(u16),

    #[error("Resposta malformada: {0}")]
    Malformed(String),

    #[error("Erro de banco de dados: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data inválida: '{0}' (formato esperado DD-MM-YYYY)")]
    InvalidDate(String),

    #[error("Período inválido: {start} é posterior a {end}")]
    InvalidWindow { start: String, end: String },

    // Uma nova janela foi submetida antes desta agregação terminar
    #[error("Agregação substituída por uma requisição mais recente")]
    Superseded,

    #[error("Nenhum relatório foi calculado ainda")]
    NoReportYet,

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,
            AppError::Superseded => StatusCode::CONFLICT,
            AppError::NoReportYet => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InternalServerError(ref e) => {
                tracing::error!("Erro Interno do Servidor: {:#}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
