// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        date_format::parse_report_date,
        error::AppError,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{chart::DashboardView, report::DateWindow},
};

fn validate_report_date(value: &str) -> Result<(), ValidationError> {
    parse_report_date(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("date_format");
        err.message = Some("Use o formato DD-MM-YYYY".into());
        err
    })
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Início da janela (padrão: hoje)
    #[validate(custom(function = "validate_report_date"))]
    #[param(example = "01-01-2023")]
    pub init_date: Option<String>,

    /// Fim da janela (padrão: dia seguinte ao início)
    #[validate(custom(function = "validate_report_date"))]
    #[param(example = "31-01-2023")]
    pub end_date: Option<String>,
}

impl ReportQuery {
    pub fn into_window(self, today: NaiveDate) -> Result<DateWindow, AppError> {
        self.validate()?;

        let (start, end) = match (self.init_date, self.end_date) {
            (None, None) => return Ok(DateWindow::default_for(today)),
            (Some(init), Some(end)) => (parse_report_date(&init)?, parse_report_date(&end)?),
            (Some(init), None) => {
                let start = parse_report_date(&init)?;
                (start, start.checked_add_days(Days::new(1)).unwrap_or(start))
            }
            (None, Some(end)) => (today, parse_report_date(&end)?),
        };

        DateWindow::new(start, end)
    }
}

// GET /api/dashboard/report
#[utoipa::path(
    get,
    path = "/api/dashboard/report",
    tag = "Dashboard",
    params(ReportQuery),
    responses(
        (status = 200, description = "Resumo financeiro e gráficos da janela", body = DashboardView),
        (status = 400, description = "Data ou período inválido"),
        (status = 409, description = "Substituída por uma requisição mais recente. Há um único agregador por processo: duas abas com janelas diferentes se substituem, e a resposta 409 é esperada nesse caso")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let window = query.into_window(Utc::now().date_naive())?;

    let report = app_state.report_service.run_aggregation(window).await?;

    Ok((
        StatusCode::OK,
        Json(DashboardView::render(&report, &locale.chart_labels())),
    ))
}

// GET /api/dashboard/report/latest
#[utoipa::path(
    get,
    path = "/api/dashboard/report/latest",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Último relatório calculado", body = DashboardView),
        (status = 404, description = "Nenhum relatório calculado ainda")
    )
)]
pub async fn get_latest_report(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state
        .report_service
        .latest()
        .ok_or(AppError::NoReportYet)?;

    Ok((
        StatusCode::OK,
        Json(DashboardView::render(&report, &locale.chart_labels())),
    ))
}
