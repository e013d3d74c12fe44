// src/db/http_source.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    common::error::SourceError,
    db::reporting_source::ReportingDataSource,
    models::report::{DateParams, LotFinancialSeries, TrendSeries},
};

// Rotas da API de relatórios upstream.
// "expeses-proceeds" é a grafia real do endpoint, não corrigir.
const SALES_COUNT_PATH: &str = "/sales/report";
const PRODUCTION_PATH: &str = "/lots/report/production";
const OPERATIONAL_EXPENSES_PATH: &str = "/expenses-per-lots/report/operational";
const ADMIN_EXPENSES_PATH: &str = "/expenses/report/admin";
const ADVERTISING_EXPENSES_PATH: &str = "/expenses/report/advertising";
const OTHER_EXPENSES_PATH: &str = "/expenses/report/other";
const PROCEEDS_PATH: &str = "/sales/report/proceeds";
const CLIENTS_PATH: &str = "/clients/report";
const LOT_SERIES_PATH: &str = "/lots/report/expeses-proceeds";
const TREND_PATH: &str = "/sales/report/abstract/proceeds/expenses";

// --- Corpos de resposta do upstream ---
// Campos ausentes ou nulos viram erro, nunca zero.

#[derive(Deserialize)]
struct CountResponse {
    total: Option<i64>,
}

#[derive(Deserialize)]
struct ProductionResponse {
    total: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationalExpensesResponse {
    total_expenses: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseResponse {
    total_expense: Option<Decimal>,
}

#[derive(Deserialize)]
struct ProceedsResponse {
    proceeds: Option<Decimal>,
}

#[derive(Deserialize)]
struct ClientsResponse {
    clients: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LotSeriesResponse {
    lot_name: Vec<String>,
    expense: Vec<Decimal>,
    proceeds: Vec<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrendResponse {
    months: Vec<String>,
    other_expenses_values: Vec<Decimal>,
    expenses_operational_values: Vec<Decimal>,
    proceeds_values: Vec<Decimal>,
    utilities: Vec<Decimal>,
}

fn required<T>(value: Option<T>, path: &str, field: &str) -> Result<T, SourceError> {
    value.ok_or_else(|| SourceError::Malformed(format!("{path}: campo `{field}` ausente")))
}

/// Fonte de relatórios que consulta a API REST upstream.
#[derive(Clone)]
pub struct HttpReportingSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReportingSource {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                SourceError::Malformed("token da API contém caracteres inválidos".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&DateParams>,
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url);
        if let Some(params) = params {
            request = request.query(&[
                ("initDate", params.init_date.as_str()),
                ("endDate", params.end_date.as_str()),
            ]);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), body = %text, "upstream retornou erro");
            return Err(SourceError::Status(status.as_u16()));
        }

        serde_json::from_str::<T>(&text).map_err(|e| SourceError::Malformed(format!("{path}: {e}")))
    }
}

#[async_trait]
impl ReportingDataSource for HttpReportingSource {
    async fn sales_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        let body: CountResponse = self.get_json(SALES_COUNT_PATH, Some(params)).await?;
        required(body.total, SALES_COUNT_PATH, "total")
    }

    async fn production_volume(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let body: ProductionResponse = self.get_json(PRODUCTION_PATH, Some(params)).await?;
        required(body.total, PRODUCTION_PATH, "total")
    }

    async fn operational_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        let body: OperationalExpensesResponse =
            self.get_json(OPERATIONAL_EXPENSES_PATH, Some(params)).await?;
        required(body.total_expenses, OPERATIONAL_EXPENSES_PATH, "totalExpenses")
    }

    async fn administrative_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        let body: ExpenseResponse = self.get_json(ADMIN_EXPENSES_PATH, Some(params)).await?;
        required(body.total_expense, ADMIN_EXPENSES_PATH, "totalExpense")
    }

    async fn marketing_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let body: ExpenseResponse = self.get_json(ADVERTISING_EXPENSES_PATH, Some(params)).await?;
        required(body.total_expense, ADVERTISING_EXPENSES_PATH, "totalExpense")
    }

    async fn other_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let body: ExpenseResponse = self.get_json(OTHER_EXPENSES_PATH, Some(params)).await?;
        required(body.total_expense, OTHER_EXPENSES_PATH, "totalExpense")
    }

    async fn proceeds_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let body: ProceedsResponse = self.get_json(PROCEEDS_PATH, Some(params)).await?;
        required(body.proceeds, PROCEEDS_PATH, "proceeds")
    }

    async fn client_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        let body: ClientsResponse = self.get_json(CLIENTS_PATH, Some(params)).await?;
        required(body.clients, CLIENTS_PATH, "clients")
    }

    async fn lot_expense_proceeds_series(&self) -> Result<LotFinancialSeries, SourceError> {
        let body: LotSeriesResponse = self.get_json(LOT_SERIES_PATH, None).await?;
        Ok(LotFinancialSeries {
            lot_labels: body.lot_name,
            expense_per_lot: body.expense,
            proceeds_per_lot: body.proceeds,
        })
    }

    async fn proceeds_vs_expenses_trend(
        &self,
        params: &DateParams,
    ) -> Result<TrendSeries, SourceError> {
        let body: TrendResponse = self.get_json(TREND_PATH, Some(params)).await?;
        Ok(TrendSeries {
            period_labels: body.months,
            other_expenses: body.other_expenses_values,
            operational_expenses: body.expenses_operational_values,
            proceeds: body.proceeds_values,
            utility: body.utilities,
        })
    }
}
