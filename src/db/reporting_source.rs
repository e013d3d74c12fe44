// src/db/reporting_source.rs

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::{
    common::error::SourceError,
    models::report::{DateParams, LotFinancialSeries, TrendSeries},
};

/// Contrato da fonte de relatórios.
///
/// Cada operação é independente e pode falhar sozinha. As operações com
/// janela recebem as datas já formatadas em `DD-MM-YYYY`; a série por lote
/// não recebe janela (relatório de todo o período).
#[async_trait]
pub trait ReportingDataSource: Send + Sync {
    async fn sales_count(&self, params: &DateParams) -> Result<i64, SourceError>;

    async fn production_volume(&self, params: &DateParams) -> Result<Decimal, SourceError>;

    async fn operational_expenses_total(&self, params: &DateParams)
    -> Result<Decimal, SourceError>;

    async fn administrative_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError>;

    /// Gastos de marketing/publicidade.
    async fn marketing_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError>;

    async fn other_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError>;

    async fn proceeds_total(&self, params: &DateParams) -> Result<Decimal, SourceError>;

    async fn client_count(&self, params: &DateParams) -> Result<i64, SourceError>;

    async fn lot_expense_proceeds_series(&self) -> Result<LotFinancialSeries, SourceError>;

    async fn proceeds_vs_expenses_trend(
        &self,
        params: &DateParams,
    ) -> Result<TrendSeries, SourceError>;
}
