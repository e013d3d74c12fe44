//! Fixtures compartilhadas pelos testes de integração do dashboard.
//!
//! `ScriptedSource` é uma `ReportingDataSource` em memória: valores, falhas e
//! portões por janela são configurados antes da agregação.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lot_dashboard::{
    common::error::SourceError,
    db::ReportingDataSource,
    models::report::{DateParams, LotFinancialSeries, MetricKind, TrendSeries},
};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use rust_decimal_macros::dec;
use tokio::sync::Semaphore;

#[derive(Default)]
pub struct ScriptedSource {
    // Valores por janela (chave = initDate); `None` = mesmo valor para qualquer janela
    values: HashMap<(Option<String>, MetricKind), Decimal>,
    failing: HashSet<MetricKind>,
    lots: Option<LotFinancialSeries>,
    trend: Option<TrendSeries>,
    gates: HashMap<String, Arc<Semaphore>>,
    calls: Mutex<Vec<(MetricKind, Option<DateParams>)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Janela de janeiro: vendas=120, produção=500, operacionais=2000,
    /// administrativos=800, marketing=300, demais=150, receitas=6000, clientes=40.
    pub fn january() -> Self {
        Self::new()
            .with(MetricKind::SalesCount, dec!(120))
            .with(MetricKind::ProductionVolume, dec!(500))
            .with(MetricKind::OperationalExpenses, dec!(2000))
            .with(MetricKind::AdministrativeExpenses, dec!(800))
            .with(MetricKind::MarketingExpenses, dec!(300))
            .with(MetricKind::OtherExpenses, dec!(150))
            .with(MetricKind::Proceeds, dec!(6000))
            .with(MetricKind::ClientCount, dec!(40))
            .with_lots(sample_lots())
            .with_trend(sample_trend())
    }

    pub fn with(mut self, metric: MetricKind, value: Decimal) -> Self {
        self.values.insert((None, metric), value);
        self
    }

    pub fn with_for_window(mut self, init_date: &str, metric: MetricKind, value: Decimal) -> Self {
        self.values.insert((Some(init_date.to_string()), metric), value);
        self
    }

    pub fn failing(mut self, metric: MetricKind) -> Self {
        self.failing.insert(metric);
        self
    }

    pub fn with_lots(mut self, lots: LotFinancialSeries) -> Self {
        self.lots = Some(lots);
        self
    }

    pub fn with_trend(mut self, trend: TrendSeries) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Toda consulta com janela começando em `init_date` fica bloqueada até o
    /// semáforo devolvido receber permissões.
    pub fn gated(mut self, init_date: &str) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gates.insert(init_date.to_string(), gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<(MetricKind, Option<DateParams>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, init_date: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, p)| p.as_ref().is_some_and(|p| p.init_date == init_date))
            .count()
    }

    async fn enter(&self, metric: MetricKind, params: Option<&DateParams>) -> Result<(), SourceError> {
        self.calls.lock().unwrap().push((metric, params.cloned()));

        if let Some(gate) = params.and_then(|p| self.gates.get(&p.init_date)) {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        if self.failing.contains(&metric) {
            return Err(SourceError::Status(503));
        }
        Ok(())
    }

    fn amount(&self, metric: MetricKind, params: &DateParams) -> Result<Decimal, SourceError> {
        self.values
            .get(&(Some(params.init_date.clone()), metric))
            .or_else(|| self.values.get(&(None, metric)))
            .copied()
            .ok_or_else(|| SourceError::Malformed(format!("{metric} not scripted")))
    }

    fn count(&self, metric: MetricKind, params: &DateParams) -> Result<i64, SourceError> {
        self.amount(metric, params)?
            .to_i64()
            .ok_or_else(|| SourceError::Malformed(format!("{metric} is not an integer")))
    }
}

#[async_trait]
impl ReportingDataSource for ScriptedSource {
    async fn sales_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        self.enter(MetricKind::SalesCount, Some(params)).await?;
        self.count(MetricKind::SalesCount, params)
    }

    async fn production_volume(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::ProductionVolume, Some(params)).await?;
        self.amount(MetricKind::ProductionVolume, params)
    }

    async fn operational_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::OperationalExpenses, Some(params)).await?;
        self.amount(MetricKind::OperationalExpenses, params)
    }

    async fn administrative_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::AdministrativeExpenses, Some(params)).await?;
        self.amount(MetricKind::AdministrativeExpenses, params)
    }

    async fn marketing_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::MarketingExpenses, Some(params)).await?;
        self.amount(MetricKind::MarketingExpenses, params)
    }

    async fn other_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::OtherExpenses, Some(params)).await?;
        self.amount(MetricKind::OtherExpenses, params)
    }

    async fn proceeds_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.enter(MetricKind::Proceeds, Some(params)).await?;
        self.amount(MetricKind::Proceeds, params)
    }

    async fn client_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        self.enter(MetricKind::ClientCount, Some(params)).await?;
        self.count(MetricKind::ClientCount, params)
    }

    async fn lot_expense_proceeds_series(&self) -> Result<LotFinancialSeries, SourceError> {
        self.enter(MetricKind::LotSeries, None).await?;
        self.lots
            .clone()
            .ok_or_else(|| SourceError::Malformed("lot series not scripted".into()))
    }

    async fn proceeds_vs_expenses_trend(
        &self,
        params: &DateParams,
    ) -> Result<TrendSeries, SourceError> {
        self.enter(MetricKind::TrendSeries, Some(params)).await?;
        self.trend
            .clone()
            .ok_or_else(|| SourceError::Malformed("trend not scripted".into()))
    }
}

pub fn sample_lots() -> LotFinancialSeries {
    LotFinancialSeries {
        lot_labels: vec!["Lote 1".into(), "Lote 2".into()],
        expense_per_lot: vec![dec!(1200), dec!(800)],
        proceeds_per_lot: vec![dec!(4000), dec!(2000)],
    }
}

/// Série temporal de dois meses com utilidade já calculada.
pub fn sample_trend() -> TrendSeries {
    TrendSeries {
        period_labels: vec!["Jan".into(), "Feb".into()],
        other_expenses: vec![dec!(100), dec!(120)],
        operational_expenses: vec![dec!(200), dec!(210)],
        proceeds: vec![dec!(900), dec!(950)],
        utility: vec![dec!(600), dec!(620)],
    }
}
