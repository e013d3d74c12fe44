// src/models/report.rs

use std::fmt;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{
    date_format::format_report_date,
    error::{AppError, MetricUnavailable},
};

// =============================================================================
//  JANELA DE DATAS
// =============================================================================

/// Intervalo inclusivo de datas de uma agregação. `start <= end` sempre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::InvalidWindow {
                start: format_report_date(start),
                end: format_report_date(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Janela inicial do dashboard: hoje até amanhã.
    pub fn default_for(today: NaiveDate) -> Self {
        let end = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Self { start: today, end }
    }

    /// Datas serializadas no formato que a fonte de relatórios aceita.
    pub fn query_params(&self) -> DateParams {
        DateParams {
            init_date: format_report_date(self.start),
            end_date: format_report_date(self.end),
        }
    }
}

/// Par `initDate`/`endDate` já formatado em `DD-MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateParams {
    #[schema(example = "01-01-2023")]
    pub init_date: String,
    #[schema(example = "31-01-2023")]
    pub end_date: String,
}

// =============================================================================
//  MÉTRICAS
// =============================================================================

/// As dez consultas de uma agregação. As oito primeiras são escalares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    SalesCount,
    ProductionVolume,
    OperationalExpenses,
    AdministrativeExpenses,
    MarketingExpenses,
    OtherExpenses,
    Proceeds,
    ClientCount,
    LotSeries,
    TrendSeries,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::SalesCount => "salesCount",
            MetricKind::ProductionVolume => "productionVolume",
            MetricKind::OperationalExpenses => "operationalExpenses",
            MetricKind::AdministrativeExpenses => "administrativeExpenses",
            MetricKind::MarketingExpenses => "marketingExpenses",
            MetricKind::OtherExpenses => "otherExpenses",
            MetricKind::Proceeds => "proceeds",
            MetricKind::ClientCount => "clientCount",
            MetricKind::LotSeries => "lotSeries",
            MetricKind::TrendSeries => "trendSeries",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resultado escalar de uma consulta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Count(i64),
    Amount(Decimal),
}

// =============================================================================
//  RESUMO FINANCEIRO
// =============================================================================

/// Resumo consolidado de uma janela.
///
/// Cada campo começa ausente (`None`) e só é preenchido quando a consulta
/// correspondente resolve. Ausente é diferente de zero: uma métrica que falhou
/// nunca aparece como `0`, e por isso é omitida do JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 120)]
    pub sales: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 500.0)]
    pub production: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2000.0)]
    pub operational_expenses: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 800.0)]
    pub administrative_expenses: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 300.0)]
    pub marketing_expenses: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 150.0)]
    pub other_expenses: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 3250.0)]
    pub total_expenses: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 6000.0)]
    pub proceeds: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 40)]
    pub clients: Option<i64>,

    // Negativa = prejuízo
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 2750.0)]
    pub utility: Option<Decimal>,
}

impl FinancialSummary {
    /// Grava o valor de uma métrica no campo que ela possui e recalcula os
    /// derivados. Devolve `false` se o par métrica/valor não faz sentido.
    pub fn record(&mut self, kind: MetricKind, value: MetricValue) -> bool {
        match (kind, value) {
            (MetricKind::SalesCount, MetricValue::Count(n)) => self.sales = Some(n),
            (MetricKind::ClientCount, MetricValue::Count(n)) => self.clients = Some(n),
            (MetricKind::ProductionVolume, MetricValue::Amount(v)) => self.production = Some(v),
            (MetricKind::OperationalExpenses, MetricValue::Amount(v)) => {
                self.operational_expenses = Some(v)
            }
            (MetricKind::AdministrativeExpenses, MetricValue::Amount(v)) => {
                self.administrative_expenses = Some(v)
            }
            (MetricKind::MarketingExpenses, MetricValue::Amount(v)) => {
                self.marketing_expenses = Some(v)
            }
            (MetricKind::OtherExpenses, MetricValue::Amount(v)) => self.other_expenses = Some(v),
            (MetricKind::Proceeds, MetricValue::Amount(v)) => self.proceeds = Some(v),
            _ => return false,
        }
        self.derive_totals();
        true
    }

    /// `totalExpenses` e `utility` só existem quando as cinco entradas existem.
    /// Se a conta estoura o `Decimal`, os dois ficam ausentes.
    fn derive_totals(&mut self) {
        self.total_expenses = None;
        self.utility = None;

        let (Some(op), Some(admin), Some(marketing), Some(other), Some(proceeds)) = (
            self.operational_expenses,
            self.administrative_expenses,
            self.marketing_expenses,
            self.other_expenses,
            self.proceeds,
        ) else {
            return;
        };

        let Some(total) = op
            .checked_add(admin)
            .and_then(|t| t.checked_add(marketing))
            .and_then(|t| t.checked_add(other))
        else {
            tracing::warn!("estouro ao somar os gastos; totais omitidos");
            return;
        };

        let Some(utility) = proceeds.checked_sub(total) else {
            tracing::warn!(%total, %proceeds, "estouro ao calcular a utilidade; totais omitidos");
            return;
        };

        self.total_expenses = Some(total);
        self.utility = Some(utility);
    }
}

// =============================================================================
//  SÉRIES
// =============================================================================

/// Gastos e ganhos por lote, alinhados por índice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotFinancialSeries {
    pub lot_labels: Vec<String>,
    pub expense_per_lot: Vec<Decimal>,
    pub proceeds_per_lot: Vec<Decimal>,
}

/// Série temporal ganhos vs. gastos. As quatro sequências numéricas estão
/// alinhadas a `period_labels`; a ordem da fonte é preservada.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    pub period_labels: Vec<String>,
    pub other_expenses: Vec<Decimal>,
    pub operational_expenses: Vec<Decimal>,
    pub proceeds: Vec<Decimal>,
    pub utility: Vec<Decimal>,
}

/// Um período da série temporal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint<'a> {
    pub period: &'a str,
    pub other_expenses: Decimal,
    pub operational_expenses: Decimal,
    pub proceeds: Decimal,
    pub utility: Decimal,
}

impl TrendSeries {
    pub fn point(&self, index: usize) -> Option<TrendPoint<'_>> {
        Some(TrendPoint {
            period: self.period_labels.get(index)?,
            other_expenses: *self.other_expenses.get(index)?,
            operational_expenses: *self.operational_expenses.get(index)?,
            proceeds: *self.proceeds.get(index)?,
            utility: *self.utility.get(index)?,
        })
    }
}

// =============================================================================
//  RESULTADO DE UMA AGREGAÇÃO
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub run_id: Uuid,
    pub window: DateWindow,
    pub summary: FinancialSummary,
    pub lot_series: Option<LotFinancialSeries>,
    pub trend_series: Option<TrendSeries>,
    pub unavailable: Vec<MetricUnavailable>,
}

impl DashboardReport {
    pub fn new(run_id: Uuid, window: DateWindow) -> Self {
        Self {
            run_id,
            window,
            summary: FinancialSummary::default(),
            lot_series: None,
            trend_series: None,
            unavailable: Vec::new(),
        }
    }

    pub fn is_unavailable(&self, metric: MetricKind) -> bool {
        self.unavailable.iter().any(|u| u.metric == metric)
    }
}
