// src/models/chart.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::report::{
    DashboardReport, DateParams, FinancialSummary, LotFinancialSeries, MetricKind, TrendSeries,
};

// Formato consumido pelo gráfico de barras do dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    #[schema(example = "Expenses")]
    pub label: String,
    pub data: Vec<Decimal>,
}

/// Rótulos dos datasets, por idioma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLabels {
    pub expenses: &'static str,
    pub proceeds: &'static str,
    pub other_expenses: &'static str,
    pub operational_expenses: &'static str,
    pub utility: &'static str,
}

impl ChartLabels {
    pub const EN: ChartLabels = ChartLabels {
        expenses: "Expenses",
        proceeds: "Proceeds",
        other_expenses: "Remaining expenses",
        operational_expenses: "Operational expenses",
        utility: "Utility",
    };

    pub const ES: ChartLabels = ChartLabels {
        expenses: "Gastos",
        proceeds: "Ganancias",
        other_expenses: "Gastos Restantes",
        operational_expenses: "Gastos Operacionales",
        utility: "Utilidad",
    };

    pub const PT: ChartLabels = ChartLabels {
        expenses: "Gastos",
        proceeds: "Receitas",
        other_expenses: "Demais gastos",
        operational_expenses: "Gastos operacionais",
        utility: "Lucro",
    };

    // Idioma desconhecido cai no inglês
    pub fn for_language(lang: &str) -> ChartLabels {
        match lang {
            "es" => Self::ES,
            "pt" => Self::PT,
            _ => Self::EN,
        }
    }
}

impl ChartData {
    /// Gráfico por lote: `[gastos, ganhos]`.
    pub fn from_lots(series: &LotFinancialSeries, labels: &ChartLabels) -> Self {
        Self {
            labels: series.lot_labels.clone(),
            datasets: vec![
                ChartDataset {
                    label: labels.expenses.to_string(),
                    data: series.expense_per_lot.clone(),
                },
                ChartDataset {
                    label: labels.proceeds.to_string(),
                    data: series.proceeds_per_lot.clone(),
                },
            ],
        }
    }

    /// Gráfico temporal: `[demais gastos, operacionais, ganhos, lucro]`.
    /// As sequências são copiadas na ordem recebida, sem reordenar.
    pub fn from_trend(series: &TrendSeries, labels: &ChartLabels) -> Self {
        let dataset = |label: &str, data: &[Decimal]| ChartDataset {
            label: label.to_string(),
            data: data.to_vec(),
        };

        Self {
            labels: series.period_labels.clone(),
            datasets: vec![
                dataset(labels.other_expenses, &series.other_expenses),
                dataset(labels.operational_expenses, &series.operational_expenses),
                dataset(labels.proceeds, &series.proceeds),
                dataset(labels.utility, &series.utility),
            ],
        }
    }
}

// Resposta do endpoint do dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub run_id: Uuid,
    pub window: DateParams,
    pub summary: FinancialSummary,
    pub lot_chart: Option<ChartData>,
    pub trend_chart: Option<ChartData>,
    pub unavailable: Vec<MetricKind>,
}

impl DashboardView {
    pub fn render(report: &DashboardReport, labels: &ChartLabels) -> Self {
        Self {
            run_id: report.run_id,
            window: report.window.query_params(),
            summary: report.summary.clone(),
            lot_chart: report
                .lot_series
                .as_ref()
                .map(|s| ChartData::from_lots(s, labels)),
            trend_chart: report
                .trend_series
                .as_ref()
                .map(|s| ChartData::from_trend(s, labels)),
            unavailable: report.unavailable.iter().map(|u| u.metric).collect(),
        }
    }
}
