// src/services/report_service.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{
    future::{BoxFuture, FutureExt},
    stream::{FuturesUnordered, StreamExt},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    common::error::{AppError, MetricUnavailable, SourceError},
    db::ReportingDataSource,
    models::report::{
        DashboardReport, DateParams, DateWindow, LotFinancialSeries, MetricKind, MetricValue,
        TrendSeries,
    },
};

// Resultado de uma das dez consultas, com a métrica que ele preenche
enum Fetched {
    Scalar(MetricKind, Result<MetricValue, SourceError>),
    Lots(Result<LotFinancialSeries, SourceError>),
    Trend(Result<TrendSeries, SourceError>),
}

#[derive(Default)]
struct AggregationState {
    // Incrementada a cada submissão; resultados de gerações antigas são descartados
    generation: u64,
    in_progress: Option<DashboardReport>,
    latest: Option<DashboardReport>,
}

/// Agregador dos relatórios do dashboard.
///
/// Dispara as dez consultas de uma janela ao mesmo tempo e aplica cada
/// resultado assim que ele chega, sem depender da ordem de conclusão. Uma
/// métrica que falha fica ausente e é listada em `unavailable`; as demais
/// continuam. Se uma nova janela é submetida no meio do caminho, a agregação
/// anterior é abandonada e seus resultados não tocam no relatório novo.
pub struct ReportAggregator {
    source: Arc<dyn ReportingDataSource>,
    state: Mutex<AggregationState>,
}

impl ReportAggregator {
    pub fn new(source: Arc<dyn ReportingDataSource>) -> Self {
        Self {
            source,
            state: Mutex::new(AggregationState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AggregationState> {
        // Nenhuma escrita fica pela metade sob o lock, então um lock envenenado ainda é consistente
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Último relatório concluído (para re-renderizar sem consultar de novo).
    pub fn latest(&self) -> Option<DashboardReport> {
        self.lock_state().latest.clone()
    }

    pub async fn run_aggregation(&self, window: DateWindow) -> Result<DashboardReport, AppError> {
        let run_id = Uuid::new_v4();
        let params = window.query_params();

        let generation = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.in_progress = Some(DashboardReport::new(run_id, window));
            state.generation
        };

        let span = tracing::info_span!(
            "aggregation",
            %run_id,
            generation,
            init_date = %params.init_date,
            end_date = %params.end_date,
        );

        self.collect(generation, &params).instrument(span).await
    }

    async fn collect(&self, generation: u64, params: &DateParams) -> Result<DashboardReport, AppError> {
        tracing::info!("iniciando agregação");

        let mut pending = self.launch_queries(params);

        while let Some(fetched) = pending.next().await {
            if !self.apply(generation, fetched) {
                // Descartar `pending` cancela as consultas restantes
                tracing::info!(
                    remaining = pending.len(),
                    "agregação substituída por uma janela mais recente"
                );
                return Err(AppError::Superseded);
            }
        }

        let mut state = self.lock_state();
        if state.generation != generation {
            return Err(AppError::Superseded);
        }

        let report = state.in_progress.take().ok_or(AppError::Superseded)?;
        state.latest = Some(report.clone());

        tracing::info!(
            unavailable = report.unavailable.len(),
            utility = ?report.summary.utility,
            "agregação concluída"
        );

        Ok(report)
    }

    // As dez consultas são independentes: nenhuma usa o resultado de outra
    fn launch_queries<'a>(
        &'a self,
        params: &'a DateParams,
    ) -> FuturesUnordered<BoxFuture<'a, Fetched>> {
        let source: &dyn ReportingDataSource = &*self.source;
        let pending = FuturesUnordered::new();

        pending.push(
            async move {
                let value = source.sales_count(params).await.map(MetricValue::Count);
                Fetched::Scalar(MetricKind::SalesCount, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source.production_volume(params).await.map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::ProductionVolume, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source
                    .operational_expenses_total(params)
                    .await
                    .map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::OperationalExpenses, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source
                    .administrative_expenses_total(params)
                    .await
                    .map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::AdministrativeExpenses, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source
                    .marketing_expenses_total(params)
                    .await
                    .map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::MarketingExpenses, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source.other_expenses_total(params).await.map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::OtherExpenses, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source.proceeds_total(params).await.map(MetricValue::Amount);
                Fetched::Scalar(MetricKind::Proceeds, value)
            }
            .boxed(),
        );
        pending.push(
            async move {
                let value = source.client_count(params).await.map(MetricValue::Count);
                Fetched::Scalar(MetricKind::ClientCount, value)
            }
            .boxed(),
        );
        // Série por lote: sem janela
        pending.push(async move { Fetched::Lots(source.lot_expense_proceeds_series().await) }.boxed());
        pending.push(
            async move { Fetched::Trend(source.proceeds_vs_expenses_trend(params).await) }.boxed(),
        );

        pending
    }

    /// Aplica um resultado no relatório em andamento. Devolve `false` quando
    /// a geração já não é a atual (o resultado é descartado).
    fn apply(&self, generation: u64, fetched: Fetched) -> bool {
        let mut state = self.lock_state();
        if state.generation != generation {
            tracing::debug!(
                current = state.generation,
                "descartando resultado de uma geração antiga"
            );
            return false;
        }

        let Some(report) = state.in_progress.as_mut() else {
            return false;
        };

        match fetched {
            Fetched::Scalar(kind, Ok(value)) => {
                if !report.summary.record(kind, value) {
                    tracing::warn!(metric = %kind, ?value, "valor incompatível com a métrica");
                }
            }
            Fetched::Lots(Ok(series)) => report.lot_series = Some(series),
            Fetched::Trend(Ok(series)) => report.trend_series = Some(series),
            Fetched::Scalar(kind, Err(e)) => Self::mark_unavailable(report, kind, e),
            Fetched::Lots(Err(e)) => Self::mark_unavailable(report, MetricKind::LotSeries, e),
            Fetched::Trend(Err(e)) => Self::mark_unavailable(report, MetricKind::TrendSeries, e),
        }

        true
    }

    fn mark_unavailable(report: &mut DashboardReport, metric: MetricKind, cause: SourceError) {
        tracing::warn!(%metric, error = %cause, "métrica indisponível");
        report.unavailable.push(MetricUnavailable::new(metric, cause));
    }
}
