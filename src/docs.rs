// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_report,
        handlers::dashboard::get_latest_report,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::chart::DashboardView,
            models::chart::ChartData,
            models::chart::ChartDataset,
            models::report::DateParams,
            models::report::FinancialSummary,
            models::report::MetricKind,
        )
    ),
    tags(
        (name = "Dashboard", description = "Relatórios financeiros consolidados por período")
    )
)]
pub struct ApiDoc;
