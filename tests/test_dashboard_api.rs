//! Testes ponta a ponta da API HTTP do dashboard, servida numa porta efêmera.

mod common;

use std::sync::Arc;

use common::ScriptedSource;
use lot_dashboard::{build_router, config::AppState, models::report::MetricKind};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::net::TcpListener;

async fn serve(source: ScriptedSource) -> String {
    let app = build_router(AppState::with_source(Arc::new(source)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn get(url: &str, lang: Option<&str>) -> (StatusCode, Value) {
    let mut request = reqwest::Client::new().get(url);
    if let Some(lang) = lang {
        request = request.header("Accept-Language", lang);
    }
    let response = request.send().await.unwrap();
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_answers_ok() {
    let base = serve(ScriptedSource::january()).await;
    let body = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn report_returns_summary_and_charts() {
    let base = serve(ScriptedSource::january()).await;

    let (status, body) = get(
        &format!("{base}/api/dashboard/report?initDate=01-01-2023&endDate=31-01-2023"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["window"]["initDate"], "01-01-2023");
    assert_eq!(body["window"]["endDate"], "31-01-2023");

    let summary = &body["summary"];
    assert_eq!(summary["sales"], 120);
    assert_eq!(summary["clients"], 40);
    assert_eq!(summary["totalExpenses"].as_f64(), Some(3250.0));
    assert_eq!(summary["utility"].as_f64(), Some(2750.0));

    assert_eq!(body["lotChart"]["labels"][1], "Lote 2");
    assert_eq!(body["lotChart"]["datasets"][0]["label"], "Expenses");
    assert_eq!(body["trendChart"]["datasets"].as_array().unwrap().len(), 4);
    assert_eq!(body["trendChart"]["datasets"][3]["label"], "Utility");
    assert_eq!(body["trendChart"]["datasets"][3]["data"][1].as_f64(), Some(620.0));
    assert_eq!(body["unavailable"], serde_json::json!([]));
}

#[tokio::test]
async fn failed_metric_is_absent_from_the_json() {
    let base = serve(ScriptedSource::january().failing(MetricKind::MarketingExpenses)).await;

    let (status, body) = get(
        &format!("{base}/api/dashboard/report?initDate=01-01-2023&endDate=31-01-2023"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_object().unwrap();
    assert!(!summary.contains_key("marketingExpenses"));
    assert!(!summary.contains_key("totalExpenses"));
    assert!(!summary.contains_key("utility"));
    assert_eq!(summary["operationalExpenses"].as_f64(), Some(2000.0));
    assert_eq!(body["unavailable"], serde_json::json!(["marketingExpenses"]));
}

#[tokio::test]
async fn chart_labels_follow_accept_language() {
    let base = serve(ScriptedSource::january()).await;

    let (_, body) = get(
        &format!("{base}/api/dashboard/report?initDate=01-01-2023&endDate=31-01-2023"),
        Some("es-AR,es;q=0.9"),
    )
    .await;

    assert_eq!(body["lotChart"]["datasets"][0]["label"], "Gastos");
    assert_eq!(body["lotChart"]["datasets"][1]["label"], "Ganancias");
    assert_eq!(body["trendChart"]["datasets"][1]["label"], "Gastos Operacionales");
}

// ---------------------------------------------------------------------------
// validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_date_is_rejected() {
    let base = serve(ScriptedSource::january()).await;

    let (status, body) = get(
        &format!("{base}/api/dashboard/report?initDate=2023-01-01&endDate=31-01-2023"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_object().unwrap();
    assert_eq!(details.len(), 1);
}

#[tokio::test]
async fn inverted_window_is_rejected() {
    let base = serve(ScriptedSource::january()).await;

    let (status, _) = get(
        &format!("{base}/api/dashboard/report?initDate=31-01-2023&endDate=01-01-2023"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// latest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn latest_report_is_404_before_first_pass() {
    let base = serve(ScriptedSource::january()).await;

    let (status, _) = get(&format!("{base}/api/dashboard/report/latest"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_report_rerenders_last_pass() {
    let base = serve(ScriptedSource::january()).await;

    let (_, first) = get(
        &format!("{base}/api/dashboard/report?initDate=01-01-2023&endDate=31-01-2023"),
        None,
    )
    .await;
    let (status, latest) = get(
        &format!("{base}/api/dashboard/report/latest"),
        Some("pt-BR"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["runId"], first["runId"]);
    assert_eq!(latest["summary"], first["summary"]);
    assert_eq!(latest["lotChart"]["datasets"][1]["label"], "Receitas");
}
