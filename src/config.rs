// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::{bail, Context};
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{HttpReportingSource, PgReportingSource, ReportingDataSource},
    services::ReportAggregator,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSourceKind {
    Http,
    Postgres,
}

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub source: ReportSourceKind,
    pub reports_api_url: Option<String>,
    pub reports_api_token: Option<String>,
    pub reports_api_timeout: Duration,
    pub database_url: Option<String>,
    pub run_migrations: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Variáveis vazias contam como ausentes
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match var("REPORT_SOURCE").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("http") => ReportSourceKind::Http,
            Some("postgres") => ReportSourceKind::Postgres,
            Some(other) => bail!("REPORT_SOURCE inválido: '{other}' (use 'http' ou 'postgres')"),
        };

        let reports_api_url = var("REPORTS_API_URL");
        let database_url = var("DATABASE_URL");

        match source {
            ReportSourceKind::Http if reports_api_url.is_none() => {
                bail!("REPORTS_API_URL deve ser definida quando REPORT_SOURCE=http")
            }
            ReportSourceKind::Postgres if database_url.is_none() => {
                bail!("DATABASE_URL deve ser definida quando REPORT_SOURCE=postgres")
            }
            _ => {}
        }

        let timeout_secs = match var("REPORTS_API_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("REPORTS_API_TIMEOUT_SECS inválido: '{raw}'"))?,
            None => DEFAULT_API_TIMEOUT_SECS,
        };

        let run_migrations = match var("RUN_MIGRATIONS") {
            Some(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("RUN_MIGRATIONS inválido: '{raw}'"))?,
            None => true,
        };

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            source,
            reports_api_url,
            reports_api_token: var("REPORTS_API_TOKEN"),
            reports_api_timeout: Duration::from_secs(timeout_secs),
            database_url,
            run_migrations,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportAggregator>,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let source: Arc<dyn ReportingDataSource> = match settings.source {
            ReportSourceKind::Http => {
                let base_url = settings
                    .reports_api_url
                    .as_deref()
                    .context("REPORTS_API_URL ausente")?;

                let source = HttpReportingSource::new(
                    base_url,
                    settings.reports_api_token.as_deref(),
                    settings.reports_api_timeout,
                )
                .context("Falha ao criar o cliente HTTP de relatórios")?;

                tracing::info!("✅ Fonte de relatórios: API upstream em {}", base_url);
                Arc::new(source)
            }
            ReportSourceKind::Postgres => {
                let database_url = settings
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL ausente")?;

                let db_pool = PgPoolOptions::new()
                    .max_connections(10)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await?;

                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                if settings.run_migrations {
                    sqlx::migrate!()
                        .run(&db_pool)
                        .await
                        .context("Falha ao rodar as migrações do banco de dados")?;
                    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
                }

                Arc::new(PgReportingSource::new(db_pool))
            }
        };

        Ok(Self::with_source(source))
    }

    pub fn with_source(source: Arc<dyn ReportingDataSource>) -> Self {
        Self {
            report_service: Arc::new(ReportAggregator::new(source)),
        }
    }
}
