// src/db/pg_source.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use crate::{
    common::error::SourceError,
    db::reporting_source::ReportingDataSource,
    models::report::{DateParams, LotFinancialSeries, TrendSeries},
};

// Categorias da tabela `expenses` (CHECK na migração)
const CATEGORY_ADMIN: &str = "ADMIN";
const CATEGORY_ADVERTISING: &str = "ADVERTISING";
const CATEGORY_OTHER: &str = "OTHER";

#[derive(Debug, FromRow)]
struct LotRow {
    lot_name: String,
    expense: Decimal,
    proceeds: Decimal,
}

#[derive(Debug, FromRow)]
struct TrendRow {
    period: String,
    other_expenses: Decimal,
    operational_expenses: Decimal,
    proceeds: Decimal,
}

// Linhas já ordenadas pela consulta; a ordem vira o índice das séries
fn fold_lot_rows(rows: Vec<LotRow>) -> LotFinancialSeries {
    let mut series = LotFinancialSeries::default();
    for row in rows {
        series.lot_labels.push(row.lot_name);
        series.expense_per_lot.push(row.expense);
        series.proceeds_per_lot.push(row.proceeds);
    }
    series
}

fn fold_trend_rows(rows: Vec<TrendRow>) -> Result<TrendSeries, SourceError> {
    let mut series = TrendSeries::default();
    for row in rows {
        let utility = row
            .proceeds
            .checked_sub(row.other_expenses)
            .and_then(|u| u.checked_sub(row.operational_expenses))
            .ok_or_else(|| SourceError::Malformed(format!("utilidade estoura em {}", row.period)))?;
        series.period_labels.push(row.period);
        series.other_expenses.push(row.other_expenses);
        series.operational_expenses.push(row.operational_expenses);
        series.proceeds.push(row.proceeds);
        series.utility.push(utility);
    }
    Ok(series)
}

/// Fonte de relatórios que consulta o Postgres diretamente.
///
/// As datas chegam como texto `DD-MM-YYYY` e são convertidas no próprio SQL
/// com `to_date`, mantendo o mesmo contrato da API upstream.
#[derive(Clone)]
pub struct PgReportingSource {
    pool: PgPool,
}

impl PgReportingSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn expenses_by_category(
        &self,
        params: &DateParams,
        category: &str,
    ) -> Result<Decimal, SourceError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::NUMERIC
            FROM expenses
            WHERE category = $3
              AND expense_date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .bind(category)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}

#[async_trait]
impl ReportingDataSource for PgReportingSource {
    async fn sales_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE sale_date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn production_volume(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(produced_quantity), 0)::NUMERIC
            FROM lots
            WHERE production_date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn operational_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        // Gastos operacionais são os lançados diretamente em um lote
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::NUMERIC
            FROM lot_expenses
            WHERE expense_date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn administrative_expenses_total(
        &self,
        params: &DateParams,
    ) -> Result<Decimal, SourceError> {
        self.expenses_by_category(params, CATEGORY_ADMIN).await
    }

    async fn marketing_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.expenses_by_category(params, CATEGORY_ADVERTISING).await
    }

    async fn other_expenses_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        self.expenses_by_category(params, CATEGORY_OTHER).await
    }

    async fn proceeds_total(&self, params: &DateParams) -> Result<Decimal, SourceError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)::NUMERIC
            FROM sales
            WHERE sale_date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn client_count(&self, params: &DateParams) -> Result<i64, SourceError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM clients
            WHERE created_at::date BETWEEN to_date($1, 'DD-MM-YYYY') AND to_date($2, 'DD-MM-YYYY')
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn lot_expense_proceeds_series(&self) -> Result<LotFinancialSeries, SourceError> {
        // Todo o histórico, sem janela
        let rows = sqlx::query_as::<_, LotRow>(
            r#"
            SELECT
                l.name AS lot_name,
                COALESCE((SELECT SUM(e.amount) FROM lot_expenses e WHERE e.lot_id = l.id), 0)::NUMERIC AS expense,
                COALESCE((SELECT SUM(s.total_amount) FROM sales s WHERE s.lot_id = l.id), 0)::NUMERIC AS proceeds
            FROM lots l
            ORDER BY l.production_date ASC, l.name ASC
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(fold_lot_rows(rows))
    }

    async fn proceeds_vs_expenses_trend(
        &self,
        params: &DateParams,
    ) -> Result<TrendSeries, SourceError> {
        // Um ponto por mês da janela, inclusive meses sem movimento.
        // "Demais gastos" = todas as categorias de `expenses` juntas.
        let rows = sqlx::query_as::<_, TrendRow>(
            r#"
            WITH bounds AS (
                SELECT to_date($1, 'DD-MM-YYYY') AS start_date,
                       to_date($2, 'DD-MM-YYYY') AS end_date
            ),
            months AS (
                SELECT generate_series(
                    date_trunc('month', b.start_date),
                    date_trunc('month', b.end_date),
                    INTERVAL '1 month'
                )::date AS month
                FROM bounds b
            )
            SELECT
                to_char(m.month, 'MM-YYYY') AS period,
                COALESCE((
                    SELECT SUM(e.amount) FROM expenses e, bounds b
                    WHERE date_trunc('month', e.expense_date)::date = m.month
                      AND e.expense_date BETWEEN b.start_date AND b.end_date
                ), 0)::NUMERIC AS other_expenses,
                COALESCE((
                    SELECT SUM(le.amount) FROM lot_expenses le, bounds b
                    WHERE date_trunc('month', le.expense_date)::date = m.month
                      AND le.expense_date BETWEEN b.start_date AND b.end_date
                ), 0)::NUMERIC AS operational_expenses,
                COALESCE((
                    SELECT SUM(s.total_amount) FROM sales s, bounds b
                    WHERE date_trunc('month', s.sale_date)::date = m.month
                      AND s.sale_date BETWEEN b.start_date AND b.end_date
                ), 0)::NUMERIC AS proceeds
            FROM months m
            ORDER BY m.month ASC
            "#,
        )
            .bind(&params.init_date)
            .bind(&params.end_date)
            .fetch_all(&self.pool)
            .await?;

        fold_trend_rows(rows)
    }
}
