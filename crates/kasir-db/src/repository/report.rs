//! # Report Repository
//!
//! Read-only sales aggregates over the transaction ledger.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{BestSellingProduct, Report};

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales figures for today (UTC).
    pub async fn today(&self) -> DbResult<Report> {
        debug!("Building today's report");

        let (total_revenue, total_transactions) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM transactions
            WHERE DATE(created_at) = DATE('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let best_seller = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT td.product_name, SUM(td.quantity) AS qty_sold
            FROM transaction_details td
            WHERE td.transaction_id IN
                (SELECT id FROM transactions WHERE DATE(created_at) = DATE('now'))
            GROUP BY td.product_name
            ORDER BY qty_sold DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(assemble(total_revenue, total_transactions, best_seller))
    }

    /// Sales figures for an inclusive date range.
    pub async fn range(&self, start_date: NaiveDate, end_date: NaiveDate) -> DbResult<Report> {
        debug!(start = %start_date, end = %end_date, "Building range report");

        let (total_revenue, total_transactions) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM transactions
            WHERE DATE(created_at) BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;

        let best_seller = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT td.product_name, SUM(td.quantity) AS qty_sold
            FROM transaction_details td
            WHERE td.transaction_id IN
                (SELECT id FROM transactions WHERE DATE(created_at) BETWEEN ?1 AND ?2)
            GROUP BY td.product_name
            ORDER BY qty_sold DESC
            LIMIT 1
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assemble(total_revenue, total_transactions, best_seller))
    }
}

/// Builds a Report, substituting the zero value when the range had no sales.
fn assemble(
    total_revenue: i64,
    total_transactions: i64,
    best_seller: Option<(String, i64)>,
) -> Report {
    Report {
        total_revenue,
        total_transactions,
        best_selling_product: best_seller
            .map(|(name, qty_sold)| BestSellingProduct { name, qty_sold })
            .unwrap_or_default(),
    }
}
