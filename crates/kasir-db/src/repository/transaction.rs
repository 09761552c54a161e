//! # Transaction Repository
//!
//! The append-only ledger of completed checkouts.
//!
//! A transaction and its detail rows are written exactly once, inside the
//! checkout engine's transaction, and never updated or deleted afterwards.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kasir_core::{Transaction, TransactionDetail};

/// A line item waiting to be appended. The ledger assigns the detail id and
/// binds it to the transaction id it generates.
#[derive(Debug, Clone)]
pub struct NewDetail {
    pub product_id: String,
    /// Product name frozen at checkout time.
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at checkout time multiplied by quantity.
    pub subtotal: i64,
}

/// Repository for the transaction ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Appends one transaction with all its detail rows.
    ///
    /// Runs on the caller's connection so the ledger write shares the
    /// checkout's atomic unit with the stock decrements. The ledger assigns
    /// the transaction id and timestamp; details keep the caller's order.
    pub async fn append(
        &self,
        conn: &mut SqliteConnection,
        total_amount: i64,
        lines: Vec<NewDetail>,
    ) -> DbResult<Transaction> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        debug!(id = %id, total_amount = %total_amount, lines = lines.len(), "Appending transaction");

        sqlx::query(
            r#"
            INSERT INTO transactions (id, total_amount, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&id)
        .bind(total_amount)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        let mut details = Vec::with_capacity(lines.len());
        for line in lines {
            let detail = TransactionDetail {
                id: Uuid::new_v4().to_string(),
                transaction_id: id.clone(),
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                subtotal: line.subtotal,
            };

            sqlx::query(
                r#"
                INSERT INTO transaction_details
                    (id, transaction_id, product_id, product_name, quantity, subtotal)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&detail.id)
            .bind(&detail.transaction_id)
            .bind(&detail.product_id)
            .bind(&detail.product_name)
            .bind(detail.quantity)
            .bind(detail.subtotal)
            .execute(&mut *conn)
            .await?;

            details.push(detail);
        }

        Ok(Transaction {
            id,
            total_amount,
            created_at,
            details,
        })
    }

    /// Gets a transaction by ID, details in insertion order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let header = sqlx::query_as::<_, (String, i64, DateTime<Utc>)>(
            r#"
            SELECT id, total_amount, created_at
            FROM transactions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, total_amount, created_at)) = header else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Transaction {
            id,
            total_amount,
            created_at,
            details,
        }))
    }
}
