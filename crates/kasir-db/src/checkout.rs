//! # Checkout Engine
//!
//! Orchestrates a checkout: validates each line, prices it, decrements stock,
//! and appends the transaction to the ledger, all as one atomic unit.
//!
//! ## The Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Checkout = One DB Transaction                   │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    for each item (caller order):                                        │
//! │      UPDATE products SET stock = stock - qty                            │
//! │        WHERE id = ? AND stock >= qty  RETURNING name, price             │
//! │          │                                                              │
//! │          ├── row returned ──► accumulate subtotal, snapshot the line    │
//! │          │                                                              │
//! │          └── no row ──► missing or insufficient? one point read         │
//! │                         decides, then ROLLBACK (drop) and return Err    │
//! │                                                                         │
//! │    INSERT transaction header (ledger assigns id + created_at)           │
//! │    INSERT detail rows (caller order)                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure anywhere discards every effect performed so far.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Stock is the only contended resource. The conditional UPDATE both checks
//! sufficiency and decrements in a single statement, so two concurrent
//! checkouts can never both pass a stale check (the lost-update anomaly of a
//! separate SELECT-then-UPDATE). It is also the first statement of the
//! transaction, so the write lock is taken before any read snapshot exists.
//! Two checkouts racing for the last units serialize on the write lock;
//! whichever commits second sees the reduced stock and fails cleanly with
//! `InsufficientStock`.

use tracing::{debug, info};

use crate::error::DbError;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::{NewDetail, TransactionRepository};
use kasir_core::{CheckoutItem, CoreError, Money, Transaction};
use sqlx::SqlitePool;
use thiserror::Error;

/// A checkout either violates a business rule or fails to persist.
///
/// Both variants abort the whole operation with full rollback; callers can
/// branch on kind (HTTP maps domain failures to 4xx and persistence failures
/// to 5xx).
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Business rule violation: unknown product, insufficient stock, bad
    /// quantity, empty item list.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Underlying store failure (connection, constraint, commit).
    #[error(transparent)]
    Persistence(#[from] DbError),
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// The checkout engine.
///
/// Holds no state of its own; all shared state (stock, ledger) lives in the
/// backing store. Collaborators are injected at construction, never reached
/// through globals, so tests can wire the engine to an isolated database.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
    products: ProductRepository,
    transactions: TransactionRepository,
}

impl CheckoutEngine {
    /// Creates a checkout engine over an inventory store and a ledger.
    pub fn new(
        pool: SqlitePool,
        products: ProductRepository,
        transactions: TransactionRepository,
    ) -> Self {
        CheckoutEngine {
            pool,
            products,
            transactions,
        }
    }

    /// Performs a checkout.
    ///
    /// Processes `items` in the given order. On success, every referenced
    /// product's stock is reduced by the requested quantity and the returned
    /// [`Transaction`] is fully persisted, with `total_amount` equal to the
    /// sum of its detail subtotals and each detail freezing the product name
    /// and price in effect at call time.
    ///
    /// On any error the database is left exactly as it was before the call.
    ///
    /// ## Errors
    /// * [`CoreError::EmptyCheckout`] - `items` is empty
    /// * [`CoreError::InvalidQuantity`] - a quantity is zero or negative
    /// * [`CoreError::ProductNotFound`] - a product id does not exist
    /// * [`CoreError::InsufficientStock`] - stock cannot cover a quantity
    /// * [`CheckoutError::Persistence`] - the store failed; nothing committed
    pub async fn checkout(&self, items: &[CheckoutItem]) -> CheckoutResult<Transaction> {
        if items.is_empty() {
            return Err(CoreError::EmptyCheckout.into());
        }

        for item in items {
            if item.quantity <= 0 {
                return Err(CoreError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                }
                .into());
            }
        }

        debug!(items = items.len(), "Starting checkout");

        // Everything below runs on one connection inside one transaction.
        // Early returns drop `tx`, which rolls back.
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let mut total = Money::zero();
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let snapshot = self
                .products
                .decrement_stock(&mut *tx, &item.product_id, item.quantity)
                .await?;

            let snapshot = match snapshot {
                Some(snapshot) => snapshot,
                None => {
                    // The decrement refused: either the product is missing or
                    // its stock is short. One point read, same transaction,
                    // tells which.
                    let err = match self.products.stock_of(&mut *tx, &item.product_id).await? {
                        Some(available) => CoreError::InsufficientStock {
                            product_id: item.product_id.clone(),
                            available,
                            requested: item.quantity,
                        },
                        None => CoreError::ProductNotFound(item.product_id.clone()),
                    };
                    return Err(err.into());
                }
            };

            let subtotal = Money::new(snapshot.price) * item.quantity;
            total += subtotal;

            lines.push(NewDetail {
                product_id: item.product_id.clone(),
                product_name: snapshot.name,
                quantity: item.quantity,
                subtotal: subtotal.amount(),
            });
        }

        let transaction = self
            .transactions
            .append(&mut *tx, total.amount(), lines)
            .await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            transaction_id = %transaction.id,
            total_amount = %transaction.total_amount,
            items = transaction.details.len(),
            "Checkout committed"
        );

        Ok(transaction)
    }
}
