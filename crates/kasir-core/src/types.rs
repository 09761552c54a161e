//! # Domain Types
//!
//! Core domain types used throughout the Kasir backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │   │     Product     │   │    Transaction      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (UUID)      │◄──│  category_id    │   │  id (UUID)          │   │
//! │  │  name (unique)  │   │  price          │   │  total_amount       │   │
//! │  │  description    │   │  stock          │   │  created_at         │   │
//! │  └─────────────────┘   └─────────────────┘   │  details[]          │   │
//! │                                 ▲            └──────────┬──────────┘   │
//! │                                 │                       │              │
//! │                                 │            ┌──────────▼──────────┐   │
//! │  ┌─────────────────┐            │            │  TransactionDetail  │   │
//! │  │  CheckoutItem   │────────────┘            │  ─────────────────  │   │
//! │  │  (input only)   │  product_id refers to   │  product_name       │   │
//! │  └─────────────────┘  a Product at checkout  │  quantity, subtotal │   │
//! │                       time                   │  (frozen snapshot)  │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `TransactionDetail` copies the product name and computed subtotal at
//! checkout time. Receipts stay accurate even when the product is renamed,
//! repriced, or deleted later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name. Unique across all categories.
    pub name: String,

    /// Optional free-form description.
    pub description: Option<String>,
}

/// A category together with its products, as returned by the listing
/// endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Number of products currently assigned to this category.
    pub product_count: i64,
    pub products: Vec<Product>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Price in the smallest currency unit. Never negative.
    pub price: i64,

    /// Current stock level. Never negative; checkout decrements it.
    pub stock: i64,

    /// Category this product belongs to.
    pub category_id: String,

    /// Category name, resolved at query time. Not a stored column.
    pub category_name: String,

    /// Optional public URL of the product picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.price)
    }
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One line of a checkout request. Input only; never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    /// Product to sell.
    pub product_id: String,

    /// Requested quantity. Must be positive.
    pub quantity: i64,
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed checkout. Append-only: once created, a transaction is never
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,

    /// Sum of all detail subtotals, in the smallest currency unit.
    pub total_amount: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Line items, in the order the caller submitted them.
    pub details: Vec<TransactionDetail>,
}

/// A line item of a transaction.
/// Uses the snapshot pattern to freeze product data at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// Product name at checkout time (frozen).
    pub product_name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Price at checkout time multiplied by quantity (frozen).
    pub subtotal: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// Aggregated sales figures over a date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    /// Sum of `total_amount` over all transactions in the range.
    pub total_revenue: i64,

    /// Number of transactions in the range.
    pub total_transactions: i64,

    /// Product with the highest summed quantity in the range.
    // Wire name is plural for compatibility with existing API consumers.
    #[serde(rename = "best_selling_products")]
    pub best_selling_product: BestSellingProduct,
}

/// The best-selling product of a report range. Zero value when the range
/// contains no sales.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BestSellingProduct {
    pub name: String,
    pub qty_sold: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_price_as_money() {
        let product = Product {
            id: "p1".to_string(),
            name: "Kopi Susu".to_string(),
            description: None,
            price: 15000,
            stock: 10,
            category_id: "c1".to_string(),
            category_name: "Minuman".to_string(),
            picture_url: None,
        };
        assert_eq!(product.price(), Money::new(15000));
    }

    #[test]
    fn test_transaction_serializes_details_in_order() {
        let tx = Transaction {
            id: "t1".to_string(),
            total_amount: 5000,
            created_at: Utc::now(),
            details: vec![
                TransactionDetail {
                    id: "d1".to_string(),
                    transaction_id: "t1".to_string(),
                    product_id: "p1".to_string(),
                    product_name: "A".to_string(),
                    quantity: 1,
                    subtotal: 2000,
                },
                TransactionDetail {
                    id: "d2".to_string(),
                    transaction_id: "t1".to_string(),
                    product_id: "p2".to_string(),
                    product_name: "B".to_string(),
                    quantity: 3,
                    subtotal: 3000,
                },
            ],
        };

        let json = serde_json::to_value(&tx).unwrap();
        let details = json["details"].as_array().unwrap();
        assert_eq!(details[0]["product_name"], "A");
        assert_eq!(details[1]["product_name"], "B");
    }

    #[test]
    fn test_report_wire_name_is_plural() {
        let report = Report {
            total_revenue: 10000,
            total_transactions: 2,
            best_selling_product: BestSellingProduct {
                name: "Kopi Susu".to_string(),
                qty_sold: 7,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("best_selling_products").is_some());
        assert_eq!(json["best_selling_products"]["qty_sold"], 7);
    }

    #[test]
    fn test_picture_url_omitted_when_absent() {
        let product = Product {
            id: "p1".to_string(),
            name: "Teh".to_string(),
            description: None,
            price: 5000,
            stock: 3,
            category_id: "c1".to_string(),
            category_name: "Minuman".to_string(),
            picture_url: None,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("picture_url").is_none());
    }
}
