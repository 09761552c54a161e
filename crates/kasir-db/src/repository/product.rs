//! # Product Repository
//!
//! Database operations for products. This is the inventory store consumed by
//! the checkout engine.
//!
//! ## Stock Mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Decrement Strategy                             │
//! │                                                                         │
//! │  ❌ WRONG: read, check in memory, then write                            │
//! │     SELECT stock FROM products WHERE id = ?                             │
//! │     UPDATE products SET stock = ? WHERE id = ?                          │
//! │     Two concurrent checkouts both read the same stale stock and        │
//! │     both "succeed" (lost update).                                       │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional statement                                  │
//! │     UPDATE products SET stock = stock - ?qty                            │
//! │     WHERE id = ?id AND stock >= ?qty                                    │
//! │     The sufficiency check and the decrement are a single atomic        │
//! │     operation; zero affected rows means the check failed.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::Product;

/// Fields of a product create/update request. The id is generated (create)
/// or taken from the path (update), never from the payload.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i64,
    pub category_id: String,
    pub picture_url: Option<String>,
}

/// Name and unit price of a product, captured by a successful stock
/// decrement. This is the snapshot the checkout engine freezes into the
/// transaction detail.
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    pub name: String,
    pub price: i64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by a case-insensitive substring
    /// of the product name.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        debug!(filter = ?name_filter, "Listing products");

        let pattern = name_filter.map(|n| format!("%{}%", n));

        let mut sql = String::from(
            r#"
            SELECT
                p.id, p.name, p.description, p.price, p.stock,
                p.category_id, c.name AS category_name, p.picture_url
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            "#,
        );
        if pattern.is_some() {
            sql.push_str("WHERE p.name LIKE ?1\n");
        }
        sql.push_str("ORDER BY p.name");

        let mut query = sqlx::query_as::<_, Product>(&sql);
        if let Some(ref pattern) = pattern {
            query = query.bind(pattern);
        }
        let products = query.fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Gets a product by its ID, with the category name resolved.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                p.id, p.name, p.description, p.price, p.stock,
                p.category_id, c.name AS category_name, p.picture_url
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            WHERE p.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id
    /// * `Err(DbError::ForeignKeyViolation)` - Category doesn't exist
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let id = Uuid::new_v4().to_string();

        debug!(id = %id, name = %new.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, category_id, picture_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(&new.category_id)
        .bind(&new.picture_url)
        .execute(&self.pool)
        .await?;

        // Re-read to resolve the category name
        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("product {} vanished after insert", id)))
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: &str, new: &NewProduct) -> DbResult<()> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price = ?4,
                stock = ?5,
                category_id = ?6,
                picture_url = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(&new.category_id)
        .bind(&new.picture_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Deletes a product.
    ///
    /// Historical transaction details keep their name/subtotal snapshots, so
    /// receipts survive the deletion.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    // =========================================================================
    // Checkout-scoped operations
    // =========================================================================
    //
    // These take an explicit connection so the checkout engine can run them
    // inside its own transaction. They must never touch self.pool.

    /// Conditionally decrements stock, re-validating sufficiency at decrement
    /// time.
    ///
    /// ## Returns
    /// * `Ok(Some(StockSnapshot))` - Stock was sufficient and is now reduced;
    ///   the snapshot carries the name and unit price to freeze into the
    ///   transaction detail.
    /// * `Ok(None)` - No row qualified: the product is missing OR its stock
    ///   is insufficient. Use [`stock_of`](Self::stock_of) to tell the two
    ///   apart.
    pub async fn decrement_stock(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> DbResult<Option<StockSnapshot>> {
        debug!(id = %id, quantity = %quantity, "Decrementing stock");

        let row = sqlx::query_as::<_, (String, i64)>(
            r#"
            UPDATE products
            SET stock = stock - ?1
            WHERE id = ?2 AND stock >= ?1
            RETURNING name, price
            "#,
        )
        .bind(quantity)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(|(name, price)| StockSnapshot { name, price }))
    }

    /// Reads the current stock of a product, or None if it doesn't exist.
    ///
    /// Used on the failure path of [`decrement_stock`](Self::decrement_stock)
    /// to distinguish a missing product from an insufficient one.
    pub async fn stock_of(&self, conn: &mut SqliteConnection, id: &str) -> DbResult<Option<i64>> {
        let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(stock)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::NewProduct;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    async fn seeded_db() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db.categories().insert("Minuman", None).await.unwrap();
        (db, category.id)
    }

    fn new_product(category_id: &str, name: &str, price: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: None,
            price,
            stock,
            category_id: category_id.to_string(),
            picture_url: None,
        }
    }

    #[tokio::test]
    async fn test_product_crud_roundtrip() {
        let (db, category_id) = seeded_db().await;
        let repo = db.products();

        let created = repo
            .insert(&new_product(&category_id, "Kopi Susu", 15000, 20))
            .await
            .unwrap();
        assert_eq!(created.category_name, "Minuman");
        assert_eq!(created.price, 15000);

        let mut change = new_product(&category_id, "Kopi Susu Gula Aren", 18000, 20);
        change.picture_url = Some("https://cdn.example/kopi.jpg".to_string());
        repo.update(&created.id, &change).await.unwrap();

        let updated = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Kopi Susu Gula Aren");
        assert_eq!(updated.picture_url.as_deref(), Some("https://cdn.example/kopi.jpg"));

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_fails() {
        let (db, _) = seeded_db().await;
        let err = db
            .products()
            .insert(&new_product("no-such-category", "X", 100, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_name() {
        let (db, category_id) = seeded_db().await;
        let repo = db.products();

        repo.insert(&new_product(&category_id, "Teh Botol", 5000, 5))
            .await
            .unwrap();
        repo.insert(&new_product(&category_id, "Kopi Hitam", 8000, 5))
            .await
            .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let teas = repo.list(Some("teh")).await.unwrap();
        assert_eq!(teas.len(), 1);
        assert_eq!(teas[0].name, "Teh Botol");
    }

    #[tokio::test]
    async fn test_conditional_decrement() {
        let (db, category_id) = seeded_db().await;
        let repo = db.products();

        let product = repo
            .insert(&new_product(&category_id, "Teh Botol", 5000, 3))
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        // Sufficient stock: snapshot returned, stock reduced
        let snapshot = repo
            .decrement_stock(&mut *conn, &product.id, 2)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.name, "Teh Botol");
        assert_eq!(snapshot.price, 5000);
        assert_eq!(
            repo.stock_of(&mut *conn, &product.id).await.unwrap(),
            Some(1)
        );

        // Insufficient stock: no row qualifies, stock untouched
        let refused = repo.decrement_stock(&mut *conn, &product.id, 2).await.unwrap();
        assert!(refused.is_none());
        assert_eq!(
            repo.stock_of(&mut *conn, &product.id).await.unwrap(),
            Some(1)
        );

        // Unknown product: also no row, and stock_of tells the difference
        let missing = repo.decrement_stock(&mut *conn, "ghost", 1).await.unwrap();
        assert!(missing.is_none());
        assert_eq!(repo.stock_of(&mut *conn, "ghost").await.unwrap(), None);
    }
}
