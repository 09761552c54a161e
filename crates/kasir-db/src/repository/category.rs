//! # Category Repository
//!
//! Database operations for product categories.

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::{Category, CategorySummary, Product};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories with their product counts and products.
    ///
    /// ## Arguments
    /// * `name_filter` - Optional case-insensitive substring match on the
    ///   category name.
    ///
    /// ## How It Works
    /// Two queries: one for the category rows with counts, one for all
    /// products of the matched categories. Products are grouped in memory,
    /// which keeps the SQL portable and the row mapping simple.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<CategorySummary>> {
        debug!(filter = ?name_filter, "Listing categories");

        let pattern = name_filter.map(|n| format!("%{}%", n));

        let mut sql = String::from(
            r#"
            SELECT c.id, c.name, c.description, COUNT(p.id) AS product_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            "#,
        );
        if pattern.is_some() {
            sql.push_str("WHERE c.name LIKE ?1\n");
        }
        sql.push_str("GROUP BY c.id, c.name, c.description ORDER BY c.id");

        let mut query = sqlx::query_as::<_, (String, String, Option<String>, i64)>(&sql);
        if let Some(ref pattern) = pattern {
            query = query.bind(pattern);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut products_by_category = self.products_grouped(pattern.as_deref()).await?;

        let summaries = rows
            .into_iter()
            .map(|(id, name, description, product_count)| {
                let products = products_by_category.remove(&id).unwrap_or_default();
                CategorySummary {
                    id,
                    name,
                    description,
                    product_count,
                    products,
                }
            })
            .collect();

        Ok(summaries)
    }

    /// Fetches every product of the matched categories, keyed by category id.
    async fn products_grouped(
        &self,
        pattern: Option<&str>,
    ) -> DbResult<HashMap<String, Vec<Product>>> {
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
            sql.push_str("WHERE c.name LIKE ?1\n");
        }
        sql.push_str("ORDER BY p.name");

        let mut query = sqlx::query_as::<_, Product>(&sql);
        if let Some(pattern) = pattern {
            query = query.bind(pattern);
        }
        let products = query.fetch_all(&self.pool).await?;

        let mut grouped: HashMap<String, Vec<Product>> = HashMap::new();
        for product in products {
            grouped
                .entry(product.category_id.clone())
                .or_default()
                .push(product);
        }
        Ok(grouped)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(Category)` - Inserted category with generated id
    /// * `Err(DbError::UniqueViolation)` - Name already exists
    pub async fn insert(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        let id = Uuid::new_v4().to_string();

        debug!(id = %id, name = %name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await?;

        Ok(Category {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
        })
    }

    /// Updates an existing category.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: &str, name: &str, description: Option<&str>) -> DbResult<()> {
        debug!(id = %id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET name = ?2, description = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }

    /// Deletes a category.
    ///
    /// Fails with a foreign key violation while products still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::error::DbError;

    #[tokio::test]
    async fn test_category_crud_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo.insert("Minuman", Some("Aneka minuman")).await.unwrap();
        assert_eq!(created.name, "Minuman");

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.description.as_deref(), Some("Aneka minuman"));

        repo.update(&created.id, "Minuman Dingin", None)
            .await
            .unwrap();
        let updated = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Minuman Dingin");
        assert!(updated.description.is_none());

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get_by_id(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        repo.insert("Makanan", None).await.unwrap();
        let err = repo.insert("Makanan", None).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let err = repo.update("no-such-id", "X", None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_groups_products_under_category() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let categories = db.categories();
        let products = db.products();

        let drinks = categories.insert("Minuman", None).await.unwrap();
        let snacks = categories.insert("Snack", None).await.unwrap();

        products
            .insert(&crate::repository::product::NewProduct {
                name: "Teh Botol".to_string(),
                description: None,
                price: 5000,
                stock: 10,
                category_id: drinks.id.clone(),
                picture_url: None,
            })
            .await
            .unwrap();

        let listing = categories.list(None).await.unwrap();
        assert_eq!(listing.len(), 2);

        let drinks_row = listing.iter().find(|c| c.id == drinks.id).unwrap();
        assert_eq!(drinks_row.product_count, 1);
        assert_eq!(drinks_row.products[0].name, "Teh Botol");
        assert_eq!(drinks_row.products[0].category_name, "Minuman");

        let snacks_row = listing.iter().find(|c| c.id == snacks.id).unwrap();
        assert_eq!(snacks_row.product_count, 0);
        assert!(snacks_row.products.is_empty());

        let filtered = categories.list(Some("minu")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Minuman");
    }
}
