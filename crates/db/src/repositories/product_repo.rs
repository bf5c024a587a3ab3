//! Repository for the `products` table, including stock issues.

use sqlx::PgPool;
use stockroom_core::error::CoreError;
use stockroom_core::stock::{self, StockWrite};
use stockroom_core::types::DbId;

use crate::models::product::{
    CreateProduct, IssueStock, Product, ProductListParams, ProductStockLine, StockIssueResult,
    UpdateProduct,
};

/// Column list for products queries.
const COLUMNS: &str = "id, name, quantity, unit_price, category_id, created_at, updated_at";

/// Failure of [`ProductRepo::issue_stock`].
#[derive(Debug, thiserror::Error)]
pub enum IssueStockError {
    /// The product is missing or the withdrawal is out of range.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides CRUD operations and stock issues for products.
pub struct ProductRepo;

impl ProductRepo {
    /// List products ordered by name, optionally restricted to one category.
    pub async fn list(
        pool: &PgPool,
        params: &ProductListParams,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE ($1::BIGINT IS NULL OR category_id = $1)
             ORDER BY name ASC, id ASC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(params.category_id)
            .fetch_all(pool)
            .await
            .map(|rows| rows.into_iter().map(Product::with_price_scale).collect())
    }

    /// Find a product by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map(|row| row.map(Product::with_price_scale))
    }

    /// Create a new product, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (name, quantity, unit_price, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(input.category_id)
            .fetch_one(pool)
            .await
            .map(Product::with_price_scale)
    }

    /// Update a product by ID, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                unit_price = COALESCE($4, unit_price),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
            .map(|row| row.map(Product::with_price_scale))
    }

    /// Delete a product by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Withdraw stock from a product.
    ///
    /// Locks the product row, checks the withdrawal against the locked
    /// quantity with [`stock::plan_issue`], then performs exactly one write:
    /// an update to the remaining quantity or, when the product is emptied
    /// and `delete_when_empty` is set, a delete. Nothing is written when the
    /// withdrawal is rejected.
    pub async fn issue_stock(
        pool: &PgPool,
        id: DbId,
        input: &IssueStock,
    ) -> Result<StockIssueResult, IssueStockError> {
        let mut tx = pool.begin().await?;

        let current: Option<(i64,)> =
            sqlx::query_as("SELECT quantity FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (current,) = current.ok_or(CoreError::NotFound {
            entity: "Product",
            id,
        })?;

        let result = match stock::plan_issue(current, input.quantity, input.delete_when_empty)? {
            StockWrite::SetQuantity(remaining) => {
                let query = format!(
                    "UPDATE products SET quantity = $2 WHERE id = $1 RETURNING {COLUMNS}"
                );
                let product = sqlx::query_as::<_, Product>(&query)
                    .bind(id)
                    .bind(remaining)
                    .fetch_one(&mut *tx)
                    .await?
                    .with_price_scale();
                StockIssueResult::Updated { product }
            }
            StockWrite::DeleteProduct => {
                sqlx::query("DELETE FROM products WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                StockIssueResult::Deleted { product_id: id }
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    /// Product lines with their category names for stock valuation.
    pub async fn list_stock_lines(pool: &PgPool) -> Result<Vec<ProductStockLine>, sqlx::Error> {
        sqlx::query_as::<_, ProductStockLine>(
            "SELECT p.id, p.name, c.name AS category_name, p.quantity, p.unit_price \
             FROM products p \
             JOIN categories c ON c.id = p.category_id \
             ORDER BY c.name ASC, p.name ASC, p.id ASC",
        )
        .fetch_all(pool)
        .await
        .map(|rows| {
            rows.into_iter()
                .map(ProductStockLine::with_price_scale)
                .collect()
        })
    }
}
