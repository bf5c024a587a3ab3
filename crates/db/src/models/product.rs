//! Product (semi-finished product) model and stock issue DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::catalog::to_price_scale;
use stockroom_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `products` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Product joined with its category name, used by the valuation report.
#[derive(Debug, Clone, FromRow)]
pub struct ProductStockLine {
    pub id: DbId,
    pub name: String,
    pub category_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl Product {
    /// Restore the two-place price scale PostgreSQL drops from zero values.
    pub fn with_price_scale(mut self) -> Self {
        self.unit_price = to_price_scale(self.unit_price);
        self
    }
}

impl ProductStockLine {
    /// Restore the two-place price scale PostgreSQL drops from zero values.
    pub fn with_price_scale(mut self) -> Self {
        self.unit_price = to_price_scale(self.unit_price);
        self
    }
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a new product.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Decimal,
    pub category_id: DbId,
}

/// DTO for updating a product.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
    pub category_id: Option<DbId>,
}

/// Query parameters for `GET /products`.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub category_id: Option<DbId>,
}

/// Request body for a stock issue.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueStock {
    /// Units to withdraw; must be between 1 and the current quantity.
    pub quantity: i64,
    /// Delete the product when the issue empties it.
    #[serde(default)]
    pub delete_when_empty: bool,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Result of a stock issue: the product either survives with its new
/// quantity or is gone.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StockIssueResult {
    Updated { product: Product },
    Deleted { product_id: DbId },
}

/// One line of the stock valuation report.
#[derive(Debug, Clone, Serialize)]
pub struct ValuationLine {
    pub product_id: DbId,
    pub name: String,
    pub category_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub value: Decimal,
}

/// Stock valuation across all products.
#[derive(Debug, Clone, Serialize)]
pub struct StockValuation {
    pub lines: Vec<ValuationLine>,
    pub total_value: Decimal,
}
