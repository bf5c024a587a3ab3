//! Handlers for the `/products` resource, stock issues and valuation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::catalog::{
    line_value, normalize_name, normalize_unit_price, total_value, validate_quantity,
    MAX_PRODUCT_NAME_LEN,
};
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::product::{
    CreateProduct, IssueStock, Product, ProductListParams, StockIssueResult, StockValuation,
    UpdateProduct, ValuationLine,
};
use stockroom_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const PRODUCT_NAME_FIELD: &str = "Product name";

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/products
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    validate_quantity(input.quantity)?;
    let input = CreateProduct {
        name: normalize_name(&input.name, PRODUCT_NAME_FIELD, MAX_PRODUCT_NAME_LEN)?,
        quantity: input.quantity,
        unit_price: normalize_unit_price(input.unit_price)?,
        category_id: input.category_id,
    };

    let product = ProductRepo::create(&state.pool, &input).await?;
    tracing::info!(
        product_id = product.id,
        category_id = product.category_id,
        quantity = product.quantity,
        "Product created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/products?category_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(DataResponse { data: product }))
}

/// PUT /api/v1/products/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }
    let input = UpdateProduct {
        name: input
            .name
            .as_deref()
            .map(|n| normalize_name(n, PRODUCT_NAME_FIELD, MAX_PRODUCT_NAME_LEN))
            .transpose()?,
        quantity: input.quantity,
        unit_price: input.unit_price.map(normalize_unit_price).transpose()?,
        category_id: input.category_id,
    };

    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    tracing::info!(product_id = id, "Product updated");

    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(product_id = id, "Product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Stock issue
// ---------------------------------------------------------------------------

/// POST /api/v1/products/{id}/issue
///
/// Withdraw `quantity` units. The body's `delete_when_empty` flag removes
/// the product when the issue leaves it at zero. Responds with
/// `{"outcome": "updated", "product": ...}` or
/// `{"outcome": "deleted", "product_id": ...}`.
pub async fn issue_stock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<IssueStock>,
) -> AppResult<Json<DataResponse<StockIssueResult>>> {
    let result = ProductRepo::issue_stock(&state.pool, id, &input).await?;

    match &result {
        StockIssueResult::Updated { product } => tracing::info!(
            product_id = id,
            issued = input.quantity,
            remaining = product.quantity,
            "Stock issued",
        ),
        StockIssueResult::Deleted { .. } => tracing::info!(
            product_id = id,
            issued = input.quantity,
            "Stock issued, product emptied and deleted",
        ),
    }

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// GET /api/v1/products/valuation
///
/// Stock value (`quantity * unit_price`) per product, ordered by category
/// then product name, with the overall total.
pub async fn valuation(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StockValuation>>> {
    let rows = ProductRepo::list_stock_lines(&state.pool).await?;

    let lines = rows
        .into_iter()
        .map(|row| {
            Ok(ValuationLine {
                value: line_value(row.quantity, row.unit_price)?,
                product_id: row.id,
                name: row.name,
                category_name: row.category_name,
                quantity: row.quantity,
                unit_price: row.unit_price,
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;
    let total = total_value(lines.iter().map(|l| l.value))?;

    Ok(Json(DataResponse {
        data: StockValuation {
            lines,
            total_value: total,
        },
    }))
}
