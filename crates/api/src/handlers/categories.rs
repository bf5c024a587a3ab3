//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::catalog::{normalize_description, normalize_name, MAX_CATEGORY_NAME_LEN};
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::category::{Category, CategoryOption, CreateCategory, UpdateCategory};
use stockroom_db::models::product::{Product, ProductListParams};
use stockroom_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::{is_foreign_key_violation, AppError, AppResult, CATEGORY_IN_USE_MESSAGE};
use crate::response::DataResponse;
use crate::state::AppState;

const CATEGORY_NAME_FIELD: &str = "Category name";

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let input = CreateCategory {
        name: normalize_name(&input.name, CATEGORY_NAME_FIELD, MAX_CATEGORY_NAME_LEN)?,
        description: normalize_description(input.description.as_deref())?,
    };

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/options
///
/// `{id, name}` pairs for populating a category picker.
pub async fn list_options(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryOption>>>> {
    let options = CategoryRepo::list_options(&state.pool).await?;
    Ok(Json(DataResponse { data: options }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = find_category(&state, id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
///
/// Omitted fields are unchanged. A blank `description` clears it.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let name = input
        .name
        .as_deref()
        .map(|n| normalize_name(n, CATEGORY_NAME_FIELD, MAX_CATEGORY_NAME_LEN))
        .transpose()?;
    // Blank normalises to "" so the repository clears the column.
    let description = input
        .description
        .as_deref()
        .map(|d| normalize_description(Some(d)).map(Option::unwrap_or_default))
        .transpose()?;

    let category = CategoryRepo::update(&state.pool, id, &UpdateCategory { name, description })
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    tracing::info!(category_id = id, "Category updated");

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Refused with 409 while any product references the category.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = match CategoryRepo::delete(&state.pool, id).await {
        Ok(deleted) => deleted,
        Err(err) if is_foreign_key_violation(&err) => {
            let in_use = CategoryRepo::count_products(&state.pool, id).await?;
            tracing::info!(category_id = id, in_use, "Category delete refused");
            return Err(AppError::Core(CoreError::Conflict(in_use_message(id, in_use))));
        }
        Err(err) => return Err(err.into()),
    };

    if deleted {
        tracing::info!(category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
    }
}

/// GET /api/v1/categories/{id}/products
pub async fn list_products(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    find_category(&state, id).await?;

    let products = ProductRepo::list(
        &state.pool,
        &ProductListParams {
            category_id: Some(id),
        },
    )
    .await?;
    Ok(Json(DataResponse { data: products }))
}

async fn find_category(state: &AppState, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))
}

/// Conflict message for a refused category delete.
///
/// The count is read after the refusal, so it may already be zero if the
/// referencing products were removed in between.
fn in_use_message(id: DbId, in_use: i64) -> String {
    if in_use > 0 {
        format!("Category {id} is still used by {in_use} product(s) and cannot be deleted")
    } else {
        CATEGORY_IN_USE_MESSAGE.to_string()
    }
}
