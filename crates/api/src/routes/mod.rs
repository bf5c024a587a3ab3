pub mod categories;
pub mod health;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                                      list, create
/// /categories/options                              {id, name} pairs for pickers
/// /categories/{id}                                 get, update, delete
/// /categories/{id}/products                        products in a category
///
/// /products                                        list (?category_id=), create
/// /products/valuation                              quantity x unit price report
/// /products/{id}                                   get, update, delete
/// /products/{id}/issue                             stock issue (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/products", products::router())
}
