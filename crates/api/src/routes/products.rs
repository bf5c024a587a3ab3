//! Route definitions for products, mounted at `/products`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list (?category_id=)
/// POST   /                  -> create
/// GET    /valuation         -> valuation
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// POST   /{id}/issue        -> issue_stock
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/valuation", get(products::valuation))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/{id}/issue", post(products::issue_stock))
}
