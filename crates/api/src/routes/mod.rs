//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod banks;
pub mod cheques;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod reports;
pub mod users;

/// Creates the API router, layering authentication over everything but health.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(dashboard::routes())
        .merge(cheques::routes())
        .merge(reports::routes())
        .merge(invoices::routes())
        .merge(banks::routes())
        .merge(users::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
