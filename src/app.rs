use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{protected::employees, public};
use crate::middleware::basic_auth_middleware;
use crate::state::AppState;

/// Full router: public system routes plus the protected employee API
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(employee_routes(state.clone()))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn employee_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/employees",
            get(employees::list)
                .post(employees::create)
                .put(employees::update),
        )
        .route(
            "/api/employees/:id",
            get(employees::get)
                .patch(employees::patch)
                .delete(employees::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, basic_auth_middleware))
}
