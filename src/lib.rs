pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod sql;

use axum::{
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
}

/// Build the full application router.
///
/// The authentication pass runs on every request, before any per-route
/// gate; the gate policies read the identity it leaves behind.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(auth_routes())
        .merge(company_routes())
        .merge(job_routes())
        .merge(user_routes())
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/auth/token", post(auth::token_post))
        .route("/auth/register", post(auth::register_post))
}

fn company_routes() -> Router<AppState> {
    use axum::routing::patch;
    use handlers::companies;

    let open = Router::new()
        .route("/companies", get(companies::companies_get))
        .route("/companies/:handle", get(companies::companies_get_one));

    // Same paths, disjoint methods; the admin gate only wraps the
    // admin-side method routers.
    let admin = Router::new()
        .route("/companies", post(companies::companies_post))
        .route(
            "/companies/:handle",
            patch(companies::companies_patch).delete(companies::companies_delete),
        )
        .route_layer(axum_mw::from_fn(middleware::require_admin));

    open.merge(admin)
}

fn job_routes() -> Router<AppState> {
    use axum::routing::patch;
    use handlers::jobs;

    let open = Router::new()
        .route("/jobs", get(jobs::jobs_get))
        .route("/jobs/:id", get(jobs::jobs_get_one));

    let admin = Router::new()
        .route("/jobs", post(jobs::jobs_post))
        .route("/jobs/:id", patch(jobs::jobs_patch).delete(jobs::jobs_delete))
        .route_layer(axum_mw::from_fn(middleware::require_admin));

    open.merge(admin)
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    let open = Router::new().route("/users", post(users::users_post));

    let admin = Router::new()
        .route("/users", get(users::users_get))
        .route_layer(axum_mw::from_fn(middleware::require_admin));

    let self_or_admin = Router::new()
        .route(
            "/users/:username",
            get(users::users_get_one)
                .patch(users::users_patch)
                .delete(users::users_delete),
        )
        .route("/users/:username/jobs/:id", post(users::users_apply_post))
        .route_layer(axum_mw::from_fn(middleware::require_self_or_admin));

    open.merge(admin).merge(self_or_admin)
}
