// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: route table, authentication gate wiring and OpenAPI doc.
//!
//! The gate is layered onto the `/user` subtree only; health probes and the
//! API documentation stay reachable without a token. Registration and login
//! live under `/user` but are exempted inside the gate itself.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::gate::authentication_gate,
    models::{
        AuthTokenResponse, LoginRequest, RegisterUserRequest, UpdateUserRequest, UserResponse,
    },
    state::AppState,
};

pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/user/register", post(users::register_user))
        .route("/user/login", post(users::login_user))
        .route("/user/getuser", get(users::get_user))
        .route("/user/getallusers", get(users::get_all_users))
        .route("/user/update", put(users::update_user))
        .route("/user/delete", delete(users::delete_user))
        .route("/user/logout", delete(users::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_gate,
        ))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(user_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register_user,
        users::login_user,
        users::get_user,
        users::get_all_users,
        users::update_user,
        users::delete_user,
        users::logout,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterUserRequest,
            UpdateUserRequest,
            LoginRequest,
            AuthTokenResponse,
            UserResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Users", description = "Registration, login and account management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
