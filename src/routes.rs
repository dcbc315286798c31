// src/routes.rs

use axum::{
    Router, http::Method,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        admin, auth, leaderboard, ml, preferences, profile, quiz_results, resources, study_plans,
    },
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, quiz results, study plans, ml, admin...).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_result_routes = Router::new()
        .route(
            "/",
            post(quiz_results::submit_quiz_result).get(quiz_results::list_quiz_results),
        )
        .route("/{id}", get(quiz_results::get_quiz_result))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let study_plan_routes = Router::new()
        .route(
            "/",
            get(study_plans::list_study_plans).post(study_plans::create_study_plan),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let preference_routes = Router::new()
        .route(
            "/",
            get(preferences::get_preferences).post(preferences::save_preferences),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let ml_routes = Router::new()
        // Metrics are public; training and predictions require a session.
        .route("/metrics", get(ml::get_metrics))
        .merge(
            Router::new()
                .route("/train", post(ml::train))
                .route("/predictions", post(ml::predict))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/resources", post(admin::create_resource))
        .route(
            "/resources/{id}",
            put(admin::update_resource).delete(admin::delete_resource),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/quiz-results", quiz_result_routes)
        .nest("/api/study-plans", study_plan_routes)
        .nest("/api/user-preferences", preference_routes)
        .nest("/api/ml", ml_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/leaderboard", get(leaderboard::get_leaderboard))
        .route("/api/resources", get(resources::list_resources))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
