// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{question, quiz},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Course-scoped quiz listing and creation.
/// * Quiz, question and attempt routes; attempt routes require a bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let course_routes = Router::new().route(
        "/{cid}/quizzes",
        get(quiz::list_course_quizzes).post(quiz::create_quiz),
    );

    // Identity is required only where the user id matters.
    let attempt_routes = Router::new()
        .route("/{qid}/attempt", post(quiz::record_attempt))
        .route("/{qid}/attempts", get(quiz::get_attempt_count))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route(
            "/{qid}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route("/{qid}/questions", post(question::add_question))
        .route(
            "/{qid}/questions/{question_id}",
            put(question::update_question).delete(question::delete_question),
        )
        .merge(attempt_routes);

    Router::new()
        .nest("/api/courses", course_routes)
        .nest("/api/quizzes", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
