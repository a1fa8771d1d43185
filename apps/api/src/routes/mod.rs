pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::feedback::handlers::handle_get_feedback;
use crate::library::handlers::{handle_get_resume, handle_list_resumes};
use crate::state::AppState;
use crate::tailoring::handlers::{handle_generate_resume, handle_submit_data, handle_upload};

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/test", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Document generation
        .route("/upload", post(handle_upload))
        .route("/submit_data", post(handle_submit_data))
        .route("/generate_resume", post(handle_generate_resume))
        // Feedback
        .route("/get_feedback", post(handle_get_feedback))
        // Library
        .route("/list_resumes", get(handle_list_resumes))
        .route("/resumes/:file_name", get(handle_get_resume))
        .layer(body_limit)
        .with_state(state)
}
