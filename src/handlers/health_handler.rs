use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "generator": state.question_cache.generator_name(),
        "embedder": state.question_index.embedder_name(),
        "index": state.question_index.index_name(),
    }))
}
