use actix_web::{post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{GenerateQuestionsRequest, SearchSourcesRequest},
        response::{SearchSourcesResponse, SourceMatchDto},
    },
};

/// Returns cached questions for the text when a close match exists,
/// otherwise generates (and caches) a new set.
#[post("/api/questions")]
async fn generate_questions(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<GenerateQuestionsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let request_id = get_request_id(&req).unwrap_or_default();
    log::info!(
        "[{}] Generating questions for {} chars of study text",
        request_id,
        request.text.len()
    );

    let outcome = state.question_cache.resolve(&request.text).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[post("/api/questions/search")]
async fn search_sources(
    state: web::Data<AppState>,
    request: web::Json<SearchSourcesRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let matches = state
        .question_index
        .search(&request.text, request.top_k())
        .await?
        .into_iter()
        .map(SourceMatchDto::from)
        .collect();

    Ok(HttpResponse::Ok().json(SearchSourcesResponse { matches }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        test_utils::{
            fixtures::cat_text,
            test_helpers::{assert_error_status, assert_success_status},
        },
    };
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    async fn offline_state() -> AppState {
        AppState::new(Config::test_config())
            .await
            .expect("offline state should build")
    }

    #[actix_web::test]
    async fn test_generate_questions_offline() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state().await))
                .service(generate_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/questions")
            .set_json(json!({ "text": cat_text() }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["origin"], "generated");
        assert_eq!(body["questions"].as_array().map(Vec::len), Some(5));
        assert!(body["questions"][0]["correctAnswer"].as_u64().is_some_and(|a| a < 4));
    }

    #[actix_web::test]
    async fn test_second_request_is_served_from_cache() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state().await))
                .service(generate_questions),
        )
        .await;

        let mut bodies = Vec::new();
        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/api/questions")
                .set_json(json!({ "text": "Mitochondria are the powerhouse of the cell." }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            bodies.push(body);
        }

        assert_eq!(bodies[0]["origin"], "generated");
        assert_eq!(bodies[1]["origin"], "cache");
        assert_eq!(bodies[0]["questions"], bodies[1]["questions"]);
    }

    #[actix_web::test]
    async fn test_blank_text_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state().await))
                .service(generate_questions),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/questions")
            .set_json(json!({ "text": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_error_status(resp.status());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_search_sources_lists_stored_texts() {
        let state = offline_state().await;
        state
            .question_cache
            .get_or_generate("Plate tectonics shape continents.")
            .await
            .expect("generation should succeed");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(search_sources),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/questions/search")
            .set_json(json!({ "text": "plate tectonics", "topK": 3 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let matches = body["matches"].as_array().expect("matches array");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["sourceText"], "Plate tectonics shape continents.");
        assert_eq!(matches[0]["hasQuestions"], true);
    }
}
