use actix_web::{get, post, web, HttpRequest, HttpResponse};
use async_graphql::http::GraphiQLSource;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::{graphql::Schema, middleware::get_request_id};

#[post("/graphql")]
async fn graphql_endpoint(
    req: HttpRequest,
    schema: web::Data<Schema>,
    gql_request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = gql_request.into_inner();
    if let Some(request_id) = get_request_id(&req) {
        log::debug!("[{}] GraphQL {:?}", request_id, request.operation_name);
        request = request.data(request_id);
    }
    schema.execute(request).await.into()
}

#[get("/graphiql")]
async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish())
}
