use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use exam_prep_server::{
    app_state::AppState,
    config::Config,
    graphql::create_schema,
    handlers::{generate_questions, graphiql, graphql_endpoint, health_check, search_sources},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let (host, port) = config.bind_address();

    let app_state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let schema = create_schema(app_state.clone());

    log::info!(
        "Question generator: {}, embedder: {}, index: {}",
        app_state.question_cache.generator_name(),
        app_state.question_index.embedder_name(),
        app_state.question_index.index_name()
    );
    log::info!("Starting HTTP server on {}:{}", host, port);
    log::info!("GraphiQL playground: http://{}:{}/graphiql", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .service(health_check)
            .service(generate_questions)
            .service(search_sources)
            .service(graphql_endpoint)
            .service(graphiql)
    })
    .bind((host, port))?
    .run()
    .await
}
