pub mod graphql_handler;
pub mod health_handler;
pub mod question_handler;

pub use graphql_handler::{graphiql, graphql_endpoint};
pub use health_handler::health_check;
pub use question_handler::{generate_questions, search_sources};
