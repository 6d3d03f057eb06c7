pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod schema;
pub mod services;
pub mod validate;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    db::Database,
    schema::AppSchema,
    services::{mailer::Mailer, runner::Runner},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub schema: AppSchema,
    pub runner: Runner,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let schema = schema::build_schema(db.pool.clone(), config.clone());
        let runner = Runner::from_config(&config);
        let mailer = Mailer::from_config(&config);
        Self {
            db,
            config,
            schema,
            runner,
            mailer,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/graphql",
            get(routes::graphql::graphiql).post(routes::graphql::graphql_handler),
        )
        .route("/api/run", post(routes::run::run_code))
        .route("/api/contact", post(routes::contact::send_contact))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
