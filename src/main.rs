use axum::middleware::from_fn;
use sea_orm::{Database, DatabaseConnection};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

mod api;
mod entities;
mod middleware;
mod validation;

use crate::api::create_api_router;
use crate::entities::{primary_setup, setup_schema};
use crate::middleware::logging::logging_middleware;
use crate::middleware::session::session_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("Databse url must be set");
    let db: DatabaseConnection = Database::connect(&database_url).await.unwrap();
    setup_schema(&db).await;

    let shared_db = Arc::new(db);

    primary_setup(shared_db.clone()).await;

    let app = create_api_router(shared_db)
        .layer(from_fn(session_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("Running at {:?}", listener);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
