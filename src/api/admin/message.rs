use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde_json::json;
use std::sync::Arc;

use crate::entities::contact_message::{self, Entity as ContactMessageEntity};

pub fn admin_message_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/message", get(list_messages))
        .layer(Extension(db))
}

async fn list_messages(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match ContactMessageEntity::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .all(&*db)
        .await
    {
        Ok(messages) => (StatusCode::OK, Json(json!({ "messages": messages }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}
