use axum::{
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use validator::Validate;

use crate::entities::contact_message::{self, Entity as ContactMessageEntity};
use crate::middleware::auth::optional_user;
use crate::validation::validate_email;

pub fn contact_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/contact", post(send_message))
        .layer(Extension(db))
}

async fn send_message(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ContactPayload>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
    }

    if !validate_email(&payload.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "errors": { "email": [{ "message": "Enter a valid email address" }] }
            })),
        );
    }

    // Logged-in senders must write from their account email.
    let user = optional_user(db.clone(), &headers).await;
    if let Some(user) = &user {
        if payload.email != user.email {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "errors": { "email": [{
                        "message": format!(
                            "You must use the email you are signed in with: {}",
                            user.email
                        )
                    }] }
                })),
            );
        }
    }

    let ip_address = client_ip(&headers, addr);

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let new_message = contact_message::ActiveModel {
        user_id: Set(user.map(|model| model.id)),
        name: Set(payload.name),
        email: Set(payload.email),
        message: Set(payload.message),
        ip_address: Set(ip_address),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match ContactMessageEntity::insert(new_message).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Your message has been sent. We will get back to you soon."
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
        },
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    }
}

// X-Forwarded-For when behind a proxy, peer address otherwise.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| Some(addr.ip().to_string()))
}

//Structs
#[derive(Deserialize, Debug, Validate)]
struct ContactPayload {
    #[validate(length(min = 1, max = 100, message = "Enter your name"))]
    name: String,
    email: String,
    #[validate(length(min = 1, message = "Enter a message"))]
    message: String,
}
