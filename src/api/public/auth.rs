use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::user::{self, Entity as UserEntity, Role};
use crate::middleware::auth::{generate_reset_token, generate_token, validate_reset_token};
use crate::validation::validate_email;

pub fn auth_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login))
        .route("/password/reset", post(password_reset))
        .route("/password/reset/confirm", post(password_reset_confirm))
        .layer(Extension(db))
}

async fn register_user(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateUser>,
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

    let password = match hash_password(&payload.password) {
        Ok(password) => password,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "An internal server error occured"
                })),
            );
        }
    };

    // the part before @ doubles as a default display name
    let username = payload
        .username
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| payload.email.split('@').next().unwrap_or("guest").to_string());

    let new_user = user::ActiveModel {
        email: Set(payload.email),
        username: Set(username),
        password: Set(password),
        role: Set(Role::User),
        ..Default::default()
    };

    match user::Entity::insert(new_user).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "User registered successfully"
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
        },
        Err(err) => {
            tracing::debug!(error = %err, "Registration failed");
            let _ = txn.rollback().await;
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Email already exists"
                })),
            )
        }
    }
}

async fn login(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UserLogin>,
) -> impl IntoResponse {
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

    let result = UserEntity::find()
        .filter(user::Column::Email.eq(&*payload.email))
        .one(&txn)
        .await;

    match result {
        Ok(Some(model)) => match model.check_hash(&payload.password) {
            Ok(()) => match generate_token(model.id, model.role.to_string()).await {
                Ok(token) => (
                    StatusCode::OK,
                    Json(json!({
                        "token": token
                    })),
                ),
                Err(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
            },
            Err(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid email or password"
                })),
            ),
        },
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid email or password"
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "An internal server error occured"
            })),
        ),
    }
}

// Always answers with the same message so the endpoint cannot be used to
// probe for registered emails. Delivery of the token is out of scope, it
// is written to the log instead.
async fn password_reset(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PasswordReset>,
) -> impl IntoResponse {
    let generic = (
        StatusCode::OK,
        Json(json!({
            "message": "If this email is registered, reset instructions have been sent"
        })),
    );

    let result = UserEntity::find()
        .filter(user::Column::Email.eq(&*payload.email))
        .one(&*db)
        .await;

    if let Ok(Some(model)) = result {
        match generate_reset_token(model.id) {
            Ok(token) => {
                tracing::info!(user_id = model.id, token = %token, "Password reset token issued");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to issue password reset token");
            }
        }
    }

    generic
}

async fn password_reset_confirm(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PasswordResetConfirm>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
    }

    let user_id = match validate_reset_token(&payload.token) {
        Ok(user_id) => user_id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid or expired reset token"
                })),
            );
        }
    };

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

    match UserEntity::find_by_id(user_id).one(&txn).await {
        Ok(Some(model)) => {
            let password = match hash_password(&payload.new_password) {
                Ok(password) => password,
                Err(_) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "An internal server error occured"
                        })),
                    );
                }
            };
            let mut model: user::ActiveModel = model.into();
            model.password = Set(password);
            match model.update(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Password changed successfully"
                        })),
                    )
                }
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
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid or expired reset token"
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

//utilities
pub(crate) fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();

    Ok(password_hash)
}

//structs
#[derive(Deserialize, Clone, Debug, Validate)]
struct CreateUser {
    email: String,
    username: Option<String>,
    #[validate(length(min = 8, message = "Password should be at least 8 characters"))]
    password: String,
}

#[derive(Debug, Deserialize, Clone)]
struct UserLogin {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PasswordReset {
    email: String,
}

#[derive(Debug, Deserialize, Validate)]
struct PasswordResetConfirm {
    token: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters"))]
    new_password: String,
}
