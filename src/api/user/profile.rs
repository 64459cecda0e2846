use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::api::public::auth::hash_password;
use crate::entities::{
    booking::{self, Entity as BookingEntity},
    order::{self, Entity as OrderEntity},
    order_item,
    rating::{self, Entity as RatingEntity},
    user::{self, Entity as UserEntity},
};
use crate::middleware::auth::Claims;

pub fn profile_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/profile", get(get_profile).patch(patch_profile))
        .route("/password/change", post(change_password))
        .layer(Extension(db))
}

async fn get_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let user_id = claims.user_id;

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    };

    let account = match UserEntity::find_by_id(user_id).one(&txn).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Not found"
                })),
            )
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    };

    let ratings = RatingEntity::find()
        .filter(rating::Column::UserId.eq(user_id))
        .order_by_desc(rating::Column::CreatedAt)
        .all(&txn)
        .await;

    let orders = OrderEntity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::Id)
        .find_with_related(order_item::Entity)
        .all(&txn)
        .await;

    let bookings = BookingEntity::find()
        .filter(booking::Column::UserId.eq(user_id))
        .order_by_desc(booking::Column::Id)
        .all(&txn)
        .await;

    match (ratings, orders, bookings) {
        (Ok(ratings), Ok(orders), Ok(bookings)) => {
            let orders: Vec<serde_json::Value> = orders
                .into_iter()
                .map(|(order, items)| {
                    json!({
                        "order": order,
                        "items": items
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "email": account.email,
                    "username": account.username,
                    "ratings": ratings,
                    "orders": orders,
                    "bookings": bookings
                })),
            )
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

async fn patch_profile(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PatchProfile>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    };

    match UserEntity::find_by_id(claims.user_id).one(&txn).await {
        Ok(Some(model)) => {
            let mut model: user::ActiveModel = model.into();
            model.username = Set(payload.username);
            match model.update(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource patched successfully"
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
                        StatusCode::BAD_REQUEST,
                        Json(json!({
                            "error": "Failed to patch this resource"
                        })),
                    )
                }
            }
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not found"
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

async fn change_password(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePassword>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
        }
    };

    match UserEntity::find_by_id(claims.user_id).one(&txn).await {
        Ok(Some(model)) => {
            if model.check_hash(&payload.old_password).is_err() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Current password is incorrect"
                    })),
                );
            }

            let password = match hash_password(&payload.new_password) {
                Ok(password) => password,
                Err(_) => {
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "error": "An internal server error occured"
                        })),
                    )
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
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not found"
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

//Structs
#[derive(Deserialize, Validate)]
struct PatchProfile {
    #[validate(length(min = 1, max = 100, message = "Enter a username"))]
    username: String,
}

#[derive(Deserialize, Validate)]
struct ChangePassword {
    old_password: String,
    #[validate(length(min = 8, message = "Password should be at least 8 characters"))]
    new_password: String,
}
