use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

use crate::entities::booking::{self, Entity as BookingEntity, Status};

//ROUTERS
pub fn admin_booking_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/booking", get(list_bookings))
        .route("/booking/:id", axum::routing::patch(patch_booking))
        .layer(Extension(db))
}

//ROUTES
async fn list_bookings(
    Query(params): Query<BookingListQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let mut query = BookingEntity::find();

    if let Some(status) = params.status {
        match Status::from_str(&status) {
            Ok(status) => query = query.filter(booking::Column::Status.eq(status)),
            Err(message) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": message
                    })),
                );
            }
        }
    }

    if let Some(date) = params.date {
        match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(date) => query = query.filter(booking::Column::EventDate.eq(date)),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Specify the date as YYYY-MM-DD"
                    })),
                );
            }
        }
    }

    match query
        .order_by_asc(booking::Column::EventDate)
        .order_by_asc(booking::Column::EventTime)
        .all(&*db)
        .await
    {
        Ok(bookings) => (StatusCode::OK, Json(json!({ "bookings": bookings }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

async fn patch_booking(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchBookingPayload>,
) -> impl IntoResponse {
    let status = match Status::from_str(&payload.status) {
        Ok(status) => status,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": message
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

    match BookingEntity::find_by_id(id).one(&txn).await {
        Ok(Some(model)) => {
            let mut model: booking::ActiveModel = model.into();
            model.status = Set(status);
            model.updated_at = Set(Utc::now());
            match model.update(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource patched successfully."
                        })),
                    )
                }
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
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No booking with {} id was found.", id)
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        ),
    }
}

//Structs
#[derive(Deserialize)]
struct BookingListQuery {
    status: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct PatchBookingPayload {
    status: String,
}
