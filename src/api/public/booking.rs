use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::booking::{self, slots_overlap, validate_slot, Entity as BookingEntity};

pub fn booking_check_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/booking/check", post(check_availability))
        .layer(Extension(db))
}

// AJAX helper for the booking form: no auth, answers {available, message}.
async fn check_availability(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CheckAvailability>,
) -> impl IntoResponse {
    let event_date = match NaiveDate::parse_from_str(&payload.event_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return (
                StatusCode::OK,
                Json(json!({
                    "available": false,
                    "message": "Specify the date as YYYY-MM-DD"
                })),
            );
        }
    };
    let event_time = match NaiveTime::parse_from_str(&payload.event_time, "%H:%M") {
        Ok(time) => time,
        Err(_) => {
            return (
                StatusCode::OK,
                Json(json!({
                    "available": false,
                    "message": "Specify the time as HH:MM"
                })),
            );
        }
    };
    let duration = payload.event_duration.unwrap_or(2);

    let end = match validate_slot(event_date, event_time, duration, Utc::now().date_naive()) {
        Ok(end) => end,
        Err(err) => {
            return (
                StatusCode::OK,
                Json(json!({
                    "available": false,
                    "message": err.to_string()
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
                    "available": false,
                    "message": "Internal server error"
                })),
            );
        }
    };

    let same_day = match BookingEntity::find()
        .filter(booking::Column::EventDate.eq(event_date))
        .all(&txn)
        .await
    {
        Ok(bookings) => bookings,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "available": false,
                    "message": "Internal server error"
                })),
            );
        }
    };

    let taken = same_day.iter().any(|existing| {
        existing.blocks_slot()
            && slots_overlap(event_time, end, existing.event_time, existing.event_end_time)
    });

    if taken {
        (
            StatusCode::OK,
            Json(json!({
                "available": false,
                "message": "This time is already taken. Try another one"
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "available": true,
                "message": format!("The time is free! The event will last until {}", end.format("%H:%M"))
            })),
        )
    }
}

//Structs
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CheckAvailability {
    event_date: String,
    event_time: String,
    event_duration: Option<i32>,
}
