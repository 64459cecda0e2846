use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::entities::booking::{
    self, calculate_costs, slots_overlap, validate_slot, Entity as BookingEntity, EventType,
    SlotError, Status,
};
use crate::middleware::auth::Claims;
use crate::validation::{format_phone, validate_phone};

pub fn booking_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/booking", post(create_booking))
        .route("/booking/:id/cancel", post(cancel_booking))
        .layer(Extension(db))
}

async fn create_booking(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BookingRequest>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "errors": errors })),
        );
    }

    if let Err(message) = validate_phone(&payload.phone) {
        return field_error("phone", &message);
    }

    let event_date = match NaiveDate::parse_from_str(&payload.event_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => return field_error("eventDate", "Specify the date as YYYY-MM-DD"),
    };
    let event_time = match NaiveTime::parse_from_str(&payload.event_time, "%H:%M") {
        Ok(time) => time,
        Err(_) => return field_error("eventTime", "Specify the time as HH:MM"),
    };
    let event_type = match EventType::from_str(&payload.event_type) {
        Ok(event_type) => event_type,
        Err(_) => return field_error("eventType", "Unknown event type"),
    };

    let end = match validate_slot(
        event_date,
        event_time,
        payload.event_duration,
        Utc::now().date_naive(),
    ) {
        Ok(end) => end,
        Err(err) => return field_error(slot_error_field(&err), &err.to_string()),
    };

    // availability check and insert share the transaction, so a parallel
    // request cannot slip in between them on the same connection
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error"
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
                    "success": false,
                    "error": "Internal server error"
                })),
            );
        }
    };

    let taken = same_day.iter().any(|existing| {
        existing.blocks_slot()
            && slots_overlap(event_time, end, existing.event_time, existing.event_end_time)
    });
    if taken {
        return field_error(
            "eventTime",
            "This time is already taken. Please pick another one.",
        );
    }

    let costs = calculate_costs(payload.event_duration, &payload.services);
    let phone = format_phone(&payload.phone);
    let now = Utc::now();

    let new_booking = booking::ActiveModel {
        user_id: Set(claims.user_id),
        event_date: Set(event_date),
        event_time: Set(event_time),
        event_duration: Set(payload.event_duration),
        event_end_time: Set(end),
        guests_count: Set(payload.guests_count),
        event_type: Set(event_type),
        services: Set(json!(payload.services)),
        phone: Set(phone.clone()),
        comments: Set(payload.comments),
        status: Set(Status::Pending),
        base_cost: Set(costs.base),
        services_cost: Set(costs.services),
        total_cost: Set(costs.total),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match BookingEntity::insert(new_booking).exec(&txn).await {
        Ok(result) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": format!(
                        "Booking #{} created! We will call {} to confirm it.",
                        result.last_insert_id, phone
                    ),
                    "booking_id": result.last_insert_id
                })),
            ),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error"
                })),
            ),
        },
        Err(_) => {
            let _ = txn.rollback().await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error"
                })),
            )
        }
    }
}

async fn cancel_booking(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Internal server error"
                })),
            );
        }
    };

    match BookingEntity::find_by_id(id)
        .filter(booking::Column::UserId.eq(claims.user_id))
        .one(&txn)
        .await
    {
        Ok(Some(model)) if model.status == Status::Pending => {
            let mut model: booking::ActiveModel = model.into();
            model.status = Set(Status::Cancelled);
            model.updated_at = Set(Utc::now());
            match model.update(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "success": true,
                            "message": "Booking cancelled"
                        })),
                    )
                }
                Err(_) => {
                    let _ = txn.rollback().await;
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "success": false,
                            "error": "Internal server error"
                        })),
                    )
                }
            }
        }
        Ok(Some(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Only pending bookings can be cancelled"
            })),
        ),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": format!("No booking with {} id was found.", id)
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "Internal server error"
            })),
        ),
    }
}

//utilities
fn field_error(field: &str, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    let mut errors = serde_json::Map::new();
    errors.insert(field.to_string(), json!([{ "message": message }]));
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "errors": errors
        })),
    )
}

fn slot_error_field(err: &SlotError) -> &'static str {
    match err {
        SlotError::DateInPast | SlotError::TooFarAhead => "eventDate",
        SlotError::BadDuration => "eventDuration",
        _ => "eventTime",
    }
}

//Structs
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
struct BookingRequest {
    event_date: String,
    event_time: String,
    #[serde(default = "default_duration")]
    event_duration: i32,
    #[validate(range(min = 1, max = 50, message = "Guests count should be between 1 and 50"))]
    guests_count: i32,
    event_type: String,
    phone: String,
    #[serde(default)]
    comments: String,
    #[serde(default)]
    services: Vec<String>,
}

fn default_duration() -> i32 {
    2
}
