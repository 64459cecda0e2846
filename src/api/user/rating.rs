use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::rating::{
    self, overall_rating, Entity as RatingEntity, CHILD_FRIENDLY_CHOICES, FOOD_TASTE_CHOICES,
    PORTION_SIZE_CHOICES, PRICE_QUALITY_CHOICES, RECOMMEND_CHOICES, SPEED_SERVICE_CHOICES,
    STAFF_FRIENDLINESS_CHOICES,
};
use crate::middleware::auth::Claims;

pub fn rating_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/rate", post(rate_cafe))
        .layer(Extension(db))
}

async fn rate_cafe(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RateCafe>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
    }

    let choices = [
        ("food_taste", &payload.food_taste, &FOOD_TASTE_CHOICES[..]),
        ("portion_size", &payload.portion_size, &PORTION_SIZE_CHOICES[..]),
        ("speed_service", &payload.speed_service, &SPEED_SERVICE_CHOICES[..]),
        (
            "staff_friendliness",
            &payload.staff_friendliness,
            &STAFF_FRIENDLINESS_CHOICES[..],
        ),
        ("price_quality", &payload.price_quality, &PRICE_QUALITY_CHOICES[..]),
        ("child_friendly", &payload.child_friendly, &CHILD_FRIENDLY_CHOICES[..]),
        ("recommend", &payload.recommend, &RECOMMEND_CHOICES[..]),
    ];
    for (field, value, allowed) in choices {
        if !allowed.contains(&value.as_str()) {
            let mut errors = serde_json::Map::new();
            errors.insert(
                field.to_string(),
                json!([{ "message": format!("Unknown value: {}", value) }]),
            );
            return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors })));
        }
    }

    let overall = overall_rating(
        payload.food_quality,
        payload.service_quality,
        payload.atmosphere,
        payload.cleanliness,
    );

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

    let new_rating = rating::ActiveModel {
        user_id: Set(claims.user_id),
        food_quality: Set(payload.food_quality),
        service_quality: Set(payload.service_quality),
        atmosphere: Set(payload.atmosphere),
        cleanliness: Set(payload.cleanliness),
        food_taste: Set(payload.food_taste),
        portion_size: Set(payload.portion_size),
        speed_service: Set(payload.speed_service),
        staff_friendliness: Set(payload.staff_friendliness),
        price_quality: Set(payload.price_quality),
        child_friendly: Set(payload.child_friendly),
        recommend: Set(payload.recommend),
        comment: Set(payload.comment),
        overall_rating: Set(overall),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match RatingEntity::insert(new_rating).exec(&txn).await {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Thank you for your review!",
                    "overall_rating": overall
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

//Structs
#[derive(Deserialize, Debug, Validate)]
struct RateCafe {
    #[validate(range(min = 1, max = 5, message = "Stars are rated 1 to 5"))]
    food_quality: i32,
    #[validate(range(min = 1, max = 5, message = "Stars are rated 1 to 5"))]
    service_quality: i32,
    #[validate(range(min = 1, max = 5, message = "Stars are rated 1 to 5"))]
    atmosphere: i32,
    #[validate(range(min = 1, max = 5, message = "Stars are rated 1 to 5"))]
    cleanliness: i32,
    food_taste: String,
    portion_size: String,
    speed_service: String,
    staff_friendliness: String,
    price_quality: String,
    child_friendly: String,
    recommend: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Comment is limited to 500 characters"))]
    comment: String,
}
