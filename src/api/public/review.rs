use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

use crate::entities::rating::{self, Entity as RatingEntity};

pub fn review_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/reviews", get(get_reviews))
        .layer(Extension(db))
}

async fn get_reviews(Extension(db): Extension<Arc<DatabaseConnection>>) -> impl IntoResponse {
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

    let ratings = match RatingEntity::find()
        .order_by_desc(rating::Column::CreatedAt)
        .all(&txn)
        .await
    {
        Ok(ratings) => ratings,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let averages = if ratings.is_empty() {
        json!(null)
    } else {
        let count = ratings.len() as f64;
        let total_food: i32 = ratings.iter().map(|r| r.food_quality).sum();
        let total_service: i32 = ratings.iter().map(|r| r.service_quality).sum();
        let total_atmosphere: i32 = ratings.iter().map(|r| r.atmosphere).sum();
        let total_cleanliness: i32 = ratings.iter().map(|r| r.cleanliness).sum();
        let total = total_food + total_service + total_atmosphere + total_cleanliness;

        json!({
            "food_quality": total_food as f64 / count,
            "service_quality": total_service as f64 / count,
            "atmosphere": total_atmosphere as f64 / count,
            "cleanliness": total_cleanliness as f64 / count,
            "overall": total as f64 / (count * 4.0)
        })
    };

    let total_reviews = ratings.len();
    (
        StatusCode::OK,
        Json(json!({
            "ratings": ratings,
            "averages": averages,
            "total_reviews": total_reviews
        })),
    )
}
