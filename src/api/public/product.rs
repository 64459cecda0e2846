use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

use crate::entities::product::{self, Category, Entity as ProductEntity};

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", get(get_products))
        .route("/product/:id", get(get_product))
        .layer(Extension(db))
}

async fn get_products(
    Query(params): Query<GetProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };
    let mut half_result = ProductEntity::find().filter(product::Column::IsAvailable.eq(true));

    if let Some(search) = params.search.filter(|value| !value.is_empty()) {
        let search_condition = Condition::any()
            .add(product::Column::Title.contains(search.clone()))
            .add(product::Column::Description.contains(search.clone()))
            .add(product::Column::FullDescription.contains(search));
        half_result = half_result.filter(search_condition);
    }

    if let Some(category) = params.category {
        match Category::from_str(&category) {
            Ok(category) => {
                half_result = half_result.filter(product::Column::Category.eq(category));
            }
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!("Unknown category: {}", category)
                    })),
                )
                    .into_response();
            }
        }
    }

    let result = half_result.all(&txn).await;
    match result {
        Ok(products) => {
            let response: Vec<PublicProductResponse> = products
                .into_iter()
                .map(PublicProductResponse::new)
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            )
                .into_response();
        }
    };
    let result = ProductEntity::find_by_id(id)
        .filter(product::Column::IsAvailable.eq(true))
        .one(&txn)
        .await;
    match result {
        Ok(Some(prod)) => (StatusCode::OK, Json(PublicProductResponse::new(prod))).into_response(),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
            })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error."
            })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct GetProductsQuery {
    search: Option<String>,
    category: Option<String>,
}

#[derive(Serialize)]
struct Nutrition {
    calories: Option<i32>,
    protein: String,
    carbs: String,
}

#[derive(Serialize)]
pub(crate) struct PublicProductResponse {
    id: i32,
    title: String,
    description: String,
    full_description: String,
    price: String,
    category: product::Category,
    image: String,
    ingredients: Vec<String>,
    nutrition: Nutrition,
}

impl PublicProductResponse {
    pub(crate) fn new(value: product::Model) -> PublicProductResponse {
        let ingredients = value.ingredients_list();
        PublicProductResponse {
            id: value.id,
            title: value.title,
            description: value.description,
            full_description: value.full_description,
            price: value.price.to_string(),
            category: value.category,
            image: value.image,
            ingredients,
            nutrition: Nutrition {
                calories: value.calories,
                protein: value.protein,
                carbs: value.carbs,
            },
        }
    }
}
