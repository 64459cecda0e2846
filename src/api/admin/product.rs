use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;

use crate::entities::product::{self, Category, Entity as ProductEntity};

//ROUTERS
pub fn admin_product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", post(create_product).get(list_products))
        .route(
            "/product/:id",
            axum::routing::get(admin_get_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .layer(Extension(db))
}

//ROUTES
// Unlike the public listing this one includes hidden products.
async fn list_products(
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match ProductEntity::find().all(&*db).await {
        Ok(products) => (StatusCode::OK, Json(json!({ "products": products }))),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        ),
    }
}

async fn admin_get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> impl IntoResponse {
    match ProductEntity::find_by_id(id).one(&*db).await {
        Ok(Some(model)) => (StatusCode::OK, Json(json!(model))),
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
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

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> impl IntoResponse {
    let category = match Category::from_str(&payload.category) {
        Ok(category) => category,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": message
                })),
            );
        }
    };
    let price = match Decimal::try_from(payload.price) {
        Ok(price) if price >= Decimal::ZERO => price,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Price must be a non-negative number"
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

    let new_product = product::ActiveModel {
        title: Set(payload.title),
        description: Set(payload.description),
        full_description: Set(payload.full_description.unwrap_or_default()),
        price: Set(price),
        category: Set(category),
        image: Set(payload.image.unwrap_or_default()),
        ingredients: Set(payload.ingredients.unwrap_or_default()),
        calories: Set(payload.calories),
        protein: Set(payload.protein.unwrap_or_default()),
        carbs: Set(payload.carbs.unwrap_or_default()),
        is_available: Set(payload.is_available.unwrap_or(true)),
        ..Default::default()
    };

    match ProductEntity::insert(new_product).exec(&txn).await {
        Ok(result) => match txn.commit().await {
            Ok(_) => (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Product created successfully",
                    "product_id": result.last_insert_id
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
            tracing::debug!(error = %err, "Product insert failed");
            let _ = txn.rollback().await;
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Product already exists"
                })),
            )
        }
    }
}

async fn patch_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<PatchProductPayload>,
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
    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(model)) => {
            let mut model: product::ActiveModel = model.into();

            if let Some(title) = payload.title {
                model.title = Set(title);
            }

            if let Some(price) = payload.price {
                match Decimal::try_from(price) {
                    Ok(price) if price >= Decimal::ZERO => model.price = Set(price),
                    _ => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({
                                "error": "Price must be a non-negative number"
                            })),
                        );
                    }
                }
            }

            if let Some(description) = payload.description {
                model.description = Set(description);
            }

            if let Some(full_description) = payload.full_description {
                model.full_description = Set(full_description);
            }

            if let Some(category) = payload.category {
                match Category::from_str(&category) {
                    Ok(category) => model.category = Set(category),
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

            if let Some(image) = payload.image {
                model.image = Set(image);
            }

            if let Some(ingredients) = payload.ingredients {
                model.ingredients = Set(ingredients);
            }

            if let Some(calories) = payload.calories {
                model.calories = Set(Some(calories));
            }

            if let Some(protein) = payload.protein {
                model.protein = Set(protein);
            }

            if let Some(carbs) = payload.carbs {
                model.carbs = Set(carbs);
            }

            if let Some(is_available) = payload.is_available {
                model.is_available = Set(is_available);
            }

            let result = model.update(&txn).await;
            match result {
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
                    //DB Failed / unique constraint
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
                "error": format!("No product with {} id was found.", id)
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

async fn delete_product(
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
        }
    };
    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(model)) => match model.delete(&txn).await {
            Ok(_) => {
                let _ = txn.commit().await;
                (
                    StatusCode::OK,
                    Json(json!({
                        "message": "Resource deleted successfully."
                    })),
                )
            }
            Err(_) => {
                let _ = txn.rollback().await;
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "Failed to delete this resource"
                    })),
                )
            }
        },
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No product with {} id was found.", id)
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
#[derive(Deserialize, Clone, Debug)]
struct CreateProduct {
    title: String,
    description: String,
    full_description: Option<String>,
    price: f64,
    category: String,
    image: Option<String>,
    ingredients: Option<String>,
    calories: Option<i32>,
    protein: Option<String>,
    carbs: Option<String>,
    is_available: Option<bool>,
}

#[derive(Deserialize)]
struct PatchProductPayload {
    title: Option<String>,
    description: Option<String>,
    full_description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    image: Option<String>,
    ingredients: Option<String>,
    calories: Option<i32>,
    protein: Option<String>,
    carbs: Option<String>,
    is_available: Option<bool>,
}
