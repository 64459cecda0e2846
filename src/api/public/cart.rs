use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::entities::{
    cart::{self, Entity as CartEntity},
    delivery_info::{self, delivery_price, DeliveryCity, Entity as DeliveryInfoEntity},
    product,
};
use crate::middleware::session::SessionKey;

pub fn cart_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/cart", get(get_cart).post(add_product).delete(clear_cart))
        .route("/cart/delivery", post(update_delivery))
        .route(
            "/cart/:product_id",
            patch(patch_entry).delete(remove_product),
        )
        .layer(Extension(db))
}

async fn get_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
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

    let entries = match CartEntity::find()
        .filter(cart::Column::SessionKey.eq(session.0.clone()))
        .find_also_related(product::Entity)
        .all(&txn)
        .await
    {
        Ok(entries) => entries,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error."
                })),
            )
                .into_response();
        }
    };

    let mut items = Vec::new();
    let mut total_price = Decimal::ZERO;
    let mut cart_count: u32 = 0;

    for (entry, maybe_product) in entries {
        match maybe_product.filter(|prod| prod.is_available) {
            Some(prod) => {
                let line_total = prod.price * Decimal::from(entry.quantity);
                total_price += line_total;
                cart_count += entry.quantity;
                items.push(CartItem {
                    product: CartProduct {
                        id: prod.id,
                        title: prod.title,
                        price: prod.price.to_string(),
                        image: prod.image,
                    },
                    quantity: entry.quantity,
                    total: line_total.to_string(),
                });
            }
            None => {
                // product vanished or was disabled, drop the entry silently
                let entry: cart::ActiveModel = entry.into();
                let _ = entry.delete(&txn).await;
            }
        }
    }

    let (city, distance) = stored_delivery(&txn, &session.0).await;
    let delivery = delivery_price(city, distance);

    match txn.commit().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "items": items,
                "cart_count": cart_count,
                "total_price": total_price.to_string(),
                "delivery_city": city,
                "delivery_distance": distance,
                "delivery_price": delivery.to_string(),
                "final_total": (total_price + delivery).to_string()
            })),
        )
            .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error"
            })),
        )
            .into_response(),
    }
}

async fn add_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
    Json(payload): Json<AddProduct>,
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

    if payload.quantity == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Quantity should be greater than 0"
            })),
        );
    }

    match product::Entity::find_by_id(payload.product_id)
        .filter(product::Column::IsAvailable.eq(true))
        .one(&txn)
        .await
    {
        Ok(Some(_)) => {
            if let Ok(Some(entry)) = CartEntity::find()
                .filter(cart::Column::ProductId.eq(payload.product_id))
                .filter(cart::Column::SessionKey.eq(session.0.clone()))
                .one(&txn)
                .await
            {
                let mut entry: cart::ActiveModel = entry.into();
                entry.quantity = Set(entry.quantity.unwrap() + payload.quantity);
                return match entry.update(&txn).await {
                    Ok(_) => {
                        let _ = txn.commit().await;
                        (
                            StatusCode::OK,
                            Json(json!({
                                "message": "Resource patched successfully"
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
                };
            };
            let new_entry = cart::ActiveModel {
                session_key: Set(session.0),
                product_id: Set(payload.product_id),
                quantity: Set(payload.quantity),
                ..Default::default()
            };
            match CartEntity::insert(new_entry).exec(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => (
                        StatusCode::CREATED,
                        Json(json!({
                            "message": "Added successfully"
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
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No product with {} id was found", payload.product_id)
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

async fn patch_entry(
    Path(product_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
    Json(payload): Json<PatchCart>,
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

    match CartEntity::find()
        .filter(cart::Column::ProductId.eq(product_id))
        .filter(cart::Column::SessionKey.eq(session.0))
        .one(&txn)
        .await
    {
        Ok(Some(entry)) => {
            let mut entry: cart::ActiveModel = entry.into();

            let result: Result<(), DbErr> = match payload.quantity {
                0 => entry.delete(&txn).await.map(|_| ()),
                quantity => {
                    entry.quantity = Set(quantity);
                    entry.update(&txn).await.map(|_| ())
                }
            };
            match result {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource patched successfully"
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
                "error": format!("No cart entry for product {} was found.", product_id)
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

async fn remove_product(
    Path(product_id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
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

    match CartEntity::find()
        .filter(cart::Column::ProductId.eq(product_id))
        .filter(cart::Column::SessionKey.eq(session.0))
        .one(&txn)
        .await
    {
        Ok(Some(entry)) => {
            let entry: cart::ActiveModel = entry.into();
            match entry.delete(&txn).await {
                Ok(_) => {
                    let _ = txn.commit().await;
                    (
                        StatusCode::OK,
                        Json(json!({
                            "message": "Resource deleted successfully"
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
            }
        }
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("No cart entry for product {} was found.", product_id)
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

async fn clear_cart(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
) -> impl IntoResponse {
    match CartEntity::delete_many()
        .filter(cart::Column::SessionKey.eq(session.0))
        .exec(&*db)
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "message": "Cart cleared"
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

async fn update_delivery(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
    Json(payload): Json<UpdateDelivery>,
) -> impl IntoResponse {
    let city = DeliveryCity::parse_or_other(&payload.city);
    let distance = payload.distance.unwrap_or(0).max(0);

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

    let result = match DeliveryInfoEntity::find()
        .filter(delivery_info::Column::SessionKey.eq(session.0.clone()))
        .one(&txn)
        .await
    {
        Ok(Some(info)) => {
            let mut info: delivery_info::ActiveModel = info.into();
            info.city = Set(city);
            info.distance_km = Set(distance);
            info.update(&txn).await.map(|_| ())
        }
        Ok(None) => {
            let info = delivery_info::ActiveModel {
                session_key: Set(session.0),
                city: Set(city),
                distance_km: Set(distance),
                ..Default::default()
            };
            DeliveryInfoEntity::insert(info).exec(&txn).await.map(|_| ())
        }
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    match result {
        Ok(_) => match txn.commit().await {
            Ok(_) => (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "delivery_price": delivery_price(city, distance).to_string(),
                    "city_name": city.display_name()
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

// Stored selection for the session, falling back to the main city.
pub(crate) async fn stored_delivery<C: sea_orm::ConnectionTrait>(
    conn: &C,
    session_key: &str,
) -> (DeliveryCity, i32) {
    match DeliveryInfoEntity::find()
        .filter(delivery_info::Column::SessionKey.eq(session_key))
        .one(conn)
        .await
    {
        Ok(Some(info)) => (info.city, info.distance_km),
        _ => (DeliveryCity::Tula, 0),
    }
}

//Structs
#[derive(Deserialize, Debug)]
struct AddProduct {
    product_id: i32,
    quantity: u32,
}

#[derive(Deserialize)]
struct PatchCart {
    quantity: u32,
}

#[derive(Deserialize)]
struct UpdateDelivery {
    city: String,
    distance: Option<i32>,
}

#[derive(Serialize)]
struct CartProduct {
    id: i32,
    title: String,
    price: String,
    image: String,
}

#[derive(Serialize)]
struct CartItem {
    product: CartProduct,
    quantity: u32,
    total: String,
}
