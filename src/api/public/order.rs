use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::{
    cart::{self, Entity as CartEntity},
    delivery_info::{delivery_price, DeliveryCity},
    order::{self, DeliveryMethod, Entity as OrderEntity, PaymentMethod},
    order_item::{self, Entity as OrderItemEntity},
    product,
};
use crate::middleware::auth::optional_user;
use crate::middleware::logging::{to_response, ApiError};
use crate::middleware::session::SessionKey;
use crate::validation::{format_phone, validate_phone};

pub fn order_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/order", post(create_order))
        .route("/order/last", get(last_order))
        .layer(Extension(db))
}

async fn create_order(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(session): Extension<SessionKey>,
    headers: HeaderMap,
    Json(payload): Json<CreateOrder>,
) -> Response {
    if let Err(errors) = payload.validate() {
        return to_response(
            (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))),
            Err(ApiError::ValidationFail("order payload".to_string())),
        );
    }

    if let Err(message) = validate_phone(&payload.customer_phone) {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "errors": { "customer_phone": [{ "message": message }] }
                })),
            ),
            Err(ApiError::ValidationFail("customer_phone".to_string())),
        );
    }

    // counted in characters, the address is usually Cyrillic
    if payload.delivery_method == DeliveryMethod::Delivery
        && payload.customer_address.chars().count() < 10
    {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "errors": { "customer_address": [{
                        "message": "Delivery address should be at least 10 characters"
                    }] }
                })),
            ),
            Err(ApiError::ValidationFail("customer_address".to_string())),
        );
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::TransactionCreationFailed),
            );
        }
    };

    let entries = match CartEntity::find()
        .filter(cart::Column::SessionKey.eq(session.0.clone()))
        .find_also_related(product::Entity)
        .all(&txn)
        .await
    {
        Ok(entries) => entries,
        Err(err) => {
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    // unavailable products are skipped, like the cart view drops them
    let mut total_price = Decimal::ZERO;
    let mut items = Vec::new();
    for (entry, maybe_product) in entries {
        if let Some(prod) = maybe_product.filter(|prod| prod.is_available) {
            total_price += prod.price * Decimal::from(entry.quantity);
            items.push((prod, entry.quantity));
        }
    }

    if items.is_empty() {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Cart is empty"
                })),
            ),
            Err(ApiError::General("Cart is empty".to_string())),
        );
    }

    let (stored_city, stored_distance) = super::cart::stored_delivery(&txn, &session.0).await;
    let city = payload
        .delivery_city
        .as_deref()
        .map(DeliveryCity::parse_or_other)
        .unwrap_or(stored_city);
    let distance = payload.delivery_distance.unwrap_or(stored_distance).max(0);

    let delivery = match payload.delivery_method {
        DeliveryMethod::Delivery => delivery_price(city, distance),
        DeliveryMethod::Pickup => Decimal::ZERO,
    };
    let final_total = total_price + delivery;

    let user = optional_user(db.clone(), &headers).await;
    let customer_phone = format_phone(&payload.customer_phone);

    let new_order = order::ActiveModel {
        user_id: Set(user.map(|model| model.id)),
        session_key: Set(session.0.clone()),
        customer_name: Set(payload.customer_name),
        customer_phone: Set(customer_phone.clone()),
        customer_address: Set(payload.customer_address),
        payment_method: Set(payload.payment_method),
        delivery_method: Set(payload.delivery_method),
        delivery_city: Set(city),
        delivery_distance: Set(distance),
        delivery_price: Set(delivery),
        total_price: Set(final_total),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let order_id = match OrderEntity::insert(new_order).exec(&txn).await {
        Ok(result) => result.last_insert_id,
        Err(err) => {
            let _ = txn.rollback().await;
            return to_response(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                ),
                Err(ApiError::DbError(err.to_string())),
            );
        }
    };

    let order_items: Vec<order_item::ActiveModel> = items
        .into_iter()
        .map(|(prod, quantity)| order_item::ActiveModel {
            order_id: Set(order_id),
            product_id: Set(Some(prod.id)),
            product_title: Set(prod.title),
            product_price: Set(prod.price),
            quantity: Set(quantity),
            ..Default::default()
        })
        .collect();

    if let Err(err) = OrderItemEntity::insert_many(order_items).exec(&txn).await {
        let _ = txn.rollback().await;
        return to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
            Err(ApiError::DbError(err.to_string())),
        );
    }

    // order placed, the cart is spent
    let _ = CartEntity::delete_many()
        .filter(cart::Column::SessionKey.eq(session.0))
        .exec(&txn)
        .await;

    match txn.commit().await {
        Ok(_) => to_response(
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": format!(
                        "Order #{} created. We will call {} to confirm it.",
                        order_id, customer_phone
                    ),
                    "order_id": order_id
                })),
            ),
            Ok(()),
        ),
        Err(err) => to_response(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            ),
            Err(ApiError::DbError(err.to_string())),
        ),
    }
}

async fn last_order(
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

    let order = match OrderEntity::find()
        .filter(order::Column::SessionKey.eq(session.0))
        .order_by_desc(order::Column::Id)
        .one(&txn)
        .await
    {
        Ok(Some(order)) => order,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "No order was found for this session"
                })),
            );
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

    let items = match OrderItemEntity::find()
        .filter(order_item::Column::OrderId.eq(order.id))
        .all(&txn)
        .await
    {
        Ok(items) => items,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error"
                })),
            );
        }
    };

    let total_price: Decimal = items.iter().map(|item| item.line_total()).sum();
    let items: Vec<serde_json::Value> = items
        .into_iter()
        .map(|item| {
            json!({
                "product_id": item.product_id,
                "product_title": item.product_title,
                "product_price": item.product_price.to_string(),
                "quantity": item.quantity,
                "total": item.line_total().to_string()
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "order": {
                "id": order.id,
                "customer_name": order.customer_name,
                "customer_phone": order.customer_phone,
                "customer_address": order.customer_address,
                "payment_method": order.payment_method,
                "delivery_method": order.delivery_method,
                "delivery_city": order.delivery_city,
                "delivery_distance": order.delivery_distance,
                "created_at": order.created_at,
            },
            "items": items,
            "total_price": total_price.to_string(),
            "delivery_price": order.delivery_price.to_string(),
            "final_total": order.total_price.to_string()
        })),
    )
}

//Structs
#[derive(Deserialize, Debug, Validate)]
struct CreateOrder {
    #[validate(length(min = 2, message = "Name should be at least 2 characters"))]
    customer_name: String,
    customer_phone: String,
    #[serde(default)]
    customer_address: String,
    payment_method: PaymentMethod,
    delivery_method: DeliveryMethod,
    delivery_city: Option<String>,
    delivery_distance: Option<i32>,
}
