pub mod auth;
pub mod booking;
pub mod cart;
pub mod contact;
pub mod order;
pub mod product;
pub mod review;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use auth::auth_router;
use booking::booking_check_router;
use cart::cart_router;
use contact::contact_router;
use order::order_router;
use product::product_router;
use review::review_router;

pub fn public_api_router(db: Arc<DatabaseConnection>) -> Router {
    let auth_router = auth_router(db.clone());
    let product_router = product_router(db.clone());
    let cart_router = cart_router(db.clone());
    let order_router = order_router(db.clone());
    let booking_check_router = booking_check_router(db.clone());
    let review_router = review_router(db.clone());
    let contact_router = contact_router(db.clone());

    Router::new()
        .nest("/", auth_router)
        .nest("/", product_router)
        .nest("/", cart_router)
        .nest("/", order_router)
        .nest("/", booking_check_router)
        .nest("/", review_router)
        .nest("/", contact_router)
}
