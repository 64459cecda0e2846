pub mod booking;
pub mod message;
pub mod product;

use axum::{middleware::from_fn_with_state, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use booking::admin_booking_router;
use message::admin_message_router;
use product::admin_product_router;

use crate::entities::user::Role;
use crate::middleware::auth::{auth_middleware, AuthState};

pub fn admin_api_router(db: Arc<DatabaseConnection>) -> Router {
    let admin_product_router = admin_product_router(db.clone());
    let admin_booking_router = admin_booking_router(db.clone());
    let admin_message_router = admin_message_router(db.clone());

    Router::new()
        .nest("/", admin_product_router)
        .nest("/", admin_booking_router)
        .nest("/", admin_message_router)
        .layer(from_fn_with_state(
            AuthState {
                db: db.clone(),
                role: Role::Admin,
            },
            auth_middleware,
        ))
}
