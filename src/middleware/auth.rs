use crate::entities::user::{self, Entity as UserEntity, Role};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use dotenvy::dotenv;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc};
use thiserror::Error;

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let db = state.db;
    let role = state.role;

    let token = match bearer_token(req.headers()) {
        Some(token) => token,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    let claims: Claims = match validate_token(db.clone(), &token, role).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub role: String,
    pub exp: usize,
}

#[derive(Clone, Debug)]
pub struct AuthState {
    pub db: Arc<DatabaseConnection>,
    pub role: Role,
}

pub async fn generate_token(user_id: i32, role: String) -> Result<String, AuthMiddlewareError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or(AuthMiddlewareError::GenerationFail)?
        .timestamp() as usize;

    let claims = Claims { user_id, role, exp };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_secret_key().as_bytes()),
    )
    .map_err(|_| AuthMiddlewareError::GenerationFail)
}

pub async fn validate_token(
    db: Arc<DatabaseConnection>,
    token: &str,
    req_role: Role,
) -> Result<Claims, AuthMiddlewareError> {
    let claims = decode_claims(token)?;

    let role = Role::from_str(&claims.role)
        .map_err(|_| AuthMiddlewareError::InvalidUserOrRole)?;

    match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(model)) if model.role == role => {
            if role == req_role {
                Ok(claims)
            } else {
                Err(AuthMiddlewareError::InvalidUserOrRole)
            }
        }
        Ok(_) => Err(AuthMiddlewareError::InvalidUserOrRole),
        Err(_) => Err(AuthMiddlewareError::InternalServerError),
    }
}

// For endpoints that work for guests but link the account when a valid
// token is present (contact form, order checkout).
pub async fn optional_user(
    db: Arc<DatabaseConnection>,
    headers: &HeaderMap,
) -> Option<user::Model> {
    let token = bearer_token(headers)?;
    let claims = decode_claims(&token).ok()?;
    let role = Role::from_str(&claims.role).ok()?;

    match UserEntity::find_by_id(claims.user_id).one(&*db).await {
        Ok(Some(model)) if model.role == role => Some(model),
        _ => None,
    }
}

fn decode_claims(token: &str) -> Result<Claims, AuthMiddlewareError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_secret_key().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthMiddlewareError::TokenExpired)
}

// Password reset tokens ride on the same secret but carry a purpose tag,
// so a login token can never be replayed as a reset token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResetClaims {
    pub user_id: i32,
    pub purpose: String,
    pub exp: usize,
}

const RESET_PURPOSE: &str = "password_reset";

pub fn generate_reset_token(user_id: i32) -> Result<String, AuthMiddlewareError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::hours(1))
        .ok_or(AuthMiddlewareError::GenerationFail)?
        .timestamp() as usize;

    let claims = ResetClaims {
        user_id,
        purpose: RESET_PURPOSE.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_secret_key().as_bytes()),
    )
    .map_err(|_| AuthMiddlewareError::GenerationFail)
}

pub fn validate_reset_token(token: &str) -> Result<i32, AuthMiddlewareError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(get_secret_key().as_bytes()),
        &validation,
    )
    .map_err(|_| AuthMiddlewareError::TokenExpired)?;

    if data.claims.purpose != RESET_PURPOSE {
        return Err(AuthMiddlewareError::ValidationFail);
    }
    Ok(data.claims.user_id)
}

#[derive(Error, Debug)]
pub enum AuthMiddlewareError {
    #[error("Invalid user id or role")]
    InvalidUserOrRole,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to validate token")]
    ValidationFail,
    #[error("Failed to generate token")]
    GenerationFail,
    #[error("Internal server error")]
    InternalServerError,
}

fn get_secret_key() -> String {
    dotenv().ok();
    std::env::var("SECRET").expect("SECRET not found in .env file")
}
