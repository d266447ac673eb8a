use super::error::*;
use crate::application_port::UserService;
use crate::domain_model::{User, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

// No Debug: carries a plaintext password.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: UserId,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Lookup by username is what a login service calls, so it includes the hash.
#[derive(Serialize)]
pub struct UserCredentialsResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl From<User> for UserCredentialsResponse {
    fn from(user: User) -> Self {
        UserCredentialsResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, warp::Rejection> {
    raw.parse::<UserId>()
        .map_err(|_| reject::custom(ApiErrorCode::InvalidUserId))
}

pub async fn create_user(
    body: CreateUserRequest,
    cancel: CancellationToken,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let id = user_service
        .create(&cancel, &body.username, &body.password, &body.email)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(CreateUserResponse { id })))
}

pub async fn get_user_by_id(
    raw_id: String,
    cancel: CancellationToken,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_id = parse_user_id(&raw_id)?;
    let user = user_service
        .get_by_id(&cancel, user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(UserResponse::from(user))))
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

pub async fn get_user_by_username(
    query: UsernameQuery,
    cancel: CancellationToken,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user = user_service
        .get_by_username(&cancel, &query.username)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(
        UserCredentialsResponse::from(user),
    )))
}

pub async fn delete_user(
    raw_id: String,
    cancel: CancellationToken,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_id = parse_user_id(&raw_id)?;
    user_service
        .delete(&cancel, user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(())))
}
