use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let code = if let Some(code) = err.find::<ApiErrorCode>() {
        code.clone()
    } else if err.is_not_found() {
        ApiErrorCode::NotFound
    } else if err.find::<warp::filters::body::BodyDeserializeError>().is_some()
        || err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::reject::UnsupportedMediaType>().is_some()
        || err.find::<warp::reject::MissingHeader>().is_some()
        || err.find::<warp::reject::LengthRequired>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        ApiErrorCode::InvalidArgument
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        ApiErrorCode::MethodNotAllowed
    } else {
        warn!("Unhandled rejection: {:?}", err);
        ApiErrorCode::InternalError
    };

    let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
    Ok(warp::reply::with_status(json, code.status()))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Malformed request")]
    InvalidArgument,
    #[error("Malformed user id")]
    InvalidUserId,
    #[error("Email is not valid")]
    InvalidEmail,
    #[error("Email already taken")]
    EmailTaken,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Request cancelled")]
    Cancelled,
    #[error("Request timed out")]
    Timeout,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidArgument
            | ApiErrorCode::InvalidUserId
            | ApiErrorCode::InvalidEmail => StatusCode::BAD_REQUEST,
            ApiErrorCode::EmailTaken | ApiErrorCode::UsernameTaken => StatusCode::CONFLICT,
            ApiErrorCode::UserNotFound | ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<UserError> for ApiErrorCode {
    fn from(error: UserError) -> Self {
        if !error.is_client_error() {
            warn!("user request failed: {}", error);
        }

        match error {
            UserError::InvalidEmail => ApiErrorCode::InvalidEmail,
            UserError::EmailAlreadyExists => ApiErrorCode::EmailTaken,
            UserError::UsernameAlreadyExists => ApiErrorCode::UsernameTaken,
            UserError::UserNotFound => ApiErrorCode::UserNotFound,
            UserError::Cancelled => ApiErrorCode::Cancelled,
            UserError::Timeout(_) => ApiErrorCode::Timeout,
            UserError::Hashing(_) | UserError::Storage(_) => ApiErrorCode::InternalError,
        }
    }
}
