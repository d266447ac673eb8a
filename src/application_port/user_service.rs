use crate::domain_model::{User, UserId};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("email not valid")]
    InvalidEmail,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("username already exists")]
    UsernameAlreadyExists,
    #[error("user not found")]
    UserNotFound,
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("operation cancelled")]
    Cancelled,
    #[error("{0} timed out")]
    Timeout(&'static str),
}

impl UserError {
    /// True when the caller supplied bad input or hit a conflict, as opposed to
    /// an internal fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UserError::InvalidEmail
                | UserError::EmailAlreadyExists
                | UserError::UsernameAlreadyExists
                | UserError::UserNotFound
        )
    }
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, UserError>;
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn create(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserId, UserError>;

    async fn get_by_id(&self, cancel: &CancellationToken, user_id: UserId)
    -> Result<User, UserError>;

    async fn get_by_username(
        &self,
        cancel: &CancellationToken,
        username: &str,
    ) -> Result<User, UserError>;

    async fn delete(&self, cancel: &CancellationToken, user_id: UserId) -> Result<(), UserError>;
}
