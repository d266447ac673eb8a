use crate::domain_model::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepoError {
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("username already exists")]
    UsernameAlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("store error: {0}")]
    Store(String),
}

/// Durable storage of user records.
///
/// Uniqueness of `email` and `username` is enforced by the store itself and
/// reported through the conflict variants; callers never pre-check it.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Inserts a new record under a freshly generated id. `email` must already
    /// be normalized.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserId, UserRepoError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<User, UserRepoError>;

    async fn get_by_username(&self, username: &str) -> Result<User, UserRepoError>;

    /// Succeeds whether or not a record existed.
    async fn delete(&self, user_id: UserId) -> Result<(), UserRepoError>;
}
