use crate::application_port::{CredentialHasher, UserError, UserService};
use crate::domain_model::{Email, User, UserId};
use crate::domain_port::{UserRepo, UserRepoError};
use crate::logger::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    request_timeout: Duration,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        request_timeout: Duration,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            credential_hasher,
            request_timeout,
        }
    }

    /// Runs `fut` until it completes, the caller cancels, or the request
    /// timeout elapses. The losing future is dropped, abandoning any in-flight
    /// query.
    async fn bounded<T, F>(
        &self,
        cancel: &CancellationToken,
        op: &'static str,
        fut: F,
    ) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>> + Send,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(op, "operation cancelled by caller");
                Err(UserError::Cancelled)
            }
            res = tokio::time::timeout(self.request_timeout, fut) => {
                res.map_err(|_| UserError::Timeout(op))?
            }
        }
    }

    async fn create_inner(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserId, UserError> {
        let email = Email::parse(email).map_err(|_| UserError::InvalidEmail)?;

        let password_hash = self.credential_hasher.hash_password(password).await?;

        let user_id = self
            .user_repo
            .create(username, &password_hash, email.as_str())
            .await
            .map_err(|e| match e {
                UserRepoError::EmailAlreadyExists => UserError::EmailAlreadyExists,
                UserRepoError::UsernameAlreadyExists => UserError::UsernameAlreadyExists,
                other => storage_error(other),
            })?;

        info!(%user_id, username, "user created");
        Ok(user_id)
    }
}

fn lookup_error(err: UserRepoError) -> UserError {
    match err {
        UserRepoError::NotFound => UserError::UserNotFound,
        other => storage_error(other),
    }
}

fn storage_error(err: UserRepoError) -> UserError {
    match err {
        UserRepoError::Store(context) => UserError::Storage(context),
        other => UserError::Storage(other.to_string()),
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn create(
        &self,
        cancel: &CancellationToken,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<UserId, UserError> {
        self.bounded(cancel, "create", self.create_inner(username, password, email))
            .await
    }

    async fn get_by_id(
        &self,
        cancel: &CancellationToken,
        user_id: UserId,
    ) -> Result<User, UserError> {
        self.bounded(cancel, "get_by_id", async {
            self.user_repo.get_by_id(user_id).await.map_err(lookup_error)
        })
        .await
    }

    async fn get_by_username(
        &self,
        cancel: &CancellationToken,
        username: &str,
    ) -> Result<User, UserError> {
        self.bounded(cancel, "get_by_username", async {
            self.user_repo
                .get_by_username(username)
                .await
                .map_err(lookup_error)
        })
        .await
    }

    async fn delete(&self, cancel: &CancellationToken, user_id: UserId) -> Result<(), UserError> {
        self.bounded(cancel, "delete", async {
            self.user_repo
                .delete(user_id)
                .await
                .map_err(storage_error)?;
            debug!(%user_id, "user deleted");
            Ok(())
        })
        .await
    }
}
