use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
    by_username: HashMap<String, UserId>,
}

/// Process-local user store with the same uniqueness and not-found contract
/// as the relational adapter.
#[derive(Default)]
pub struct MemoryUserRepo {
    tables: Mutex<Tables>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, UserRepoError> {
        self.tables
            .lock()
            .map_err(|e| UserRepoError::Store(format!("memory store poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserId, UserRepoError> {
        let mut tables = self.lock()?;

        if tables.by_email.contains_key(email) {
            return Err(UserRepoError::EmailAlreadyExists);
        }
        if tables.by_username.contains_key(username) {
            return Err(UserRepoError::UsernameAlreadyExists);
        }

        let user_id = UserId::new_v4();
        if tables.users.contains_key(&user_id) {
            return Err(UserRepoError::Store(format!(
                "create user {username}: duplicate id {user_id}"
            )));
        }

        tables.by_email.insert(email.to_owned(), user_id);
        tables.by_username.insert(username.to_owned(), user_id);
        tables.users.insert(
            user_id,
            User {
                id: user_id,
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash: password_hash.to_owned(),
            },
        );

        Ok(user_id)
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, UserRepoError> {
        self.lock()?
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserRepoError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, UserRepoError> {
        let tables = self.lock()?;
        tables
            .by_username
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned()
            .ok_or(UserRepoError::NotFound)
    }

    async fn delete(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let mut tables = self.lock()?;
        if let Some(user) = tables.users.remove(&user_id) {
            tables.by_email.remove(&user.email);
            tables.by_username.remove(&user.username);
        }
        Ok(())
    }
}
