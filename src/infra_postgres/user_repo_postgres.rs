use super::util::insert_error;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use sqlx::PgPool;

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for PgUserRepo {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserId, UserRepoError> {
        let user_id = UserId::new_v4();

        sqlx::query(
            r#"
INSERT INTO users (id, username, email, password_hash)
VALUES ($1, $2, $3, $4)
"#,
        )
        .bind(user_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, format!("create user {username}")))?;

        debug!(%user_id, username, "user row inserted");
        Ok(user_id)
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, UserRepoError> {
        sqlx::query_as::<_, User>(
            r#"
SELECT id, username, email, password_hash
FROM users
WHERE id = $1
"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Store(format!("get user by id {user_id}: {e}")))?
        .ok_or(UserRepoError::NotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, UserRepoError> {
        sqlx::query_as::<_, User>(
            r#"
SELECT id, username, email, password_hash
FROM users
WHERE username = $1
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Store(format!("get user by username {username}: {e}")))?
        .ok_or(UserRepoError::NotFound)
    }

    async fn delete(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| UserRepoError::Store(format!("delete user {user_id}: {e}")))?;

        debug!(%user_id, rows = result.rows_affected(), "user delete executed");
        Ok(())
    }
}
