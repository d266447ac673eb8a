use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_postgres::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub user_service: Arc<dyn UserService>,
    cancel: CancellationToken,
    pool: Option<PgPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let credential_hasher: Arc<dyn CredentialHasher> =
            Arc::new(Argon2PasswordHasher::new(HashCost {
                memory_kib: settings.password.memory_kib,
                iterations: settings.password.iterations,
                parallelism: settings.password.parallelism,
            })?);

        let (user_repo, pool): (Arc<dyn UserRepo>, Option<PgPool>) =
            match settings.user.backend.as_str() {
                "postgres" => {
                    let pool = PgPoolOptions::new()
                        .max_connections(settings.database.max_connections)
                        .acquire_timeout(Duration::from_millis(
                            settings.database.acquire_timeout_ms,
                        ))
                        .connect(&settings.database.url)
                        .await
                        .map_err(|e| anyhow::anyhow!("couldn't connect to database: {e}"))?;
                    (Arc::new(PgUserRepo::new(pool.clone())) as Arc<dyn UserRepo>, Some(pool))
                }
                "memory" => {
                    warn!("using in-memory user store; records are lost on exit");
                    (Arc::new(MemoryUserRepo::new()) as Arc<dyn UserRepo>, None)
                }
                other => return Err(anyhow::anyhow!("Unknown user backend: {}", other)),
            };

        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            user_repo,
            credential_hasher,
            Duration::from_millis(settings.user.request_timeout_ms),
        ));

        info!(backend = %settings.user.backend, "server started");

        Ok(Self::new(user_service, pool))
    }

    pub fn new(user_service: Arc<dyn UserService>, pool: Option<PgPool>) -> Self {
        Self {
            user_service,
            cancel: CancellationToken::new(),
            pool,
        }
    }

    /// Token for one request; cancelled when the server shuts down.
    pub fn request_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("database pool closed");
        }
    }
}
