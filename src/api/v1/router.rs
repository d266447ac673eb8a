use super::handler;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use warp::Filter;

/// Largest accepted JSON body.
const MAX_BODY_BYTES: u64 = 16 * 1024;

const BY_USERNAME: &str = "by_username";

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let create_user = warp::post()
        .and(warp::path("users"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_request_token(server.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::create_user);

    let get_user_by_username = warp::get()
        .and(warp::path("users"))
        .and(warp::path(BY_USERNAME))
        .and(warp::path::end())
        .and(warp::query::<handler::UsernameQuery>())
        .and(with_request_token(server.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user_by_username);

    let get_user_by_id = warp::get()
        .and(warp::path("users"))
        .and(user_id_segment())
        .and(warp::path::end())
        .and(with_request_token(server.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user_by_id);

    let delete_user = warp::delete()
        .and(warp::path("users"))
        .and(user_id_segment())
        .and(warp::path::end())
        .and(with_request_token(server.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::delete_user);

    create_user
        .or(get_user_by_username)
        .or(get_user_by_id)
        .or(delete_user)
}

/// The `{id}` segment of `/users/{id}`. Never matches the `by_username`
/// literal, which belongs to the lookup route.
fn user_id_segment() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::path::param::<String>().and_then(|raw: String| async move {
        if raw == BY_USERNAME {
            Err(warp::reject::not_found())
        } else {
            Ok(raw)
        }
    })
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_request_token(
    server: Arc<Server>,
) -> impl Filter<Extract = (CancellationToken,), Error = Infallible> + Clone {
    warp::any().map(move || server.request_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::recover_error;
    use crate::application_impl::{Argon2PasswordHasher, HashCost, RealUserService};
    use crate::application_port::{CredentialHasher, UserError, UserService};
    use crate::infra_memory::MemoryUserRepo;
    use serde_json::{Value, json};
    use std::time::Duration;
    use warp::http::StatusCode;
    use warp::test::RequestBuilder;

    struct FailingHasher;

    #[async_trait::async_trait]
    impl CredentialHasher for FailingHasher {
        async fn hash_password(&self, _: &str) -> Result<String, UserError> {
            Err(UserError::Hashing("out of memory".to_string()))
        }
    }

    fn server_with(hasher: Arc<dyn CredentialHasher>) -> Arc<Server> {
        let service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            Arc::new(MemoryUserRepo::new()),
            hasher,
            Duration::from_secs(5),
        ));
        Arc::new(Server::new(service, None))
    }

    fn server() -> Arc<Server> {
        let hasher = Argon2PasswordHasher::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params");
        server_with(Arc::new(hasher))
    }

    async fn send(server: &Arc<Server>, request: RequestBuilder) -> (StatusCode, Value) {
        let api = warp::path("api")
            .and(warp::path("v1"))
            .and(routes(server.clone()))
            .recover(recover_error);
        let res = request.reply(&api).await;
        let body = serde_json::from_slice(res.body()).expect("json body");
        (res.status(), body)
    }

    async fn create(server: &Arc<Server>, username: &str, email: &str) -> (StatusCode, Value) {
        let request = warp::test::request()
            .method("POST")
            .path("/api/v1/users")
            .json(&json!({ "username": username, "password": "blablabla", "email": email }));
        send(server, request).await
    }

    fn get(path: &str) -> RequestBuilder {
        warp::test::request().method("GET").path(path)
    }

    #[tokio::test]
    async fn create_then_fetch_by_id_and_username() {
        let server = server();

        let (status, body) = create(&server, "YungLean", "Jonah@Proton.me").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let id = body["data"]["id"].as_str().expect("id").to_string();

        let (status, body) = send(&server, get(&format!("/api/v1/users/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["username"], "YungLean");
        assert_eq!(data["email"], "jonah@proton.me");
        assert!(data.get("password_hash").is_none());

        let (status, body) = send(
            &server,
            get("/api/v1/users/by_username?username=YungLean"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["id"], id.as_str());
        let hash = data["password_hash"].as_str().expect("hash");
        assert!(!hash.is_empty());
        assert_ne!(hash, "blablabla");
    }

    #[tokio::test]
    async fn invalid_email_is_bad_request() {
        let server = server();

        let (status, body) = create(&server, "test_user", "invalid_email").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "InvalidEmail");
    }

    #[tokio::test]
    async fn conflicts_are_reported_as_conflict() {
        let server = server();
        let (status, _) = create(&server, "alice", "alice@example.com").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = create(&server, "bob", "alice@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "EmailTaken");

        let (status, body) = create(&server, "alice", "other@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "UsernameTaken");
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_removes_the_user() {
        let server = server();
        let (_, body) = create(&server, "alice", "alice@example.com").await;
        let id = body["data"]["id"].as_str().expect("id").to_string();

        for _ in 0..2 {
            let request = warp::test::request()
                .method("DELETE")
                .path(&format!("/api/v1/users/{id}"));
            let (status, body) = send(&server, request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
        }

        let (status, body) = send(&server, get(&format!("/api/v1/users/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UserNotFound");
    }

    #[tokio::test]
    async fn malformed_id_is_bad_request() {
        let server = server();
        let (status, body) = send(&server, get("/api/v1/users/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "InvalidUserId");
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let server = server();
        let (status, body) = send(&server, get("/api/v1/users/by_username?username=nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UserNotFound");
    }

    #[tokio::test]
    async fn hashing_failure_is_internal_error() {
        let server = server_with(Arc::new(FailingHasher));

        let (status, body) = create(&server, "alice", "alice@example.com").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "InternalError");
        assert_eq!(body["error"]["message"], "Internal error");
    }

    #[tokio::test]
    async fn username_lookup_is_not_taken_for_an_id() {
        let server = server();
        let (status, body) = send(&server, get("/api/v1/users/by_username")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "InvalidArgument");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let server = server();
        let request = warp::test::request()
            .method("POST")
            .path("/api/v1/users")
            .header("content-type", "application/json")
            .body(r#"{"username":"alice"}"#);
        let (status, body) = send(&server, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "InvalidArgument");
    }

    #[tokio::test]
    async fn requests_after_shutdown_are_cancelled() {
        let server = server();
        server.shutdown().await;

        let (status, body) = send(&server, get("/api/v1/users/by_username?username=alice")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "Cancelled");
    }
}
