//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod auth;
pub mod health;
pub mod journals;
pub mod reports;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(accounts::routes())
        .merge(journals::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use bukubesar_shared::{JwtService, config::JwtConfig};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{AppState, create_router};

    const SECRET: &str = "router-test-secret";

    fn jwt(expires_hours: i64) -> JwtService {
        JwtService::new(&JwtConfig {
            secret: SECRET.to_string(),
            expires_hours,
        })
    }

    /// Router over a disconnected pool: anything that reaches storage fails,
    /// so every assertion below is decided before the first query.
    fn app() -> Router {
        create_router(AppState::new(DatabaseConnection::Disconnected, jwt(1)))
    }

    fn token() -> String {
        jwt(1)
            .generate_access_token(Uuid::new_v4(), "budi", "budi@example.com", "admin")
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn json(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = send(get("/api/v1/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "unavailable");
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (status, body) = send(get("/api/v1/report/trial-balance", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing_token");
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (status, body) = send(get("/api/v1/coa", Some("not.a.token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let expired = jwt(-2)
            .generate_access_token(Uuid::new_v4(), "budi", "budi@example.com", "user")
            .unwrap();
        let (status, body) = send(get("/api/v1/journal", Some(&expired))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "token_expired");
    }

    #[tokio::test]
    async fn test_me_echoes_claims() {
        let (status, body) = send(get("/api/v1/auth/me", Some(&token()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userName"], "budi");
        assert_eq!(body["email"], "budi@example.com");
        assert_eq!(body["role"], "admin");
    }

    #[tokio::test]
    async fn test_register_validates_before_storage() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/auth/register",
            None,
            r#"{"userName":"bu","email":"nope","password":"123"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("email"));
        assert!(message.contains("password"));
        assert!(message.contains("user_name"));
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/journal",
            Some(&token()),
            r#"{"details": ["#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_body");
    }

    #[tokio::test]
    async fn test_journal_line_validated() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/journal",
            Some(&token()),
            r#"{"details":[{"coaCode":"","debit":10},{"coaCode":"3-1000","credit":10}]}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_account_type_rejected() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/coa",
            Some(&token()),
            r#"{"code":"1-1001","name":"Cash","type":"cash"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_body");
    }

    #[tokio::test]
    async fn test_blank_account_name_rejected() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/coa",
            Some(&token()),
            r#"{"code":"1-1001","name":"   ","type":"asset"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Invalid account name ''");
    }

    #[tokio::test]
    async fn test_oversized_journal_amount_rejected() {
        let (status, body) = send(json(
            Method::POST,
            "/api/v1/journal",
            Some(&token()),
            r#"{"details":[{"coaCode":"1-1001","debit":"1000000000000000000"},{"coaCode":"3-1000","credit":"1000000000000000000"}]}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "amount_too_large");
    }

    #[tokio::test]
    async fn test_journal_id_must_be_uuid() {
        let (status, body) = send(get("/api/v1/journal/not-a-uuid", Some(&token()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_path");
    }

    #[tokio::test]
    async fn test_reversed_report_period_rejected() {
        let (status, body) = send(get(
            "/api/v1/report/profit-loss?startDate=2026-03-01&endDate=2026-02-01",
            Some(&token()),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_bad_report_date_rejected() {
        let (status, body) = send(get(
            "/api/v1/report/trial-balance?startDate=01-02-2026",
            Some(&token()),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_query");
    }

    #[tokio::test]
    async fn test_ledger_requires_code() {
        let (status, body) = send(get("/api/v1/report/ledger", Some(&token()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_storage_failure_is_opaque() {
        let (status, body) = send(get("/api/v1/coa", Some(&token()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "persistence_error");
        assert_eq!(body["message"], "An internal error occurred");
    }
}
