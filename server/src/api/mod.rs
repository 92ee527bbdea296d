use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::Server;

mod http;
pub use http::ApiError;

pub struct Api {
    server: Arc<Server>,
}

impl Api {
    pub fn new(server: Arc<Server>) -> Self {
        Self { server }
    }

    pub fn router(&self) -> Router {
        // Same-origin requests from the landing page never need CORS; this only opens the
        // API to other browser origins.
        let allowed_origins = parse_allowed_origins("ALLOWED_HTTP_ORIGINS");
        let cors = if allowed_origins.contains("*") {
            CorsLayer::new().allow_origin(AllowOrigin::any())
        } else {
            let origins = allowed_origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Invalid origin in ALLOWED_HTTP_ORIGINS: {}", origin);
                        None
                    }
                })
                .collect::<Vec<_>>();
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::HeaderName::from_static("x-request-id")]);

        let router = Router::new()
            .route("/", get(http::index))
            .route("/healthz", get(http::healthz))
            .route("/api/roll", post(http::roll))
            .route("/api/state", get(http::state))
            .route("/api/reset", post(http::reset))
            .route("/api/save", post(http::save))
            .route("/api/load", post(http::load));

        let router = router.layer(cors);
        let router = match self.server.config.http_body_limit_bytes {
            Some(limit) if limit > 0 => router.layer(DefaultBodyLimit::max(limit)),
            _ => router,
        };
        let router = router.layer(middleware::from_fn(request_id_middleware));
        let router = router.layer(TraceLayer::new_for_http());

        router.with_state(self.server.clone())
    }
}

fn parse_allowed_origins(var: &str) -> HashSet<String> {
    std::env::var(var)
        .unwrap_or_default()
        .split(',')
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(header::HeaderName::from_static("x-request-id"))
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();
    let mut response = next.run(req).await;
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(
            header::HeaderName::from_static("x-request-id"),
            header_value,
        );
    }
    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "http.request"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request as HttpRequest, StatusCode};
    use diceroller_execution::mocks::ScriptedDice;
    use serde_json::{json, Value};
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn app(faces: &[u8]) -> (Router, TempDir) {
        let dir = tempdir().expect("create temp dir");
        let config = ServerConfig {
            state_path: dir.path().join("state.json"),
            ..Default::default()
        };
        let server = Server::with_dice(config, Box::new(ScriptedDice::new(faces.iter().copied())));
        (Api::new(Arc::new(server)).router(), dir)
    }

    async fn call(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_roll_solo() {
        let (router, _dir) = app(&[3, 4]);
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/roll",
            Some(json!({ "mode": "solo", "number_of_dice": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"]["player"], json!({ "dice": [3, 4], "sum": 7 }));
        assert_eq!(body["event"]["desc"], "Solo rolled [3, 4] = 7");
        assert_eq!(body["stats"], json!({ "total_rolls": 1, "highest_sum": 7 }));
    }

    #[tokio::test]
    async fn test_roll_vs_computer_shape() {
        let (router, _dir) = app(&[2, 5]);
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/roll",
            Some(json!({ "mode": "vs_computer", "number_of_dice": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"]["winner"], "computer");
        assert_eq!(body["event"]["opponent"]["sum"], 5);
        assert_eq!(
            body["stats"],
            json!({
                "total_rolls": 1,
                "highest_sum": 5,
                "player1_score": 0,
                "player2_score": 1,
                "rounds": 1
            })
        );
    }

    #[tokio::test]
    async fn test_roll_rejections() {
        let (router, _dir) = app(&[]);
        let cases = [
            (json!({ "mode": "roulette" }), "UNKNOWN_MODE"),
            (json!({ "mode": "solo", "number_of_dice": 5 }), "INVALID_DICE_COUNT"),
            (json!({ "mode": "two_player", "number_of_dice": 1 }), "MISSING_PLAYER"),
            (
                json!({ "mode": "two_player", "number_of_dice": 1, "player": 4 }),
                "UNKNOWN_PLAYER",
            ),
        ];
        for (request, code) in cases {
            let (status, body) = call(&router, Method::POST, "/api/roll", Some(request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], code);
        }

        let (_, state) = call(&router, Method::GET, "/api/state", None).await;
        assert_eq!(state["total_rolls"], 0);
    }

    #[tokio::test]
    async fn test_roll_accepts_numeric_strings() {
        let (router, _dir) = app(&[2, 3, 5]);
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/roll",
            Some(json!({ "mode": "solo", "number_of_dice": "2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"]["player"]["sum"], 5);

        let (status, body) = call(
            &router,
            Method::POST,
            "/api/roll",
            Some(json!({ "mode": "two_player", "number_of_dice": 1.0, "player": "1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event"]["player_id"], 1);
    }

    #[tokio::test]
    async fn test_malformed_roll_body_is_a_json_error() {
        let (router, _dir) = app(&[]);
        for request in [
            json!({ "number_of_dice": "many" }),
            json!({ "player": 1.5, "mode": "two_player" }),
            json!({ "mode": 3 }),
            json!([1, 2]),
        ] {
            let (status, body) = call(&router, Method::POST, "/api/roll", Some(request)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "INVALID_REQUEST");
            assert!(body["message"].is_string());
        }

        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .method(Method::POST)
                    .uri("/api/roll")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let (_, state) = call(&router, Method::GET, "/api/state", None).await;
        assert_eq!(state["total_rolls"], 0);
    }

    #[tokio::test]
    async fn test_state_and_reset() {
        let (router, _dir) = app(&[6, 6]);
        call(
            &router,
            Method::POST,
            "/api/roll",
            Some(json!({ "mode": "two_player", "number_of_dice": 2, "player": 2 })),
        )
        .await;

        let (status, state) = call(&router, Method::GET, "/api/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["player2_score"], 12);
        assert_eq!(state["rounds"], 1);
        assert_eq!(state["highest_player"], "Player 2");

        let (status, state) = call(&router, Method::POST, "/api/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["player2_score"], 0);
        assert_eq!(state["message"], "Welcome to Dice Roller!");
    }

    #[tokio::test]
    async fn test_save_and_load_routes() {
        let (router, dir) = app(&[1]);
        call(&router, Method::POST, "/api/roll", Some(json!({}))).await;

        let (status, body) = call(&router, Method::POST, "/api/save", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], true);
        assert!(dir.path().join("state.json").exists());

        call(&router, Method::POST, "/api/reset", None).await;
        let (status, state) = call(&router, Method::POST, "/api/load", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["total_rolls"], 1);
        assert_eq!(state["history"][0]["desc"], "Solo rolled [1] = 1");
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let (router, dir) = app(&[]);
        let path = dir.path().join("state.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let (status, body) = call(&router, Method::POST, "/api/save", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "PERSISTENCE_FAILED");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let (router, _dir) = app(&[]);
        let response = router
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/healthz")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_index_serves_html() {
        let (router, _dir) = app(&[]);
        let response = router
            .clone()
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/roll"));
    }
}
