// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use folioflow_web::config::Config;
use folioflow_web::routes::create_router;
use folioflow_web::AppState;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One request the mock backend received.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    /// Path below the `/api` prefix, e.g. `/auth/signin`.
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Answer the mock backend gives for one route.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: Bytes,
}

#[allow(dead_code)]
impl Canned {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Bytes::from(body.to_string()),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: Bytes::new(),
        }
    }

    pub fn raw(status: StatusCode, content_type: &'static str, body: &'static [u8]) -> Self {
        Self {
            status,
            content_type,
            body: Bytes::from_static(body),
        }
    }
}

#[allow(dead_code)]
struct MockState {
    routes: HashMap<(Method, String), Canned>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Backend stand-in listening on an ephemeral local port.
#[allow(dead_code)]
pub struct MockBackend {
    pub api_url: String,
    state: Arc<MockState>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }

    pub fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one backend call: {calls:?}");
        calls[0].clone()
    }
}

#[allow(dead_code)]
async fn mock_handler(
    State(mock): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    mock.calls.lock().unwrap().push(RecordedCall {
        method: method.clone(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().unwrap().to_string()),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match mock.routes.get(&(method, path)) {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start a mock backend answering `routes`; anything else gets an empty 404.
#[allow(dead_code)]
pub async fn spawn_backend(routes: Vec<(Method, &str, Canned)>) -> MockBackend {
    let state = Arc::new(MockState {
        routes: routes
            .into_iter()
            .map(|(method, path, canned)| ((method, path.to_string()), canned))
            .collect(),
        calls: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .fallback(mock_handler)
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        api_url: format!("http://{addr}/api"),
        state,
    }
}

/// Create a test app talking to `backend`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(backend: &MockBackend) -> (Router, Arc<AppState>) {
    app_for(Config::with_backend(&backend.api_url))
}

/// Create a test app whose backend refuses connections.
#[allow(dead_code)]
pub fn create_test_app_unreachable() -> (Router, Arc<AppState>) {
    app_for(Config::with_backend("http://127.0.0.1:9/api"))
}

fn app_for(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    (create_router(state.clone()), state)
}

/// Backend profile body for a signed-in user.
#[allow(dead_code)]
pub fn profile_body() -> Value {
    serde_json::json!({
        "userId": "USER-1",
        "email": "jane@example.com",
        "firstName": "Jane",
        "lastName": "Doe",
        "isOAuth2User": false
    })
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, authorization: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

#[allow(dead_code)]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}
