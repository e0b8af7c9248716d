use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::app::app;
use crate::auth::{Credential, InMemoryCredentialStore, Role};
use crate::database::{Employee, MemoryEmployeeRepository};
use crate::state::AppState;

/// In-process router with in-memory stores for handler tests
pub struct TestContext {
    pub state: AppState,
    router: Router,
}

impl TestContext {
    pub const EMPLOYEE: (&'static str, &'static str) = ("erdogan", "test123");
    pub const MANAGER: (&'static str, &'static str) = ("irem", "test123");
    pub const ADMIN: (&'static str, &'static str) = ("gamze", "test123");

    pub fn new() -> Self {
        Self::from_state(AppState::in_memory())
    }

    /// Two employees: 1 Leslie Andrews, 2 Emma Baumgarten
    pub fn seeded() -> Self {
        Self::from_state(AppState::new(
            Arc::new(MemoryEmployeeRepository::with_employees([
                Employee::new("Leslie", "Andrews", "leslie@luv2code.com"),
                Employee::new("Emma", "Baumgarten", "emma@luv2code.com"),
            ])),
            Arc::new(InMemoryCredentialStore::demo()),
        ))
    }

    /// Demo users plus one disabled EMPLOYEE
    pub fn with_disabled_user(username: &str, password: &str) -> Self {
        let (user, pass) = Self::EMPLOYEE;
        let users = vec![
            Credential::new(user, format!("{{noop}}{}", pass), &[Role::Employee]),
            Credential::new(username, format!("{{noop}}{}", password), &[Role::Employee]).disabled(),
        ];
        Self::from_state(AppState::new(
            Arc::new(MemoryEmployeeRepository::new()),
            Arc::new(InMemoryCredentialStore::new(users)),
        ))
    }

    pub fn from_state(state: AppState) -> Self {
        let router = app(state.clone());
        Self { state, router }
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((user, pass)) = credentials {
            let encoded = STANDARD.encode(format!("{}:{}", user, pass));
            builder = builder.header(header::AUTHORIZATION, format!("Basic {}", encoded));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a request and decode the body as JSON, falling back to a JSON string
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        credentials: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, credentials, body).await;
        let status = response.status();
        let text = Self::text(response).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }

    pub async fn text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
