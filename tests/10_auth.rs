mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::{ADMIN, EMPLOYEE, MANAGER};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn anonymous_requests_are_challenged() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = server.client.get(server.url("/api/employees")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let challenge = res
        .headers()
        .get("www-authenticate")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(challenge.starts_with("Basic realm="), "challenge: {}", challenge);
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_unauthorized() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = server
        .request(Method::GET, "/api/employees", ("mallory", "test123"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

/// Status each role gets for every protected route, against a store with one employee
#[tokio::test]
async fn role_matrix() -> Result<()> {
    let server = common::ensure_server().await?;

    // Seed employee 1 as admin so every route has something to act on
    let seeded = server
        .request(Method::POST, "/api/employees", ADMIN)
        .json(&json!({"firstName": "Seed", "lastName": "Row", "email": "seed@x.com"}))
        .send()
        .await?;
    assert_eq!(seeded.status(), StatusCode::OK);

    let body = json!({"id": 1, "firstName": "A", "lastName": "B", "email": "a@b.c"});
    let patch = json!({"email": "new@x.com"});

    struct Case {
        method: Method,
        path: &'static str,
        body: Option<serde_json::Value>,
        employee: StatusCode,
        manager: StatusCode,
    }

    let cases = [
        Case { method: Method::GET, path: "/api/employees", body: None, employee: StatusCode::OK, manager: StatusCode::OK },
        Case { method: Method::GET, path: "/api/employees/1", body: None, employee: StatusCode::OK, manager: StatusCode::OK },
        Case { method: Method::POST, path: "/api/employees", body: Some(body.clone()), employee: StatusCode::FORBIDDEN, manager: StatusCode::OK },
        Case { method: Method::PUT, path: "/api/employees", body: Some(body.clone()), employee: StatusCode::FORBIDDEN, manager: StatusCode::OK },
        Case { method: Method::PATCH, path: "/api/employees/1", body: Some(patch.clone()), employee: StatusCode::FORBIDDEN, manager: StatusCode::OK },
        Case { method: Method::DELETE, path: "/api/employees/1", body: None, employee: StatusCode::FORBIDDEN, manager: StatusCode::FORBIDDEN },
    ];

    for case in &cases {
        for (who, expected) in [(EMPLOYEE, case.employee), (MANAGER, case.manager)] {
            let mut req = server.request(case.method.clone(), case.path, who);
            if let Some(body) = &case.body {
                req = req.json(body);
            }
            let res = req.send().await?;
            assert_eq!(
                res.status(),
                expected,
                "{} {} as {}",
                case.method,
                case.path,
                who.0
            );
        }
    }

    // Only ADMIN may delete
    let res = server
        .request(Method::DELETE, "/api/employees/1", ADMIN)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
