//! Canned API payloads and mock mounting helpers.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One API account object with the fields the client reads plus a few it ignores.
pub fn account_json(handle: &str) -> Value {
    json!({
        "login": handle,
        "id": 1,
        "html_url": format!("https://github.com/{handle}"),
        "avatar_url": format!("https://avatars.example/{handle}.png"),
        "type": "User",
        "site_admin": false
    })
}

/// A page of accounts named `{prefix}-{start}` .. `{prefix}-{start + count - 1}`.
pub fn page_json(prefix: &str, start: usize, count: usize) -> Value {
    Value::Array(
        (start..start + count)
            .map(|i| account_json(&format!("{prefix}-{i}")))
            .collect(),
    )
}

/// A page with the given handles.
pub fn handles_json(handles: &[&str]) -> Value {
    Value::Array(handles.iter().map(|h| account_json(h)).collect())
}

/// Mounts a 200 response with `body` for one page of `list` ("followers"/"following").
pub async fn mount_page(server: &MockServer, account: &str, list: &str, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{account}/{list}")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts an error response for one page of `list`.
pub async fn mount_error(
    server: &MockServer,
    account: &str,
    list: &str,
    page: u32,
    status: u16,
    message: &str,
) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{account}/{list}")))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(server)
        .await;
}
