//! End-to-end tests: configuration in, rewritten request out.

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use headwind::prelude::*;
use http::HeaderMap;
use http_body_util::Full;

/// Terminal handler that echoes the forwarded request headers back as
/// response headers and records the applied header names in the response
/// extensions.
fn echo_headers(ctx: &mut MiddlewareContext, request: Request) -> BoxFuture<'static, Response> {
    let applied = ctx.get_extension::<AppliedHeaders>().cloned();
    Box::pin(async move {
        let mut response = http::Response::new(Full::new(Bytes::new()));
        *response.headers_mut() = request.headers().clone();
        if let Some(applied) = applied {
            response.extensions_mut().insert(applied);
        }
        response
    })
}

fn request(headers: &[(&'static str, &'static str)]) -> Request {
    let mut builder = http::Request::builder().uri("/resource");
    for &(name, value) in headers {
        builder = builder.header(name, value);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

async fn forward(pipeline: &Pipeline, request: Request) -> HeaderMap {
    let response = pipeline
        .process(MiddlewareContext::new(), request, echo_headers)
        .await;
    response.headers().clone()
}

fn values(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn load_toml(content: &str) -> HeadwindConfig {
    ConfigLoader::new()
        .with_string(content, "toml")
        .unwrap()
        .load()
        .unwrap()
}

#[tokio::test]
async fn test_cookie_rewrite_from_toml() {
    let config = load_toml(
        r#"
        [[rewrites]]
        header = "X-Auth"
        value = "@Cookie:Authorization"
        "#,
    );
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let headers = forward(
        &pipeline,
        request(&[("Cookie", "foo=x; Authorization=abc")]),
    )
    .await;

    assert_eq!(values(&headers, "X-Auth"), vec!["abc"]);
    assert_eq!(values(&headers, "Cookie"), vec!["foo=x; Authorization=abc"]);
}

#[tokio::test]
async fn test_header_rewrite_from_json() {
    let config = ConfigLoader::new()
        .with_string(
            r#"{"rewrites": [{"header": "X-Forwarded-Host", "value": "@Header:Host"}]}"#,
            "json",
        )
        .unwrap()
        .load()
        .unwrap();
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let headers = forward(&pipeline, request(&[("Host", "test:1000")])).await;

    assert_eq!(values(&headers, "X-Forwarded-Host"), vec!["test:1000"]);
    assert_eq!(values(&headers, "Host"), vec!["test:1000"]);
}

#[tokio::test]
async fn test_literal_rewrite_on_any_request() {
    let config = load_toml(
        r#"
        [[rewrites]]
        header = "X-Tag"
        value = "static-tag"
        "#,
    );
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let bare = forward(&pipeline, request(&[])).await;
    assert_eq!(values(&bare, "X-Tag"), vec!["static-tag"]);

    let busy = forward(
        &pipeline,
        request(&[
            ("X-Tag", "client-supplied"),
            ("Cookie", "session=1"),
            ("Accept", "text/html"),
        ]),
    )
    .await;
    assert_eq!(values(&busy, "X-Tag"), vec!["static-tag"]);
    assert_eq!(values(&busy, "Accept"), vec!["text/html"]);
}

#[tokio::test]
async fn test_missing_sources_write_empty_headers() {
    let config = load_toml(
        r#"
        [[rewrites]]
        header = "X-Auth"
        value = "@Cookie:Authorization"

        [[rewrites]]
        header = "X-Trace"
        value = "@Header:X-Request-Id"
        "#,
    );
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let headers = forward(&pipeline, request(&[("Cookie", "foo=x")])).await;

    assert_eq!(values(&headers, "X-Auth"), vec![""]);
    assert_eq!(values(&headers, "X-Trace"), vec![""]);
}

#[tokio::test]
async fn test_rules_apply_in_order_last_write_wins() {
    let config = load_toml(
        r#"
        [[rewrites]]
        header = "X-Identity"
        value = "anonymous"

        [[rewrites]]
        header = "X-Identity"
        value = "@Cookie:user"

        [[rewrites]]
        header = "X-Hosts"
        value = "@Header:X-Forwarded-For"
        "#,
    );
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let response = pipeline
        .process(
            MiddlewareContext::new(),
            request(&[
                ("Cookie", "user=alice"),
                ("X-Forwarded-For", "10.0.0.1"),
                ("X-Forwarded-For", "10.0.0.2"),
            ]),
            echo_headers,
        )
        .await;

    let headers = response.headers();
    assert_eq!(values(headers, "X-Identity"), vec!["alice"]);
    assert_eq!(values(headers, "X-Hosts"), vec!["10.0.0.1,10.0.0.2"]);

    let applied = response.extensions().get::<AppliedHeaders>().unwrap();
    assert_eq!(applied.len(), 3);
    assert!(applied.contains("x-identity"));
    assert!(applied.contains("X-Hosts"));
}

#[tokio::test]
async fn test_unknown_prefix_is_literal() {
    let config = HeadwindConfig::builder()
        .rewrite("X-Odd", "@Query:page")
        .rewrite("X-Empty", "")
        .build();
    let pipeline = headwind::new(&config, "rewriteHeader").unwrap();

    let headers = forward(&pipeline, request(&[])).await;

    assert_eq!(values(&headers, "X-Odd"), vec!["@Query:page"]);
    assert_eq!(values(&headers, "X-Empty"), vec![""]);
}

#[tokio::test]
async fn test_config_file_round_trip() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[[rewrites]]
header = "X-Auth"
value = "@Cookie:Authorization"

[logging]
level = "debug"
format = "pretty"
"#
    )
    .unwrap();

    let config = ConfigLoader::new()
        .with_file(file.path())
        .unwrap()
        .load()
        .unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);

    let pipeline = headwind::new(&config, "fromFile").unwrap();
    let headers = forward(&pipeline, request(&[("Cookie", "Authorization=t0k")])).await;
    assert_eq!(values(&headers, "X-Auth"), vec!["t0k"]);
}

#[tokio::test]
async fn test_shared_pipeline_across_tasks() {
    let config = HeadwindConfig::builder()
        .rewrite("X-User", "@Cookie:user")
        .rewrite("X-Tag", "shared")
        .build();
    let pipeline = Arc::new(headwind::new(&config, "concurrent").unwrap());

    let users = ["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];
    let mut tasks = Vec::new();
    for user in users {
        let pipeline = Arc::clone(&pipeline);
        tasks.push(tokio::spawn(async move {
            let request = http::Request::builder()
                .header("Cookie", format!("user={user}"))
                .body(Full::new(Bytes::new()))
                .unwrap();
            let headers = forward(&pipeline, request).await;
            (user, headers)
        }));
    }

    for task in tasks {
        let (user, headers) = task.await.unwrap();
        assert_eq!(values(&headers, "X-User"), vec![user]);
        assert_eq!(values(&headers, "X-Tag"), vec!["shared"]);
    }
}
