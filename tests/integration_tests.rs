// Integration tests for Neptune Search: the HTTP surface against a stubbed provider

use actix_web::{http::StatusCode, test, web, App};
use mockito::{Matcher, Mock, ServerGuard};
use neptune_search::config::ProviderSettings;
use neptune_search::core::{build_prompt, ReferenceCatalog, SYSTEM_PROMPT};
use neptune_search::routes::{self, AppState};
use neptune_search::{CompletionClient, Synthesizer};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
const GENERIC_500: &str = r#"{"error":"An internal server error occurred."}"#;

fn provider_settings(endpoint: String) -> ProviderSettings {
    ProviderSettings {
        endpoint,
        api_key: "sk-integration".to_string(),
        model: "test/model".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        referer: None,
        title: Some("Neptune Search".to_string()),
    }
}

fn state_for(endpoint: String) -> AppState {
    let completion = CompletionClient::new(&provider_settings(endpoint)).unwrap();
    AppState::new(Synthesizer::with_builtin_catalog(), completion, 1000)
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "gen-1",
        "choices": [ { "index": 0, "message": { "role": "assistant", "content": content } } ]
    })
    .to_string()
}

async fn provider_replying(server: &mut ServerGuard, content: &str) -> Mock {
    server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body(content))
        .expect(1)
        .create_async()
        .await
}

/// Build the app, send one POST to `uri` with a raw body, return status and body text
async fn post_raw(state: AppState, uri: &str, body: &str) -> (StatusCode, String) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(("content-type", "application/json"))
        .set_payload(body.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_search(state: AppState, body: Value) -> (StatusCode, String) {
    post_raw(state, "/search", &body.to_string()).await
}

/// In-memory sink for log lines emitted while a test runs
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[actix_web::test]
async fn test_missing_or_empty_query_is_rejected_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let endpoint = format!("{}{}", server.url(), COMPLETIONS_PATH);

    for body in [json!({}), json!({ "query": "" }), json!({ "query": null })] {
        let (status, text) = post_search(state_for(endpoint.clone()), body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(text, r#"{"error":"Query is required"}"#);
    }

    mock.assert_async().await;
}

#[actix_web::test]
async fn test_query_is_forwarded_without_trimming() {
    let catalog = ReferenceCatalog::builtin();

    for query in ["  groomers  ", "   "] {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", COMPLETIONS_PATH)
            .match_body(Matcher::Json(json!({
                "model": "test/model",
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": build_prompt(query, &catalog) }
                ]
            })))
            .with_status(200)
            .with_body(completion_body("[]"))
            .expect(1)
            .create_async()
            .await;

        let (status, text) = post_search(
            state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
            json!({ "query": query }),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "query {:?}", query);
        assert_eq!(text, "[]");
        mock.assert_async().await;
    }
}

#[actix_web::test]
async fn test_malformed_body_is_rejected_without_upstream_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let endpoint = format!("{}{}", server.url(), COMPLETIONS_PATH);

    for body in ["not json", r#"{"query": 42}"#, r#""just a string""#] {
        let (status, text) = post_raw(state_for(endpoint.clone()), "/search", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(text, r#"{"error":"Invalid request body"}"#);
    }

    mock.assert_async().await;
}

#[actix_web::test]
async fn test_overlong_query_is_rejected() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let query = "a".repeat(1001);
    let (status, text) = post_search(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        json!({ "query": query }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, r#"{"error":"Query is too long"}"#);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_one_upstream_call_carrying_query_and_reference_data() {
    let query = "cheap dog groomers with online booking";
    let catalog = ReferenceCatalog::builtin();
    let expected_prompt = build_prompt(query, &catalog);

    // The prompt itself must hold the literal query and every serialized source
    assert!(expected_prompt.contains(query));
    for (_, records) in catalog.sources() {
        assert!(expected_prompt.contains(&serde_json::to_string(records).unwrap()));
    }

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("authorization", "Bearer sk-integration")
        .match_body(Matcher::Json(json!({
            "model": "test/model",
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": expected_prompt }
            ]
        })))
        .with_status(200)
        .with_body(completion_body("[]"))
        .expect(1)
        .create_async()
        .await;

    let (status, text) = post_search(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        json!({ "query": query }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "[]");
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_prose_and_fences_are_stripped() {
    let mut server = mockito::Server::new_async().await;
    let mock = provider_replying(
        &mut server,
        "Sure! Here's the data:\n```json\n[{\"name\":\"X\",\"rating\":4,\"price\":\"$1\",\"bookingInfo\":\"b\",\"neptuneScore\":50}]\n```",
    )
    .await;

    let (status, text) = post_search(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        json!({ "query": "groomers" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text,
        r#"[{"name":"X","rating":4,"price":"$1","bookingInfo":"b","neptuneScore":50}]"#
    );
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_api_prefixed_path_serves_the_same_handler() {
    let mut server = mockito::Server::new_async().await;
    let mock = provider_replying(&mut server, "[]").await;

    let (status, text) = post_raw(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        "/api/search",
        r#"{"query":"groomers"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "[]");
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_response_without_json_is_a_generic_error() {
    let refusal = "I'm sorry, I can't help with that request.";
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let mut server = mockito::Server::new_async().await;
    let mock = provider_replying(&mut server, refusal).await;

    let (status, text) = post_search(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        json!({ "query": "groomers" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, GENERIC_500);
    assert!(!text.contains(refusal));
    mock.assert_async().await;

    // The raw model text stays server-side, in the error log
    let logged = logs.contents();
    assert!(logged.contains("ERROR"), "logs: {}", logged);
    assert!(logged.contains(refusal), "logs: {}", logged);
}

#[actix_web::test]
async fn test_invalid_json_span_is_not_forwarded() {
    let mut server = mockito::Server::new_async().await;
    let mock = provider_replying(
        &mut server,
        "```json\n[{\"name\":\"X\",\"rating\":4,\"price\":\"$1\",\"bookingInfo\":\"b\",\"neptuneScore\":50},]\n```",
    )
    .await;

    let (status, text) = post_search(
        state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
        json!({ "query": "groomers" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, GENERIC_500);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_wrongly_shaped_results_are_rejected() {
    let replies = [
        r#"{"name":"X","rating":4,"price":"$1","bookingInfo":"b","neptuneScore":50}"#,
        r#"[{"name":"X","rating":4,"price":"$1","bookingInfo":"b","neptuneScore":150}]"#,
        r#"[{"name":"X","rating":4,"price":"$1"}]"#,
    ];

    for reply in replies {
        let mut server = mockito::Server::new_async().await;
        let mock = provider_replying(&mut server, reply).await;

        let (status, text) = post_search(
            state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
            json!({ "query": "groomers" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "reply {}", reply);
        assert_eq!(text, GENERIC_500);
        mock.assert_async().await;
    }
}

#[actix_web::test]
async fn test_provider_failures_are_a_generic_error() {
    for (code, body) in [
        (401, r#"{"error":{"message":"No auth credentials found","code":401}}"#),
        (429, r#"{"error":{"message":"Rate limit exceeded"}}"#),
        (503, "upstream unavailable"),
    ] {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", COMPLETIONS_PATH)
            .with_status(code)
            .with_body(body)
            .expect(1)
            .create_async()
            .await;

        let (status, text) = post_search(
            state_for(format!("{}{}", server.url(), COMPLETIONS_PATH)),
            json!({ "query": "groomers" }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "provider status {}", code);
        assert_eq!(text, GENERIC_500);
        assert!(!text.contains("sk-integration"));
        mock.assert_async().await;
    }
}

#[actix_web::test]
async fn test_unreachable_provider_is_a_generic_error() {
    let (status, text) = post_search(
        state_for("http://127.0.0.1:9/api/v1/chat/completions".to_string()),
        json!({ "query": "groomers" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, GENERIC_500);
}
