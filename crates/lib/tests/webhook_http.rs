//! Integration test: start a mock Telegram Bot API and the hello-bot server on free ports,
//! POST updates, and assert on the HTTP acks and the captured sendMessage calls.
//! Server tasks are left running when the test ends.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lib::config::Config;
use lib::server;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Sent = Arc<Mutex<Vec<Value>>>;

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

/// Bot API stand-in: records sendMessage bodies; chat id 403 gets a Telegram-style error.
async fn mock_method(
    State(sent): State<Sent>,
    Path((_bot, method)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if method != "sendMessage" {
        return (StatusCode::NOT_FOUND, Json(json!({ "ok": false, "description": "Not Found" })));
    }
    if body.get("chat_id").and_then(|v| v.as_str()) == Some("403") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user" })),
        );
    }
    sent.lock().expect("lock").push(body);
    (StatusCode::OK, Json(json!({ "ok": true, "result": { "message_id": 1 } })))
}

async fn start_mock_api() -> (String, Sent) {
    let sent: Sent = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/:bot/:method", post(mock_method))
        .with_state(sent.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{}", addr), sent)
}

async fn start_server(api_base: String) -> String {
    start_server_with_token(api_base, "123:abc").await
}

async fn start_server_with_token(api_base: String, token: &str) -> String {
    std::env::remove_var("TELEGRAM_API_BASE");
    std::env::remove_var("BOT_TOKEN");
    let port = free_port();
    let mut config = Config::default();
    config.server.port = port;
    config.server.bind = "127.0.0.1".to_string();
    config.telegram.bot_token = Some(token.to_string());
    config.telegram.api_base = Some(api_base);
    tokio::spawn(async move {
        let _ = server::run_server(config).await;
    });

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();
    for _ in 0..100 {
        if let Ok(resp) = client.get(format!("{}/health", base)).send().await {
            if resp.status().is_success() {
                let health: Value = resp.json().await.expect("parse JSON");
                assert_eq!(health.get("runtime").and_then(|v| v.as_str()), Some("running"));
                assert_eq!(health.get("port").and_then(|v| v.as_u64()), Some(port as u64));
                return base;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("GET {}/health did not return 200 within 5s", base);
}

fn update(chat_id: i64, username: &str, text: &str) -> Value {
    json!({
        "update_id": 123456789,
        "message": {
            "message_id": 1,
            "from": { "id": 987654321, "is_bot": false, "first_name": "Test", "username": username },
            "chat": { "id": chat_id, "type": "private" },
            "date": 1616229231,
            "text": text
        }
    })
}

#[tokio::test]
async fn invoke_endpoint_replies_and_acks() {
    let (api_base, sent) = start_mock_api().await;
    let base = start_server(api_base).await;
    let client = reqwest::Client::new();

    let cases = [
        (update(1, "carol", "/start"), lib::dispatch::START_GREETING.to_string()),
        (update(2, "alice", "/help"), "Hello, alice.\nI can say Hello and nothing more".to_string()),
        (update(3, "bob", "hi"), "Hello, bob".to_string()),
    ];
    for (i, (upd, expected)) in cases.iter().enumerate() {
        let event = json!({ "httpMethod": "POST", "body": upd.to_string(), "isBase64Encoded": false });
        let resp = client
            .post(format!("{}/invoke", base))
            .json(&event)
            .send()
            .await
            .expect("invoke");
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.expect("parse JSON");
        assert_eq!(body, json!({ "statusCode": 200, "body": "" }));

        let sent = sent.lock().expect("lock");
        assert_eq!(sent.len(), i + 1);
        assert_eq!(sent[i].get("text").and_then(|v| v.as_str()), Some(expected.as_str()));
    }
    let chats: Vec<String> = sent
        .lock()
        .expect("lock")
        .iter()
        .filter_map(|b| b.get("chat_id").and_then(|v| v.as_str()).map(str::to_string))
        .collect();
    assert_eq!(chats, vec!["1", "2", "3"]);

    let resp = client
        .post(format!("{}/invoke", base))
        .json(&json!({ "body": "{not json" }))
        .send()
        .await
        .expect("invoke malformed");
    assert_eq!(resp.status(), 500);

    let resp = client
        .post(format!("{}/invoke", base))
        .body("not an envelope")
        .send()
        .await
        .expect("invoke bad envelope");
    assert_eq!(resp.status(), 400);
    assert_eq!(sent.lock().expect("lock").len(), 3);
}

#[tokio::test]
async fn webhook_endpoint_takes_raw_updates() {
    let (api_base, sent) = start_mock_api().await;
    let base = start_server(api_base).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/webhook", base))
        .json(&update(7, "dave", "hello there"))
        .send()
        .await
        .expect("webhook");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("body"), "");
    assert_eq!(
        sent.lock().expect("lock")[0].get("text").and_then(|v| v.as_str()),
        Some("Hello, dave")
    );

    let resp = client
        .post(format!("{}/webhook", base))
        .json(&update(403, "eve", "hi"))
        .send()
        .await
        .expect("webhook blocked");
    assert_eq!(resp.status(), 500);

    let resp = client
        .post(format!("{}/webhook", base))
        .body("garbage")
        .send()
        .await
        .expect("webhook garbage");
    assert_eq!(resp.status(), 500);
    assert_eq!(sent.lock().expect("lock").len(), 1);
}

#[tokio::test]
async fn failed_delivery_does_not_expose_bot_token() {
    let token = "123456:SECRET-TOKEN";
    let unreachable = format!("http://127.0.0.1:{}", free_port());
    let base = start_server_with_token(unreachable, token).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/webhook", base))
        .json(&update(8, "mallory", "hi"))
        .send()
        .await
        .expect("webhook");
    assert_eq!(resp.status(), 500);
    let body = resp.text().await.expect("body");
    assert!(body.starts_with("deliver failed: request to sendMessage failed"), "{}", body);
    assert!(!body.contains("SECRET-TOKEN"), "token in response: {}", body);

    let event = json!({ "body": update(9, "mallory", "/help").to_string() });
    let resp = client
        .post(format!("{}/invoke", base))
        .json(&event)
        .send()
        .await
        .expect("invoke");
    assert_eq!(resp.status(), 500);
    let body = resp.text().await.expect("body");
    assert!(!body.contains("SECRET-TOKEN"), "token in response: {}", body);
}
