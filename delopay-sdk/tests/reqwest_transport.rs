//! End-to-end checks of the default transport against a local axum server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use delopay_sdk::client::{ApiRequest, HttpClient, ReqwestTransport};
use delopay_sdk::objects::{CreatePaymentRequest, PaymentProvider};
use delopay_sdk::{ClientConfig, DelopayClient};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct Recorder {
    hits: Arc<AtomicUsize>,
    last_headers: Arc<Mutex<Option<HeaderMap>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl Recorder {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn payment_json() -> Value {
    json!({
        "paymentId": "pay_123",
        "clientOrderId": "order_1",
        "provider": "STRIPE",
        "status": "PENDING",
        "amount": 10,
        "currency": "EUR"
    })
}

async fn create_payment(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    *recorder.last_headers.lock().await = Some(headers);
    *recorder.last_body.lock().await = Some(body);
    Json(payment_json())
}

async fn slow_providers(State(recorder): State<Recorder>) -> Json<Value> {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "providers": [] }))
}

async fn missing_payment(State(recorder): State<Recorder>) -> impl IntoResponse {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::NOT_FOUND,
        [("x-request-id", "req_404")],
        Json(json!({ "message": "Payment not found", "code": "E_NOT_FOUND" })),
    )
}

async fn flaky_payment(State(recorder): State<Recorder>) -> impl IntoResponse {
    let hit = recorder.hits.fetch_add(1, Ordering::SeqCst);
    if hit == 0 {
        (StatusCode::SERVICE_UNAVAILABLE, "try again later").into_response()
    } else {
        Json(payment_json()).into_response()
    }
}

async fn no_content(State(recorder): State<Recorder>) -> StatusCode {
    recorder.hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::NO_CONTENT
}

async fn spawn_server(recorder: Recorder) -> String {
    let router = Router::new()
        .route("/api/payments/create", post(create_payment))
        .route("/api/providers", get(slow_providers))
        .route("/api/payments/missing", get(missing_payment))
        .route("/api/payments/flaky", get(flaky_payment))
        .route("/api/no-content", post(no_content))
        .route("/api/payments/pay_1/capture", post(no_content))
        .with_state(recorder);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn config(base_url: &str) -> ClientConfig {
    ClientConfig::new("test_api_key").with_base_url(base_url)
}

#[tokio::test]
async fn test_create_sends_headers_and_json_body() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let client = DelopayClient::new(config(&base_url)).unwrap();

    let input = CreatePaymentRequest::new(
        "order_1",
        PaymentProvider::Stripe,
        Decimal::from(10),
        "EUR",
        "https://x/s",
        "https://x/c",
    );
    let payment = client.payments().create(&input).await.unwrap().unwrap();
    assert_eq!(payment.payment_id, "pay_123");

    let headers = recorder.last_headers.lock().await.clone().unwrap();
    assert_eq!(headers["authorization"], "Bearer test_api_key");
    assert_eq!(headers["accept"], "application/json");
    assert_eq!(headers["content-type"], "application/json");

    let body = recorder.last_body.lock().await.clone().unwrap();
    assert_eq!(body["clientOrderId"], "order_1");
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn test_timeout_is_retried_then_reported() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let client = DelopayClient::new(config(&base_url).with_timeout_ms(50).with_max_retries(1))
        .unwrap();

    let error = client.providers().list().await.unwrap_err();

    assert_eq!(error.status, 0);
    assert_eq!(error.message, "Network request failed");
    assert!(error.is_network_error());
    assert_eq!(recorder.hits(), 2);
}

#[tokio::test]
async fn test_client_error_is_normalized() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let client = DelopayClient::new(config(&base_url)).unwrap();

    let error = client.payments().get("missing").await.unwrap_err();

    assert_eq!(error.status, 404);
    assert_eq!(error.message, "Payment not found");
    assert_eq!(error.code.as_deref(), Some("E_NOT_FOUND"));
    assert_eq!(error.request_id.as_deref(), Some("req_404"));
    assert_eq!(recorder.hits(), 1);
}

#[tokio::test]
async fn test_server_error_is_retried_for_get() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let client = DelopayClient::new(config(&base_url)).unwrap();

    let payment = client.payments().get("flaky").await.unwrap().unwrap();

    assert_eq!(payment.payment_id, "pay_123");
    assert_eq!(recorder.hits(), 2);
}

#[tokio::test]
async fn test_no_content_yields_absent_result() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let http = HttpClient::new(
        config(&base_url).validate().unwrap(),
        Arc::new(ReqwestTransport::new()),
    );

    let result = http
        .execute::<Value>(ApiRequest::post("/api/no-content"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(recorder.hits(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_status_zero() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DelopayClient::new(config(&format!("http://{addr}")).with_max_retries(1)).unwrap();
    let error = client.payments().get("pay_123").await.unwrap_err();

    assert_eq!(error.status, 0);
    assert!(error.is_network_error());
    assert!(error.raw.is_some());
}

#[tokio::test]
async fn test_capture_answered_with_no_content_succeeds() {
    let recorder = Recorder::default();
    let base_url = spawn_server(recorder.clone()).await;
    let client = DelopayClient::new(config(&base_url)).unwrap();

    let captured = client.payments().capture("pay_1").await.unwrap();

    assert!(captured.is_none());
    assert_eq!(recorder.hits(), 1);
}
