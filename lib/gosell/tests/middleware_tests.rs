//! Integration tests for transport middleware.

use assert2::check;
use bytes::Bytes;
use gosell::middleware::LoggingLayer;
use gosell::tower::util::MapRequestLayer;
use gosell::{ApiClient, Credentials, HyperTransport, Method, Request, Token};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn credentials() -> Credentials {
    Credentials::new("sk_test_1", "com.example.shop").expect("credentials")
}

fn token_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "id": "tok_123",
        "object": "token"
    }))
}

/// Test that logging middleware doesn't break request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tokens/tok_123"))
        .and(header("Authorization", "Bearer sk_test_1"))
        .respond_with(token_response())
        .mount(&mock_server)
        .await;

    let client = ApiClient::builder(credentials())
        .base_url(format!("{}/v1/", mock_server.uri()))
        .transport(
            HyperTransport::builder()
                .allow_http()
                .with_debug_logging()
                .build(),
        )
        .build()
        .expect("client");
    let request = client
        .request(Method::Get, "tokens/tok_123")
        .expect("request")
        .build();

    let token: Token = client.perform_request(request, true).await.expect("token");
    check!(token.identifier == "tok_123");
}

/// Test that a custom tower layer sees the authenticated request.
#[tokio::test]
async fn test_custom_layer_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tokens/tok_123"))
        .and(header("application", "com.example.shop"))
        .and(header("Accept-Language", "ar"))
        .respond_with(token_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let add_language = MapRequestLayer::new(|request: Request<Bytes>| {
        let (method, url, mut headers, body) = request.into_parts();
        headers.insert("Accept-Language".to_string(), "ar".to_string());
        Request::from_parts(method, url, headers, body)
    });

    let transport = HyperTransport::builder()
        .allow_http()
        .layer(LoggingLayer::debug())
        .layer(add_language)
        .build();

    let client = ApiClient::builder(credentials())
        .base_url(format!("{}/v1/", mock_server.uri()))
        .transport(transport)
        .build()
        .expect("client");
    let request = client
        .request(Method::Get, "tokens/tok_123")
        .expect("request")
        .build();

    let token: Token = client.perform_request(request, true).await.expect("token");
    check!(token.identifier == "tok_123");
}
