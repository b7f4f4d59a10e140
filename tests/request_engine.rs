//! Request engine tests against a mocked Help Scout API.
//!
//! Covers envelope decoding per API version, create/update semantics and
//! the error taxonomy.

use helpscout::{
    conversation_count, Conversation, Create, Created, Credentials, Customer,
    CustomerUpdateParams, Get, HelpScoutClient, HelpScoutError, Mailbox, NewConversation,
    NewCustomer, PatchOperation, Update,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    basic_auth, bearer_token, body_partial_json, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn v1_client(server: &MockServer) -> HelpScoutClient {
    HelpScoutClient::builder(Credentials::api_key("test-key"))
        .base_url(server.uri())
        .build()
        .unwrap()
}

async fn v2_client(server: &MockServer) -> HelpScoutClient {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "bearer",
            "access_token": "test-token",
            "expires_in": 7200
        })))
        .mount(server)
        .await;

    HelpScoutClient::builder(Credentials::oauth2("app-id", "app-secret"))
        .base_url(server.uri())
        .build()
        .unwrap()
}

// =============================================================================
// Single items
// =============================================================================

#[tokio::test]
async fn test_v1_get_unwraps_item_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mailboxes/1234.json"))
        .and(basic_auth("test-key", "X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "item": {
                "id": 1234,
                "name": "Feedback",
                "slug": "47204a026903ce6d",
                "email": "feedback@parse.com"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mailbox = Mailbox::get(&v1_client(&server), 1234).await.unwrap().unwrap();
    assert_eq!(mailbox.name.as_deref(), Some("Feedback"));
}

#[tokio::test]
async fn test_v1_missing_item_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"item": null})))
        .mount(&server)
        .await;

    let customer = Customer::get(&v1_client(&server), 9).await.unwrap();
    assert!(customer.is_none());
}

#[tokio::test]
async fn test_v2_get_uses_bearer_token_and_bare_body() {
    let server = MockServer::start().await;
    let client = v2_client(&server).await;

    Mock::given(method("GET"))
        .and(path("/conversations/42"))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "number": 7,
            "subject": "Help",
            "threads": 1,
            "_embedded": {"threads": [{"id": 1, "type": "customer", "body": "Hi"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conversation = Conversation::get(&client, 42).await.unwrap().unwrap();
    assert_eq!(conversation.subject.as_deref(), Some("Help"));
    assert_eq!(conversation.thread_count, Some(1));
    assert_eq!(conversation.threads[0].body.as_deref(), Some("Hi"));
}

// =============================================================================
// Create / update
// =============================================================================

#[tokio::test]
async fn test_v1_create_customer_returns_echoed_item() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/customers.json"))
        .and(query_param("reload", "true"))
        .and(body_partial_json(json!({
            "firstName": "Vernon",
            "emails": [{"value": "bear@example.com"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "item": {"id": 77, "firstName": "Vernon"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = NewCustomer::create(
        &v1_client(&server),
        &NewCustomer::new("Vernon", "bear@example.com"),
    )
    .await
    .unwrap();

    let item = created.into_item().unwrap();
    assert_eq!(item["id"], 77);
}

#[tokio::test]
async fn test_v2_create_conversation_returns_location() {
    let server = MockServer::start().await;
    let client = v2_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/conversations"))
        .and(body_partial_json(json!({"mailboxId": 85, "subject": "Help"})))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", "https://api.helpscout.net/v2/conversations/123"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let conversation = NewConversation {
        mailbox_id: 85,
        subject: "Help".to_string(),
        customer_email: "a@example.com".to_string(),
        body: "It broke".to_string(),
        ..Default::default()
    };
    let created = NewConversation::create(&client, &conversation).await.unwrap();

    assert!(matches!(
        created,
        Created::Location(ref url) if url == "https://api.helpscout.net/v2/conversations/123"
    ));
}

#[tokio::test]
async fn test_create_validation_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = NewCustomer::create(&v1_client(&server), &NewCustomer::new("", "a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, HelpScoutError::Validation(_)));
}

#[tokio::test]
async fn test_update_no_content_is_success() {
    let server = MockServer::start().await;
    let client = v2_client(&server).await;

    Mock::given(method("PUT"))
        .and(path("/customers/5"))
        .and(body_partial_json(json!({"organization": "Acme"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let params = CustomerUpdateParams {
        organization: Some("Acme".to_string()),
        ..Default::default()
    };
    assert!(Customer::update(&client, &5, &params).await.unwrap());
}

#[tokio::test]
async fn test_v2_patch_sends_one_request_per_operation() {
    let server = MockServer::start().await;
    let client = v2_client(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/conversations/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let ops = [
        PatchOperation::replace("/subject", "New subject"),
        PatchOperation::replace("/status", "closed"),
    ];
    assert!(Conversation::patch(&client, 42, &ops).await.unwrap());
}

// =============================================================================
// Counts
// =============================================================================

#[tokio::test]
async fn test_v1_conversation_count_reads_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mailboxes/85/conversations.json"))
        .and(query_param("page", "1"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "pages": 3,
            "count": 42,
            "items": [{"id": 1}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let count = conversation_count(
        &v1_client(&server),
        85,
        Some(helpscout::ConversationStatusFilter::Active),
        None,
    )
    .await
    .unwrap();
    assert_eq!(count, 42);
}

// =============================================================================
// Error taxonomy
// =============================================================================

#[tokio::test]
async fn test_client_error_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations/1.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "message": "Not Found"
        })))
        .mount(&server)
        .await;

    let err = Conversation::get(&v1_client(&server), 1).await.unwrap_err();
    match err {
        HelpScoutError::Client { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message.as_deref(), Some("Not Found"));
        }
        other => panic!("Expected Client error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unprocessable_entity_surfaces_vendor_message() {
    let server = MockServer::start().await;
    let client = v2_client(&server).await;

    Mock::given(method("POST"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid email"
        })))
        .mount(&server)
        .await;

    let err = NewCustomer::create(&client, &NewCustomer::new("Ada", "not-an-email"))
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "Help Scout API error (422): Invalid email");
}

#[tokio::test]
async fn test_rejected_credentials_are_authentication_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 401,
            "error": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = helpscout::User::get(&v1_client(&server), 1).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_server_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mailboxes/1.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let err = Mailbox::get(&v1_client(&server), 1).await.unwrap_err();
    assert!(matches!(err, HelpScoutError::Server { status: 503 }));
    assert_eq!(err.to_string(), "Server Response: 503");
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mailboxes/1.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&server)
        .await;

    let err = Mailbox::get(&v1_client(&server), 1).await.unwrap_err();
    assert!(matches!(
        err,
        HelpScoutError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let client = HelpScoutClient::builder(Credentials::api_key("test-key"))
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let err = Mailbox::get(&client, 1).await.unwrap_err();
    assert!(matches!(err, HelpScoutError::Network(_)));
}

#[tokio::test]
async fn test_create_with_unexpected_success_status_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/customers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"item": {"id": 1}})))
        .mount(&server)
        .await;

    let err = NewCustomer::create(&v1_client(&server), &NewCustomer::new("Ada", "a@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, HelpScoutError::Server { status: 200 }));
}
