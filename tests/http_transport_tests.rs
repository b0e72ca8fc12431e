use items_provider::{
    FieldDefinition, HttpTransport, ItemsProvider, ItemsRequest, ProviderConfig, Query, Transport,
    TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_query() -> Query {
    Query {
        start: 0,
        length: 10,
        ..Default::default()
    }
}

// ── Transport directly ──────────────────────────────────────────

#[tokio::test]
async fn get_parses_success_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("start", "0"))
        .and(query_param("length", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordsFiltered": 2,
            "recordsTotal": 40,
            "data": [{"id": 1}, {"id": 2}]
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    let response = transport
        .get(&format!("{}/items", server.uri()), &page_query(), None)
        .await
        .unwrap();

    assert_eq!(response.records_filtered, 2);
    assert_eq!(response.records_total, 40);
    assert_eq!(response.data.unwrap().len(), 2);
}

#[tokio::test]
async fn get_sends_bracket_style_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("order[0][column]", "1"))
        .and(query_param("order[0][dir]", "desc"))
        .and(query_param("columns[0][search][value]", "q"))
        .and(query_param("columns[0][search][regex]", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordsFiltered": 0,
            "recordsTotal": 0,
            "data": []
        })))
        .mount(&server)
        .await;

    let fields = vec![FieldDefinition::new("a"), FieldDefinition::new("b")];
    let mut request = ItemsRequest::new(format!("{}/items", server.uri()));
    request.filter = Some("q".to_string());
    request.sort_fields = Some(HashMap::from([(
        "b".to_string(),
        items_provider::SortDirection::Desc,
    )]));

    let query = items_provider::translate(
        &fields,
        &request,
        &items_provider::ProviderDefaults::default(),
        false,
        |_, _| {},
    );

    let transport = HttpTransport::new();
    let response = transport.get(&request.api_url, &query, None).await.unwrap();
    assert_eq!(response.records_total, 0);
}

#[tokio::test]
async fn get_maps_http_status_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    let err = transport
        .get(&format!("{}/items", server.uri()), &page_query(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Status(500)));
}

#[tokio::test]
async fn get_maps_bad_body_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new();
    let err = transport
        .get(&format!("{}/items", server.uri()), &page_query(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn get_maps_connect_failure_to_network_error() {
    let transport = HttpTransport::new();
    // Port 1 should refuse the connection.
    let err = transport
        .get("http://127.0.0.1:1/items", &page_query(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Network(_)));
}

// ── End-to-end through the provider ─────────────────────────────

#[tokio::test]
async fn provider_retrieves_rows_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("start", "15"))
        .and(query_param("length", "15"))
        .and(query_param("search[value]", "alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recordsFiltered": 1,
            "recordsTotal": 31,
            "data": [{"name": "alice"}]
        })))
        .mount(&server)
        .await;

    let mut provider = ItemsProvider::new(ProviderConfig {
        transport: Some(Arc::new(HttpTransport::new())),
        fields: vec![FieldDefinition::new("name")],
        ..Default::default()
    });

    let request = ItemsRequest {
        current_page: 2,
        per_page: 15,
        filter: Some("alice".to_string()),
        ..ItemsRequest::new(format!("{}/users", server.uri()))
    };
    let items = provider.items(&request).await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "alice");
    assert_eq!(provider.total_rows(), 31);
}

#[tokio::test]
async fn provider_contains_http_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut provider = ItemsProvider::new(ProviderConfig {
        transport: Some(Arc::new(HttpTransport::new())),
        fields: vec![FieldDefinition::new("name")],
        ..Default::default()
    });

    let items = provider
        .items(&ItemsRequest::new(format!("{}/users", server.uri())))
        .await;

    assert!(items.is_empty());
}
