//! End-to-end tests over real HTTP against a local mock server.
//!
//! Run with: cargo test --test endpoint_tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scryfall_rs::prelude::*;
use scryfall_rs::ReqwestTransport;

fn settings_for(server: &MockServer) -> Settings {
    Settings::default()
        .with_protocol(Protocol::Http)
        .with_domain(server.address().to_string())
        .with_sleep_time(0.0)
}

fn client_for(settings: Settings) -> ScryfallClient {
    client_with_config(settings, TransportConfig::default())
}

fn client_with_config(settings: Settings, config: TransportConfig) -> ScryfallClient {
    common::init_logging();
    let transport = ReqwestTransport::new(&config).unwrap();
    ScryfallClient::with_transport(SharedSettings::new(settings), Arc::new(transport))
}

fn bulk_item(download_uri: String) -> SingleResponse {
    SingleResponse::new(
        "bulk_data.type",
        "http://localhost/bulk-data/x",
        json!({"download_uri": download_uri}),
    )
}

#[tokio::test]
async fn test_set_alias_and_child_hit_same_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sets/khm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "set",
            "code": "khm",
            "name": "Kaldheim",
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));

    let via_alias = client
        .endpoint("sets")
        .unwrap()
        .call(Args::new().param("code", "khm"))
        .await
        .unwrap();
    let via_child = client
        .endpoint("sets.code")
        .unwrap()
        .call(Args::new().arg("khm"))
        .await
        .unwrap();
    let via_service = client.sets().code("khm").await.unwrap();

    assert_eq!(via_alias.lookup("name").unwrap(), json!("Kaldheim"));
    assert_eq!(via_child.lookup("name").unwrap(), json!("Kaldheim"));
    assert_eq!(via_service.endpoint(), "sets.code");
    assert_eq!(
        via_service.url(),
        format!("http://{}/sets/khm", server.address())
    );
}

#[tokio::test]
async fn test_not_found_maps_to_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/xln/9999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "code": "not_found",
            "status": 404,
            "details": "No card found with the given ID or set code and collector number.",
        })))
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let err = client.cards().code("xln", 9999).await.unwrap_err();

    match err {
        Error::RemoteApi {
            status,
            ref code,
            ref details,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, "not_found");
            assert_eq!(
                details,
                "No card found with the given ID or set code and collector number."
            );
        }
        ref other => panic!("Expected RemoteApi error, got {other:?}"),
    }
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_settings_and_call_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/random"))
        .and(header("Accept", "application/json"))
        .and(header("X-Request-Tag", "per-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "card", "name": "Opt"})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server).with_header("Accept", "application/json");
    let client = client_for(settings);

    let card = client
        .endpoint("cards.random")
        .unwrap()
        .call(Args::new().header("X-Request-Tag", "per-call"))
        .await
        .unwrap();
    assert_eq!(card.lookup("name").unwrap(), json!("Opt"));
}

#[tokio::test]
async fn test_call_header_beats_settings_header_of_other_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/random"))
        .and(header("x-tag", "per-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"object": "card", "name": "Opt"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cards/random"))
        .respond_with(ResponseTemplate::new(418).set_body_string("settings header won"))
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server).with_header("x-tag", "global"));
    let card = client
        .endpoint("cards.random")
        .unwrap()
        .call(Args::new().header("X-Tag", "per-call"))
        .await
        .unwrap();
    assert_eq!(card.lookup("name").unwrap(), json!("Opt"));
}

#[tokio::test]
async fn test_search_follows_next_page() {
    let server = MockServer::start().await;
    let next = format!("http://{}/cards/search?q=t%3Agoblin&page=2", server.address());

    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "total_cards": 3,
            "has_more": false,
            "data": [{"name": "Goblin Guide"}],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", "t:goblin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "total_cards": 3,
            "has_more": true,
            "next_page": next,
            "data": [{"name": "Goblin Bushwhacker"}, {"name": "Goblin Lackey"}],
        })))
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let names: Vec<_> = client
        .cards()
        .search("t:goblin")
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap()
        .into_iter()
        .map(|card| card["name"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(names, vec!["Goblin Bushwhacker", "Goblin Lackey", "Goblin Guide"]);
}

#[tokio::test]
async fn test_rulings_through_partial_binding() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/multiverse/409574/rulings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "has_more": false,
            "data": [{"object": "ruling", "comment": "It's a ruling."}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let mut response = client
        .endpoint("cards.multiverse")
        .unwrap()
        .with(Args::new().param("id", 409574))
        .unwrap()
        .child("rulings")
        .unwrap()
        .call(Args::new())
        .await
        .unwrap();

    let rulings = response.as_paginated().unwrap();
    assert_eq!(rulings.len(), 1);
    assert_eq!(rulings.total(), Some(1));
    assert_eq!(rulings.get(0).await.unwrap()["object"], json!("ruling"));
}

#[tokio::test]
async fn test_catalog_name_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/keyword-abilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "catalog",
            "total_values": 2,
            "data": ["Flying", "Trample"],
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let by_name = client.catalog().get(" Keyword_Abilities ").await.unwrap();
    let by_accessor = client.catalog().keyword_abilities().await.unwrap();

    assert_eq!(by_name.buffered(), by_accessor.buffered());
    assert_eq!(by_name.total(), Some(2));
    assert_eq!(by_name.lookup("object").unwrap(), json!("catalog"));
}

#[tokio::test]
async fn test_collection_posts_identifiers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cards/collection"))
        .and(body_json(json!({
            "identifiers": [
                {"name": "Opt"},
                {"collector_number": "96", "set": "xln"},
                {"name": "Not A Card"},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "not_found": [{"name": "Not A Card"}],
            "data": [{"name": "Opt"}, {"name": "Costly Plunder"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let found = client
        .cards()
        .collection(&[
            CardIdentifier::name("Opt"),
            CardIdentifier::collector_number("xln", "96"),
            CardIdentifier::name("Not A Card"),
        ])
        .await
        .unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found.not_found(), &[json!({"name": "Not A Card"})]);
}

#[tokio::test]
async fn test_collection_limits_checked_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let too_many = vec![CardIdentifier::name("Opt"); 76];

    assert!(matches!(
        client.cards().collection(&[]).await,
        Err(Error::TooFewIdentifiers)
    ));
    assert!(matches!(
        client.cards().collection(&too_many).await,
        Err(Error::TooManyIdentifiers { max: 75, given: 76 })
    ));
}

#[tokio::test]
async fn test_bulk_download_to_directory() {
    let server = MockServer::start().await;
    let payload = br#"[{"object":"card","name":"Opt"},{"object":"card","name":"Shock"}]"#;
    let download_uri = format!("http://{}/file/oracle-cards-20240101.json", server.address());

    Mock::given(method("GET"))
        .and(path("/bulk-data/oracle_cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "bulk_data",
            "type": "oracle_cards",
            "download_uri": download_uri,
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file/oracle-cards-20240101.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server).with_chunk_size(7));
    let bulk = client.bulk_data();
    let item = bulk.by_type("oracle_cards").await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let saved = bulk.download_to_dir(&item, Some(dir.path())).await.unwrap();
    assert_eq!(saved, dir.path().join("oracle-cards-20240101.json"));
    assert_eq!(std::fs::read(&saved).unwrap(), payload.to_vec());

    let mut sink = Vec::new();
    let written = bulk.download(&item, &mut sink).await.unwrap();
    assert_eq!(written, payload.len() as u64);
    assert_eq!(sink, payload.to_vec());
}

#[tokio::test]
async fn test_failed_download_leaves_no_file() {
    let server = MockServer::start().await;
    let download_uri = format!("http://{}/file/missing.json", server.address());
    Mock::given(method("GET"))
        .and(path("/file/missing.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let client = client_for(settings_for(&server));
    let item = bulk_item(download_uri);

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .bulk_data()
        .download_to_dir(&item, Some(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RemoteApi { status: 404, .. }));
    assert!(!dir.path().join("missing.json").exists());
}

#[tokio::test]
async fn test_failed_redownload_keeps_existing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file/oracle.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("oracle.json");
    std::fs::write(&existing, b"[previous export]").unwrap();

    let client = client_for(settings_for(&server));
    let item = bulk_item(format!("http://{}/file/oracle.json", server.address()));
    let err = client
        .bulk_data()
        .download_to_dir(&item, Some(dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RemoteApi { status: 503, .. }));
    assert_eq!(std::fs::read(&existing).unwrap(), b"[previous export]".to_vec());
    // No temporary file is left next to it.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_redownload_replaces_existing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/file/oracle.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[new export]".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("oracle.json"), b"[previous export, longer]").unwrap();

    let client = client_for(settings_for(&server));
    let item = bulk_item(format!("http://{}/file/oracle.json", server.address()));
    let saved = client
        .bulk_data()
        .download_to_dir(&item, Some(dir.path()))
        .await
        .unwrap();

    assert_eq!(std::fs::read(&saved).unwrap(), b"[new export]".to_vec());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_encoded_separators_stay_in_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[]".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bulk");
    std::fs::create_dir(&target).unwrap();

    let client = client_for(settings_for(&server));
    let item = bulk_item(format!("http://{}/file/..%2Fevil.json", server.address()));
    let saved = client
        .bulk_data()
        .download_to_dir(&item, Some(&target))
        .await
        .unwrap();

    assert_eq!(saved.parent(), Some(target.as_path()));
    assert!(!dir.path().join("evil.json").exists());
}

#[tokio::test]
async fn test_total_timeout_spares_streamed_downloads() {
    let server = MockServer::start().await;
    let slow = || {
        ResponseTemplate::new(200)
            .set_body_json(json!({"object": "card", "name": "Opt"}))
            .set_delay(Duration::from_millis(400))
    };
    Mock::given(method("GET"))
        .and(path("/cards/random"))
        .respond_with(slow())
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file/oracle.json"))
        .respond_with(slow())
        .expect(1)
        .mount(&server)
        .await;

    let config = TransportConfig::default()
        .with_timeout(Duration::from_millis(200))
        .with_read_timeout(Duration::from_secs(5));
    let client = client_with_config(settings_for(&server), config);

    let err = client.cards().random().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));

    let item = bulk_item(format!("http://{}/file/oracle.json", server.address()));
    let mut sink = Vec::new();
    let written = client.bulk_data().download(&item, &mut sink).await.unwrap();
    assert_eq!(written, sink.len() as u64);
    assert!(written > 0);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    common::init_logging();
    let settings = Settings::default()
        .with_protocol(Protocol::Http)
        .with_domain("127.0.0.1:9")
        .with_sleep_time(0.0);
    let client = ScryfallClient::with_config(settings, TransportConfig::default()).unwrap();

    let err = client.cards().random().await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(!err.is_usage_error());
}
