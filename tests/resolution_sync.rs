mod common;

use chrono::NaiveDate;
use dian_edi::domains::resolutions::{InMemoryResolutionStore, ResolutionStore, ResolutionSync};
use dian_edi::models::{ResolutionInput, ResolutionPatch};
use serde_json::json;
use shared::AppError;
use std::sync::Arc;
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sync(server: &MockServer) -> (ResolutionSync, Arc<InMemoryResolutionStore>) {
    let store = Arc::new(InMemoryResolutionStore::new());
    let sync = ResolutionSync::new(store.clone(), common::company(&server.uri()), reqwest::Client::new());
    (sync, store)
}

fn input(api_sync: bool) -> ResolutionInput {
    serde_json::from_value(json!({
        "api_sync": api_sync,
        "type_document_id": 1,
        "prefix": "SETP",
        "resolution": "18760000001",
        "resolution_date": "2019-01-19",
        "technical_key": "fc8eac422eba16e22ffd8c6f94b3f40a6e38162c",
        "from": 990000000,
        "to": 995000000,
        "date_from": "2019-01-19",
        "date_to": null
    }))
    .unwrap()
}

async fn mount_create(server: &MockServer, remote_id: i64) {
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/config/resolution"))
        .and(body_partial_json(json!({
            "type_document_id": 1,
            "prefix": "SETP",
            "date_to": "2000-01-01"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Resolución creada con éxito",
            "resolution": { "id": remote_id, "number": 990000000, "next_consecutive": "SETP990000000" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn create_goes_to_the_api_first() {
    let server = MockServer::start().await;
    mount_create(&server, 21).await;
    let (sync, store) = sync(&server);

    let created = sync.create(input(true)).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.resolution_id, Some(21));
    assert_eq!(created.next_consecutive.as_deref(), Some("SETP990000000"));
    assert_eq!(created.message.as_deref(), Some("Resolución creada con éxito"));
    assert_eq!(store.get(1), Some(created));
}

#[tokio::test]
async fn failed_create_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ubl2.1/config/resolution"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "El prefijo ya existe" })))
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);

    let err = sync.create(input(true)).await.unwrap_err();
    assert!(err.to_string().contains("El prefijo ya existe"));
    assert!(store.list().is_empty());
}

#[tokio::test]
async fn local_only_resolutions_skip_the_api() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);

    let created = sync.create(input(false)).await.unwrap();
    assert!(created.resolution_id.is_none());

    let patch = ResolutionPatch {
        to: Some(996000000),
        ..Default::default()
    };
    let updated = sync.update(created.id, patch).await.unwrap();
    assert_eq!(updated.to, 996000000);

    sync.delete(created.id).await.unwrap();
    assert!(store.list().is_empty());
}

#[tokio::test]
async fn invalid_range_is_refused_before_the_api() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    let (sync, _) = sync(&server);

    let mut bad = input(true);
    bad.from = 10;
    bad.to = 1;
    let err = sync.create(bad).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[tokio::test]
async fn update_sends_every_field() {
    let server = MockServer::start().await;
    mount_create(&server, 21).await;
    Mock::given(method("PUT"))
        .and(path("/api/ubl2.1/config/resolution/21"))
        .and(body_partial_json(json!({
            "prefix": "SETP",
            "to": 999000000,
            "technical_key": "fc8eac422eba16e22ffd8c6f94b3f40a6e38162c"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Resolución actualizada con éxito",
            "resolution": { "id": 21, "number": 990000005, "next_consecutive": "SETP990000005" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);
    let created = sync.create(input(true)).await.unwrap();

    let patch = ResolutionPatch {
        to: Some(999000000),
        ..Default::default()
    };
    let updated = sync.update(created.id, patch).await.unwrap();
    assert_eq!(updated.next_consecutive.as_deref(), Some("SETP990000005"));
    assert_eq!(store.get(created.id).map(|r| r.to), Some(999000000));
}

#[tokio::test]
async fn failed_delete_keeps_the_local_record() {
    let server = MockServer::start().await;
    mount_create(&server, 21).await;
    Mock::given(method("DELETE"))
        .and(path("/api/ubl2.1/config/resolution/21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "" })))
        .expect(1)
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);
    let created = sync.create(input(true)).await.unwrap();

    let err = sync.delete(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authentication { .. }));
    assert!(store.get(created.id).is_some());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let server = MockServer::start().await;
    let (sync, _) = sync(&server);
    let err = sync.delete(404).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn pull_imports_missing_resolutions() {
    let server = MockServer::start().await;
    mount_create(&server, 21).await;
    Mock::given(method("GET"))
        .and(path("/api/ubl2.1/config/resolutions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 21,
                "type_document_id": 1,
                "prefix": "SETP",
                "resolution": "18760000001",
                "from": 990000000,
                "to": 995000000
            },
            {
                "id": 30,
                "type_document_id": 5,
                "prefix": "NC",
                "resolution": null,
                "resolution_date": "1970-01-01",
                "technical_key": null,
                "from": 1,
                "to": 1000,
                "date_from": "2021-01-01 00:00:00",
                "date_to": "2031-01-01",
                "number": 45,
                "next_consecutive": "NC46"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);
    sync.create(input(true)).await.unwrap();

    let imported = sync.pull_remote().await.unwrap();
    assert_eq!(imported.len(), 1);
    let note = &imported[0];
    assert_eq!(note.id, 2);
    assert!(note.api_sync);
    assert_eq!(note.resolution_id, Some(30));
    assert_eq!(note.resolution_date, NaiveDate::from_ymd_opt(2000, 1, 1));
    assert_eq!(note.date_from, NaiveDate::from_ymd_opt(2021, 1, 1));
    assert_eq!(note.next_consecutive.as_deref(), Some("NC46"));
    assert_eq!(store.list().len(), 2);
}

#[tokio::test]
async fn concurrent_pulls_import_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ubl2.1/config/resolutions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 30, "type_document_id": 5, "prefix": "NC", "from": 1, "to": 1000 },
            { "id": 31, "type_document_id": 6, "prefix": "ND", "from": 1, "to": 1000 }
        ])))
        .expect(2)
        .mount(&server)
        .await;
    let (sync, store) = sync(&server);

    let (first, second) = tokio::join!(sync.pull_remote(), sync.pull_remote());
    let imported = first.unwrap().len() + second.unwrap().len();

    assert_eq!(imported, 2);
    assert_eq!(store.list().len(), 2);
    assert_eq!(store.find_by_remote_id(30).map(|r| r.type_document_id), Some(5));
}
