//! View controller driven end to end against a mock backend.

use std::time::Duration;

use ged_admin::api::{DocumentForm, GedClient, Upload};
use ged_admin::filter::FilterField;
use ged_admin::models::FolderType;
use ged_admin::session::Session;
use ged_admin::view::{FetchRequest, NotificationLevel, ViewController, ViewMode};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GedClient {
    GedClient::new(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        "ged-test",
        Session::anonymous(),
    )
    .unwrap()
}

async fn mock_documents(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mock_stats(server: &MockServer, total: u64) {
    Mock::given(method("GET"))
        .and(path("/api/document-stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_documents": total,
            "documents_by_type": {},
            "recent_documents": []
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_grouped_with_tender_fetches_scoped_then_unscoped_on_clear() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/appel-offre/12/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "appel_offre": {"id": 12, "nom_projet": "Pont"},
            "documents_by_folder": {
                "TECHNIQUE": {"label": "Technique", "documents": [{"id": 1, "title": "Note"}]}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mock_documents(
        &server,
        json!([
            {"id": 1, "title": "Note", "folder_type": "TECHNIQUE"},
            {"id": 2, "title": "Facture", "folder_type": "FINANCE"}
        ]),
    )
    .await;

    let client = client_for(&server);
    let mut view = ViewController::new();
    view.set_filter(FilterField::AppelOffreId, Some("12"));

    let scoped = view.set_mode(ViewMode::GroupedByFolder).unwrap();
    assert_eq!(scoped.request(), &FetchRequest::GroupedScoped("12".to_string()));
    assert!(view.run(&client, scoped).await);
    assert_eq!(view.tender().map(|t| t.id), Some(12));
    assert_eq!(view.folders().total_documents(), 1);
    assert_eq!(view.folders().len(), 6);

    let unscoped = view.set_filter(FilterField::AppelOffreId, None).unwrap();
    assert_eq!(unscoped.request(), &FetchRequest::GroupedAll);
    assert!(view.run(&client, unscoped).await);
    assert!(view.tender().is_none());
    assert_eq!(view.folders().total_documents(), 2);
    assert_eq!(view.folders().get("FINANCE").unwrap().documents[0].id, 2);
    assert!(view.take_notifications().is_empty());
}

#[tokio::test]
async fn test_grouped_all_keeps_unknown_folder() {
    let server = MockServer::start().await;
    mock_documents(
        &server,
        json!([
            {"id": 1, "title": "A", "folder_type": "FINANCE"},
            {"id": 2, "title": "B"},
            {"id": 3, "title": "C", "folder_type": "JURIDIQUE"}
        ]),
    )
    .await;

    let client = client_for(&server);
    let mut view = ViewController::with_mode(ViewMode::GroupedByFolder);
    let tickets = view.mount();
    let ticket = tickets.into_iter().next().unwrap();
    view.run(&client, ticket).await;

    let folders = view.folders();
    assert_eq!(folders.len(), 7);
    assert_eq!(folders.total_documents(), 3);
    assert_eq!(folders.get("GENERAL").unwrap().documents[0].id, 2);
    assert_eq!(folders.get("JURIDIQUE").unwrap().documents[0].id, 3);
    assert!(folders.get("ADMIN").unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_documents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Offre technique"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "base indisponible"})))
        .mount(&server)
        .await;
    mock_stats(&server, 1).await;

    let client = client_for(&server);
    let mut view = ViewController::new();
    let tickets = view.mount();
    view.run_all(&client, tickets).await;
    assert_eq!(view.documents().len(), 1);
    assert!(view.take_notifications().is_empty());

    let ticket = view.set_filter(FilterField::Search, Some("offre")).unwrap();
    view.run(&client, ticket).await;

    assert_eq!(view.documents().len(), 1);
    assert!(!view.is_loading());
    let notes = view.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].detail.as_deref(), Some("base indisponible"));
}

#[tokio::test]
async fn test_create_refreshes_documents_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/documents/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 10, "title": "Budget", "folder_type": "FINANCE"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mock_documents(&server, json!([{"id": 10, "title": "Budget", "folder_type": "FINANCE"}]))
        .await;
    mock_stats(&server, 1).await;

    let client = client_for(&server);
    let mut view = ViewController::new();
    let form = DocumentForm {
        folder_type: FolderType::Finance,
        file: Some(Upload::new("budget.csv", b"poste;montant".to_vec())),
        ..DocumentForm::new("Budget")
    };

    let created = view.create(&client, &form).await.unwrap();
    assert_eq!(created.id, 10);
    assert_eq!(view.documents().len(), 1);
    assert_eq!(view.stats().map(|s| s.total_documents), Some(1));

    let notes = view.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_failed_delete_notifies_without_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/documents/4/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Vous n'avez pas la permission d'effectuer cette action."
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = ViewController::new();
    assert!(!view.delete(&client, 4).await);

    let notes = view.take_notifications();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].is_error());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
