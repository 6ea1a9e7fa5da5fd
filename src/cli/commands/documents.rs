//! Document commands: listing, grouped view and mutations.

use std::path::Path;

use console::style;
use serde::Serialize;

use crate::api::{download_target, DocumentForm, GedClient, Upload};
use crate::cli::helpers::{
    confirm, format_number, print_notifications, print_stats_line, truncate,
};
use crate::config::Settings;
use crate::filter::FilterField;
use crate::folders::FolderView;
use crate::models::{Document, TenderSummary};
use crate::view::{FetchRequest, ViewController, ViewMode};

use super::{DocumentFields, FilterArgs, OutputFormat};

fn print_document_table(documents: &[Document]) {
    println!(
        "{:<6} {:<40} {:<14} {:<14} {:<6} {:<10}",
        "ID", "Title", "Type", "Folder", "File", "Size"
    );
    println!("{}", "-".repeat(95));
    for doc in documents {
        println!(
            "{:<6} {:<40} {:<14} {:<14} {:<6} {:<10}",
            doc.id,
            truncate(&doc.title, 39),
            doc.document_type.label(),
            truncate(doc.folder_key().label(), 13),
            doc.file_kind().as_str(),
            doc.file_size_display
        );
    }
}

/// Run the view's initial fetches and print what they reported.
///
/// Only a failed document fetch is an error. Stats are secondary: their
/// failure is printed and the listing still renders.
async fn load(view: &mut ViewController, client: &GedClient) -> anyhow::Result<()> {
    let mut failure = None;
    for ticket in view.mount() {
        let result = ViewController::execute(client, ticket.request()).await;
        if let Err(ref e) = result {
            if !matches!(ticket.request(), FetchRequest::Stats) && failure.is_none() {
                failure = Some(e.user_message());
            }
        }
        view.complete(ticket, result);
    }
    print_notifications(view);

    match failure {
        Some(message) => Err(anyhow::anyhow!(message)),
        None => Ok(()),
    }
}

/// List documents with the flat view's filters.
pub async fn cmd_ls(
    client: &GedClient,
    filters: &FilterArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut view = ViewController::new();
    for (field, value) in filters.values() {
        // Only the fetch issued by mount below is run
        let _ = view.set_filter(field, value);
    }
    load(&mut view, client).await?;

    let documents = view.documents();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(documents)?),
        OutputFormat::Ids => {
            for doc in documents {
                println!("{}", doc.id);
            }
        }
        OutputFormat::Table => {
            if documents.is_empty() {
                println!("{} No documents found", style("!").yellow());
                return Ok(());
            }
            println!("\n{}", style("Documents").bold());
            println!("{}", "-".repeat(95));
            print_document_table(documents);

            let total = view
                .stats()
                .map(|s| format!(" of {}", format_number(s.total_documents)))
                .unwrap_or_default();
            println!(
                "\n{} document(s){}",
                format_number(documents.len() as u64),
                total
            );
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct GroupedOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    appel_offre: Option<&'a TenderSummary>,
    folders: &'a FolderView,
}

/// Show documents grouped by folder, scoped to a tender when one is given.
///
/// The grouped endpoints take no filter besides the tender; any other
/// filter in `filters` is reported as not applied.
pub async fn cmd_folders(
    client: &GedClient,
    filters: &FilterArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut view = ViewController::with_mode(ViewMode::GroupedByFolder);
    for (field, value) in filters.values() {
        // Only the fetch issued by mount below is run
        let _ = view.set_filter(field, value);
        if field != FilterField::AppelOffreId && view.filter().get(field).is_some() {
            eprintln!(
                "{} --{} is not applied by the folder view",
                style("!").yellow(),
                cli_flag(field)
            );
        }
    }

    load(&mut view, client).await?;

    let folders = view.folders();
    match format {
        OutputFormat::Json => {
            let out = GroupedOutput {
                appel_offre: view.tender(),
                folders,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Ids => {
            for (_, bucket) in folders.iter() {
                for doc in &bucket.documents {
                    println!("{}", doc.id);
                }
            }
        }
        OutputFormat::Table => {
            let heading = match view.tender() {
                Some(t) => format!("Documents of {}", t.display_name()),
                None => "Documents by folder".to_string(),
            };
            println!("\n{}", style(heading).bold());
            println!("{}", "-".repeat(60));

            for (key, bucket) in folders.iter() {
                let count = style(format!("({})", bucket.documents.len())).dim();
                println!("{} {} {}", style(&bucket.label).cyan(), count, style(key).dim());
                for doc in &bucket.documents {
                    println!(
                        "  {:<6} {:<40} {:<14} {}",
                        doc.id,
                        truncate(&doc.title, 39),
                        doc.document_type.label(),
                        doc.file_size_display
                    );
                }
            }

            println!(
                "\n{} document(s) in {} folder(s)",
                format_number(folders.total_documents() as u64),
                folders.len()
            );
        }
    }

    Ok(())
}

fn cli_flag(field: FilterField) -> &'static str {
    match field {
        FilterField::DocumentType => "type",
        FilterField::CategoryId => "category",
        FilterField::FolderType => "folder",
        FilterField::AppelOffreId => "tender",
        FilterField::Search => "search",
    }
}

/// Upload a new document.
pub async fn cmd_upload(
    client: &GedClient,
    settings: &Settings,
    file: &Path,
    title: &str,
    fields: &DocumentFields,
) -> anyhow::Result<()> {
    let mut form = DocumentForm::new(title);
    fields.apply(&mut form)?;
    form.use_kdrive = form.use_kdrive || settings.use_kdrive;
    form.file = Some(Upload::from_path(file).await?);

    let mut view = ViewController::new();
    let created = view.create(client, &form).await;
    print_notifications(&mut view);
    let doc = created.ok_or_else(|| anyhow::anyhow!("Upload of {} failed", file.display()))?;

    println!(
        "  {} #{} {} ({})",
        style("→").dim(),
        doc.id,
        doc.title,
        doc.folder_key().label()
    );
    print_stats_line(&view);
    Ok(())
}

/// Edit an existing document. Unset flags keep their current values.
pub async fn cmd_edit(
    client: &GedClient,
    settings: &Settings,
    id: i64,
    title: Option<&str>,
    file: Option<&Path>,
    fields: &DocumentFields,
) -> anyhow::Result<()> {
    let existing = client
        .get_document(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let mut form = DocumentForm::from_document(&existing);
    if let Some(title) = title {
        form.title = title.to_string();
    }
    fields.apply(&mut form)?;
    form.use_kdrive = form.use_kdrive || settings.use_kdrive;
    if let Some(path) = file {
        form.file = Some(Upload::from_path(path).await?);
    }

    let mut view = ViewController::new();
    let updated = view.update(client, id, &form).await;
    print_notifications(&mut view);
    if updated.is_none() {
        anyhow::bail!("Update of document #{} failed", id);
    }
    print_stats_line(&view);
    Ok(())
}

/// Delete a document after confirmation.
pub async fn cmd_rm(client: &GedClient, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let doc = client.get_document(id).await?;
        println!("Document #{}: {}", doc.id, style(&doc.title).bold());
        if !confirm("Delete this document?")? {
            println!("{} Cancelled", style("!").yellow());
            return Ok(());
        }
    }

    let mut view = ViewController::new();
    let deleted = view.delete(client, id).await;
    print_notifications(&mut view);
    if !deleted {
        anyhow::bail!("Deletion of document #{} failed", id);
    }
    print_stats_line(&view);
    Ok(())
}

/// Download a document file, or print its URL.
pub async fn cmd_download(
    client: &GedClient,
    settings: &Settings,
    id: i64,
    output: Option<&Path>,
    url_only: bool,
) -> anyhow::Result<()> {
    if url_only {
        println!("{}", client.download_url(id));
        return Ok(());
    }

    let file = client.download_document(id).await?;
    let target = match output {
        Some(path) if path.is_dir() => download_target(path, file.filename.as_deref(), id),
        Some(path) => path.to_path_buf(),
        None => download_target(&settings.download_dir, file.filename.as_deref(), id),
    };

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, &file.bytes).await?;

    println!(
        "{} Saved {} ({} bytes)",
        style("✓").green(),
        target.display(),
        format_number(file.bytes.len() as u64)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::session::Session;
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

    async fn mock_documents(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/documents/"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    async fn mock_stats(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/document-stats/"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn stats_body() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "total_documents": 1,
            "documents_by_type": {"CV": 1},
            "recent_documents": []
        }))
    }

    async fn requested_paths(server: &MockServer) -> Vec<String> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_folders_with_tender_uses_scoped_endpoint() {
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
        mock_documents(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
        mock_stats(&server, stats_body()).await;

        let filters = FilterArgs {
            tender: Some("12".to_string()),
            document_type: Some("CV".to_string()),
            ..Default::default()
        };
        cmd_folders(&client_for(&server), &filters, OutputFormat::Ids)
            .await
            .unwrap();

        let paths = requested_paths(&server).await;
        assert!(paths.contains(&"/api/documents/appel-offre/12/".to_string()));
        assert!(!paths.contains(&"/api/documents/".to_string()));
    }

    #[tokio::test]
    async fn test_folders_without_tender_lists_all_documents() {
        let server = MockServer::start().await;
        mock_documents(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 2, "title": "Facture", "folder_type": "FINANCE"}])),
        )
        .await;
        mock_stats(&server, stats_body()).await;

        cmd_folders(&client_for(&server), &FilterArgs::default(), OutputFormat::Json)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let list = requests
            .iter()
            .find(|r| r.url.path() == "/api/documents/")
            .unwrap();
        assert_eq!(list.url.query(), None);
    }

    #[tokio::test]
    async fn test_ls_succeeds_when_only_stats_fail() {
        let server = MockServer::start().await;
        mock_documents(
            &server,
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "CV Dupont"}])),
        )
        .await;
        mock_stats(&server, ResponseTemplate::new(500)).await;

        let result = cmd_ls(&client_for(&server), &FilterArgs::default(), OutputFormat::Table).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_ls_fails_when_documents_fail() {
        let server = MockServer::start().await;
        mock_documents(
            &server,
            ResponseTemplate::new(500).set_body_json(json!({"error": "base indisponible"})),
        )
        .await;
        mock_stats(&server, stats_body()).await;

        let err = cmd_ls(&client_for(&server), &FilterArgs::default(), OutputFormat::Ids)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("base indisponible"));
    }

    #[tokio::test]
    async fn test_rm_succeeds_when_refresh_stats_fail() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/documents/4/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        mock_documents(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
        mock_stats(&server, ResponseTemplate::new(503)).await;

        assert!(cmd_rm(&client_for(&server), 4, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_rm_fails_when_delete_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/documents/4/"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        assert!(cmd_rm(&client_for(&server), 4, true).await.is_err());
    }

    #[tokio::test]
    async fn test_edit_sends_kdrive_from_settings() {
        let server = MockServer::start().await;
        let doc = json!({"id": 5, "title": "Rapport final", "folder_type": "TECHNIQUE"});
        Mock::given(method("GET"))
            .and(path("/api/documents/5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc.clone()))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/documents/5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doc))
            .expect(1)
            .mount(&server)
            .await;
        mock_documents(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;
        mock_stats(&server, stats_body()).await;

        let settings = Settings {
            use_kdrive: true,
            ..Settings::default()
        };
        cmd_edit(
            &client_for(&server),
            &settings,
            5,
            Some("Rapport final v2"),
            None,
            &DocumentFields::default(),
        )
        .await
        .unwrap();

        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.as_str() == "PUT")
            .unwrap();
        let body = String::from_utf8_lossy(&put.body);
        assert!(body.contains("name=\"use_kdrive\"\r\n\r\ntrue"));
        assert!(body.contains("Rapport final v2"));
    }
}
