//! REST client for the GED (document management) backend.
//!
//! Every call decodes its response once, at this boundary, into typed models.
//! Failures are logged here and returned as [`ApiError`]; nothing retries.

mod error;
mod form;
mod response;

pub use error::ApiError;
pub use form::{download_target, DocumentForm, Upload};
pub use response::{extract_error_detail, parse_content_disposition_filename, DownloadedFile};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::filter::FilterState;
use crate::models::{
    CategoryInput, ConsultantSummary, Document, DocumentCategory, DocumentStats, TenderFolders,
    TenderSummary,
};
use crate::session::Session;
use crate::view::DocumentSource;
use response::{decode_list, decode_one};

const DOCUMENTS: &str = "/documents/";
const CATEGORIES: &str = "/document-categories/";
const STATS: &str = "/document-stats/";
const TENDERS: &str = "/appels/";
const TENDERS_FALLBACK: &str = "/admin/appels-offres/";
const CONSULTANTS: &str = "/api_public_consultants/";
const CONSULTANTS_FALLBACK: &str = "/admin/consultants/";

/// HTTP client for the GED endpoints.
#[derive(Clone)]
pub struct GedClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl GedClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        session: Session,
    ) -> Result<Self, ApiError> {
        let parsed =
            url::Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Create a client from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(
            &settings.api_url,
            Duration::from_secs(settings.request_timeout),
            &settings.user_agent,
            settings.session.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(auth) = self.session.authorization_header() {
            request = request.header(header::AUTHORIZATION, auth);
        }
        request
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("{} failed: {}", what, e);
            ApiError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_error_detail(&body);
            warn!(
                "{} returned HTTP {}{}",
                what,
                status,
                detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
            );
            return Err(ApiError::Status { status, detail });
        }

        let bytes = response.bytes().await.map_err(|e| {
            warn!("{} body read failed: {}", what, e);
            ApiError::from(e)
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_list<T>(&self, path: &str, what: &str) -> Result<Vec<T>, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.send(self.request(Method::GET, path), what).await?;
        decode_list(&body).inspect_err(|e| warn!("{}: {}", what, e))
    }

    async fn get_one<T>(&self, path: &str, what: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = self.send(self.request(Method::GET, path), what).await?;
        decode_one(&body).inspect_err(|e| warn!("{}: {}", what, e))
    }

    /// Try `primary`, then `fallback` once. Both failing yields an empty list.
    async fn list_with_fallback<T>(&self, primary: &str, fallback: &str, what: &str) -> Vec<T>
    where
        T: serde::de::DeserializeOwned,
    {
        match self.get_list(primary, what).await {
            Ok(items) => items,
            Err(e) => {
                debug!("{}: {} failed ({}), trying {}", what, primary, e, fallback);
                match self.get_list(fallback, what).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!("{}: fallback {} failed too ({}), using empty list", what, fallback, e);
                        Vec::new()
                    }
                }
            }
        }
    }

    // Documents

    /// `GET /documents/` with the active filters.
    pub async fn list_documents(&self, filter: &FilterState) -> Result<Vec<Document>, ApiError> {
        let query = filter.to_query_string();
        let path = if query.is_empty() {
            DOCUMENTS.to_string()
        } else {
            format!("{}?{}", DOCUMENTS, query)
        };
        debug!("Listing documents: {}", path);
        self.get_list(&path, "List documents").await
    }

    /// `GET /documents/appel-offre/{id}/`: documents of one tender grouped by folder.
    pub async fn tender_folders(&self, tender_id: &str) -> Result<TenderFolders, ApiError> {
        let path = format!(
            "{}appel-offre/{}/",
            DOCUMENTS,
            urlencoding::encode(tender_id.trim())
        );
        self.get_one(&path, "Tender documents").await
    }

    pub async fn get_document(&self, id: i64) -> Result<Document, ApiError> {
        self.get_one(&format!("{}{}/", DOCUMENTS, id), "Get document")
            .await
    }

    /// `POST /documents/` as multipart. A file is required.
    pub async fn create_document(&self, form: &DocumentForm) -> Result<Document, ApiError> {
        form.validate(true)?;
        let request = self
            .request(Method::POST, DOCUMENTS)
            .multipart(form.to_multipart()?);
        let body = self.send(request, "Create document").await?;
        decode_one(&body)
    }

    /// `PUT /documents/{id}/` as multipart. The file is optional.
    pub async fn update_document(&self, id: i64, form: &DocumentForm) -> Result<Document, ApiError> {
        form.validate(false)?;
        let request = self
            .request(Method::PUT, &format!("{}{}/", DOCUMENTS, id))
            .multipart(form.to_multipart()?);
        let body = self.send(request, "Update document").await?;
        decode_one(&body)
    }

    pub async fn delete_document(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("{}{}/", DOCUMENTS, id));
        self.send(request, "Delete document").await.map(|_| ())
    }

    /// Absolute download URL, suitable for opening in a browser.
    pub fn download_url(&self, id: i64) -> String {
        self.url(&format!("{}{}/download/", DOCUMENTS, id))
    }

    /// Fetch the file behind [`GedClient::download_url`].
    pub async fn download_document(&self, id: i64) -> Result<DownloadedFile, ApiError> {
        let what = "Download document";
        let response = self
            .request(Method::GET, &format!("{}{}/download/", DOCUMENTS, id))
            .send()
            .await
            .map_err(|e| {
                warn!("{} failed: {}", what, e);
                ApiError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_error_detail(&body);
            warn!("{} returned HTTP {}", what, status);
            return Err(ApiError::Status { status, detail });
        }

        let header_str = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header_str(header::CONTENT_DISPOSITION)
            .and_then(|h| parse_content_disposition_filename(&h));
        let content_type = header_str(header::CONTENT_TYPE);

        let bytes = response.bytes().await?.to_vec();
        Ok(DownloadedFile {
            filename,
            content_type,
            bytes,
        })
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<DocumentCategory>, ApiError> {
        self.get_list(CATEGORIES, "List categories").await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<DocumentCategory, ApiError> {
        let request = self.request(Method::POST, CATEGORIES).json(input);
        let body = self.send(request, "Create category").await?;
        decode_one(&body)
    }

    pub async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<DocumentCategory, ApiError> {
        let request = self
            .request(Method::PUT, &format!("{}{}/", CATEGORIES, id))
            .json(input);
        let body = self.send(request, "Update category").await?;
        decode_one(&body)
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("{}{}/", CATEGORIES, id));
        self.send(request, "Delete category").await.map(|_| ())
    }

    // Stats and directories

    pub async fn stats(&self) -> Result<DocumentStats, ApiError> {
        self.get_one(STATS, "Document stats").await
    }

    /// Tenders for linking documents, from `/appels/` or the admin fallback.
    /// Both failing yields an empty list.
    pub async fn list_tenders(&self) -> Vec<TenderSummary> {
        self.list_with_fallback(TENDERS, TENDERS_FALLBACK, "List tenders")
            .await
    }

    /// Consultants for linking documents, with the same fallback rule.
    pub async fn list_consultants(&self) -> Vec<ConsultantSummary> {
        self.list_with_fallback(CONSULTANTS, CONSULTANTS_FALLBACK, "List consultants")
            .await
    }
}

#[async_trait]
impl DocumentSource for GedClient {
    async fn fetch_documents(&self, filter: &FilterState) -> Result<Vec<Document>, ApiError> {
        self.list_documents(filter).await
    }

    async fn fetch_tender_folders(&self, tender_id: &str) -> Result<TenderFolders, ApiError> {
        self.tender_folders(tender_id).await
    }

    async fn fetch_stats(&self) -> Result<DocumentStats, ApiError> {
        self.stats().await
    }

    async fn create_document(&self, form: &DocumentForm) -> Result<Document, ApiError> {
        GedClient::create_document(self, form).await
    }

    async fn update_document(&self, id: i64, form: &DocumentForm) -> Result<Document, ApiError> {
        GedClient::update_document(self, id, form).await
    }

    async fn delete_document(&self, id: i64) -> Result<(), ApiError> {
        GedClient::delete_document(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Result<GedClient, ApiError> {
        GedClient::new(base, Duration::from_secs(5), "ged-test", Session::anonymous())
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(client("not a url"), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(
            client("ftp://files.example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_download_url_trims_trailing_slash() {
        let c = client("http://localhost:8000/api/").unwrap();
        assert_eq!(
            c.download_url(42),
            "http://localhost:8000/api/documents/42/download/"
        );
    }
}
