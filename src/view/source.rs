//! Data source seam for the view controller.

use async_trait::async_trait;

use crate::api::{ApiError, DocumentForm};
use crate::filter::FilterState;
use crate::models::{Document, DocumentStats, TenderFolders};

/// Backend operations the document view needs.
///
/// [`crate::api::GedClient`] is the production implementation.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Flat list honoring every filter.
    async fn fetch_documents(&self, filter: &FilterState) -> Result<Vec<Document>, ApiError>;

    /// Documents of one tender, grouped server-side.
    async fn fetch_tender_folders(&self, tender_id: &str) -> Result<TenderFolders, ApiError>;

    async fn fetch_stats(&self) -> Result<DocumentStats, ApiError>;

    async fn create_document(&self, form: &DocumentForm) -> Result<Document, ApiError>;

    async fn update_document(&self, id: i64, form: &DocumentForm) -> Result<Document, ApiError>;

    async fn delete_document(&self, id: i64) -> Result<(), ApiError>;
}
