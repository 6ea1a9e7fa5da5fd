//! Document view controller.
//!
//! The controller is an explicit state machine over view mode, filters and
//! loaded data. Events (`mount`, `set_mode`, `set_filter`, `after_mutation`)
//! do no I/O; they return [`Ticket`]s describing what to fetch. A ticket is
//! executed against a [`DocumentSource`] and its result handed back to
//! [`ViewController::complete`], which applies it only if no newer request
//! for the same resource has been issued since. Superseded responses are
//! dropped, so a slow early response can never overwrite a newer one.
//!
//! Failures keep the previous data in place and raise exactly one
//! notification. Nothing is retried.

mod notification;
mod source;

pub use notification::{Notification, NotificationLevel};
pub use source::DocumentSource;

use tracing::{debug, warn};

use crate::api::{ApiError, DocumentForm};
use crate::filter::{FilterField, FilterState};
use crate::folders::FolderView;
use crate::models::{Document, DocumentStats, TenderSummary};

/// How documents are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    FlatList,
    GroupedByFolder,
}

/// A fetch the view needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// `GET /documents/` with every active filter.
    Flat(FilterState),
    /// Server-side grouping of one tender's documents.
    GroupedScoped(String),
    /// All documents, grouped client-side.
    GroupedAll,
    Stats,
}

impl FetchRequest {
    fn resource(&self) -> Resource {
        match self {
            FetchRequest::Stats => Resource::Stats,
            _ => Resource::Documents,
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            FetchRequest::Stats => "Erreur lors du chargement des statistiques",
            _ => "Erreur lors du chargement des documents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Documents,
    Stats,
}

/// An issued request, tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    request: FetchRequest,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &FetchRequest {
        &self.request
    }
}

/// Data produced by a fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Documents(Vec<Document>),
    Folders {
        tender: Option<TenderSummary>,
        view: FolderView,
    },
    Stats(DocumentStats),
}

/// State of the document library screen.
#[derive(Debug, Default)]
pub struct ViewController {
    mode: ViewMode,
    filter: FilterState,
    loading: bool,
    documents: Vec<Document>,
    folders: FolderView,
    tender: Option<TenderSummary>,
    stats: Option<DocumentStats>,
    notifications: Vec<Notification>,
    next_id: u64,
    latest_documents: Option<u64>,
    latest_stats: Option<u64>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Flat list data, last successful load.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Grouped data, last successful load.
    pub fn folders(&self) -> &FolderView {
        &self.folders
    }

    /// Tender the grouped view is scoped to, when the server sent it.
    pub fn tender(&self) -> Option<&TenderSummary> {
        self.tender.as_ref()
    }

    pub fn stats(&self) -> Option<&DocumentStats> {
        self.stats.as_ref()
    }

    /// Drain pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Fetch matching the current mode and filters.
    pub fn current_request(&self) -> FetchRequest {
        match self.mode {
            ViewMode::FlatList => FetchRequest::Flat(self.filter.clone()),
            ViewMode::GroupedByFolder => match self.filter.tender_id() {
                Some(id) => FetchRequest::GroupedScoped(id.to_string()),
                None => FetchRequest::GroupedAll,
            },
        }
    }

    fn issue(&mut self, request: FetchRequest) -> Ticket {
        self.next_id += 1;
        let id = self.next_id;
        match request.resource() {
            Resource::Documents => {
                self.latest_documents = Some(id);
                self.loading = true;
            }
            Resource::Stats => self.latest_stats = Some(id),
        }
        Ticket { id, request }
    }

    // Events

    /// Initial load: current view plus stats.
    pub fn mount(&mut self) -> Vec<Ticket> {
        let current = self.current_request();
        vec![self.issue(current), self.issue(FetchRequest::Stats)]
    }

    /// Switch presentation mode. Switching reloads through the new mode's path.
    pub fn set_mode(&mut self, mode: ViewMode) -> Option<Ticket> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        let request = self.current_request();
        Some(self.issue(request))
    }

    /// Write one filter field.
    ///
    /// Flat mode refetches on any change. Grouped mode refetches only when the
    /// tender changes, since the grouped endpoints take no other filter; the
    /// new value is still kept for the next flat load.
    pub fn set_filter(&mut self, field: FilterField, value: Option<&str>) -> Option<Ticket> {
        if !self.filter.set(field, value) {
            return None;
        }
        match (self.mode, field) {
            (ViewMode::FlatList, _) | (ViewMode::GroupedByFolder, FilterField::AppelOffreId) => {
                let request = self.current_request();
                Some(self.issue(request))
            }
            (ViewMode::GroupedByFolder, _) => {
                debug!("Filter {} ignored by grouped view", field);
                None
            }
        }
    }

    /// Reset all filters, refetching like any other filter change would.
    pub fn clear_filters(&mut self) -> Option<Ticket> {
        if self.filter.is_empty() {
            return None;
        }
        let had_tender = self.filter.tender_id().is_some();
        self.filter.clear();
        if self.mode == ViewMode::GroupedByFolder && !had_tender {
            return None;
        }
        let request = self.current_request();
        Some(self.issue(request))
    }

    /// Refetch after a create, update or delete: current view plus stats.
    pub fn after_mutation(&mut self) -> Vec<Ticket> {
        self.mount()
    }

    // Completion

    /// Apply a finished fetch. Returns `false` when the ticket was superseded.
    pub fn complete(&mut self, ticket: Ticket, result: Result<FetchOutcome, ApiError>) -> bool {
        let resource = ticket.request.resource();
        let latest = match resource {
            Resource::Documents => self.latest_documents,
            Resource::Stats => self.latest_stats,
        };
        if latest != Some(ticket.id) {
            debug!(
                "Dropping stale response #{} ({:?}), latest is {:?}",
                ticket.id, ticket.request, latest
            );
            return false;
        }

        if resource == Resource::Documents {
            self.loading = false;
        }

        match result {
            Ok(FetchOutcome::Documents(docs)) => self.documents = docs,
            Ok(FetchOutcome::Folders { tender, view }) => {
                self.folders = view;
                self.tender = tender;
            }
            Ok(FetchOutcome::Stats(stats)) => self.stats = Some(stats),
            Err(e) => {
                warn!("{:?} failed: {}", ticket.request, e);
                self.notifications
                    .push(Notification::error(ticket.request.failure_message(), &e));
            }
        }
        true
    }

    /// Perform one fetch against `source`.
    pub async fn execute<S>(source: &S, request: &FetchRequest) -> Result<FetchOutcome, ApiError>
    where
        S: DocumentSource + ?Sized,
    {
        match request {
            FetchRequest::Flat(filter) => source
                .fetch_documents(filter)
                .await
                .map(FetchOutcome::Documents),
            FetchRequest::GroupedScoped(id) => {
                let payload = source.fetch_tender_folders(id).await?;
                Ok(FetchOutcome::Folders {
                    tender: Some(payload.appel_offre),
                    view: FolderView::from_server(payload.documents_by_folder),
                })
            }
            FetchRequest::GroupedAll => {
                let docs = source.fetch_documents(&FilterState::new()).await?;
                Ok(FetchOutcome::Folders {
                    tender: None,
                    view: FolderView::aggregate(docs),
                })
            }
            FetchRequest::Stats => source.fetch_stats().await.map(FetchOutcome::Stats),
        }
    }

    /// Execute a ticket and apply its result.
    pub async fn run<S>(&mut self, source: &S, ticket: Ticket) -> bool
    where
        S: DocumentSource + ?Sized,
    {
        let result = Self::execute(source, &ticket.request).await;
        self.complete(ticket, result)
    }

    /// Execute tickets in order.
    pub async fn run_all<S>(&mut self, source: &S, tickets: Vec<Ticket>)
    where
        S: DocumentSource + ?Sized,
    {
        for ticket in tickets {
            self.run(source, ticket).await;
        }
    }

    // Mutations

    /// Create a document, then refresh the view and stats.
    pub async fn create<S>(&mut self, source: &S, form: &DocumentForm) -> Option<Document>
    where
        S: DocumentSource + ?Sized,
    {
        match source.create_document(form).await {
            Ok(doc) => {
                self.notifications
                    .push(Notification::success("Document ajouté avec succès"));
                let tickets = self.after_mutation();
                self.run_all(source, tickets).await;
                Some(doc)
            }
            Err(e) => {
                self.notifications
                    .push(Notification::error("Erreur lors de l'ajout du document", &e));
                None
            }
        }
    }

    /// Update a document, then refresh the view and stats.
    pub async fn update<S>(&mut self, source: &S, id: i64, form: &DocumentForm) -> Option<Document>
    where
        S: DocumentSource + ?Sized,
    {
        match source.update_document(id, form).await {
            Ok(doc) => {
                self.notifications
                    .push(Notification::success("Document modifié avec succès"));
                let tickets = self.after_mutation();
                self.run_all(source, tickets).await;
                Some(doc)
            }
            Err(e) => {
                self.notifications.push(Notification::error(
                    "Erreur lors de la modification du document",
                    &e,
                ));
                None
            }
        }
    }

    /// Delete a document, then refresh the view and stats.
    pub async fn delete<S>(&mut self, source: &S, id: i64) -> bool
    where
        S: DocumentSource + ?Sized,
    {
        match source.delete_document(id).await {
            Ok(()) => {
                self.notifications
                    .push(Notification::success("Document supprimé avec succès"));
                let tickets = self.after_mutation();
                self.run_all(source, tickets).await;
                true
            }
            Err(e) => {
                self.notifications.push(Notification::error(
                    "Erreur lors de la suppression du document",
                    &e,
                ));
                false
            }
        }
    }
}
