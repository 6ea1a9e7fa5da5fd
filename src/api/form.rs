//! Multipart write payload for documents.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};

use super::error::ApiError;
use crate::models::{Document, DocumentType, FolderType};

/// A file attached to a document write.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime_type: None,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::Validation(format!("Impossible de lire {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Self {
            filename,
            bytes,
            mime_type,
        })
    }
}

/// Fields sent on create (`POST /documents/`) and update (`PUT /documents/{id}/`).
///
/// Optional references are plain strings, empty meaning unlinked; empty
/// references are never put on the wire.
#[derive(Debug, Clone)]
pub struct DocumentForm {
    pub title: String,
    pub description: String,
    pub document_type: DocumentType,
    pub folder_type: FolderType,
    pub is_public: bool,
    pub use_kdrive: bool,
    pub tags: String,
    pub consultant: String,
    pub appel_offre: String,
    pub category: String,
    pub file: Option<Upload>,
}

impl Default for DocumentForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            document_type: DocumentType::Autre,
            folder_type: FolderType::General,
            is_public: false,
            use_kdrive: false,
            tags: String::new(),
            consultant: String::new(),
            appel_offre: String::new(),
            category: String::new(),
            file: None,
        }
    }
}

impl DocumentForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Prefill an edit form from an existing document. The file is left empty.
    pub fn from_document(doc: &Document) -> Self {
        let folder_type = match doc.folder_key() {
            crate::models::FolderKey::Known(t) => t,
            crate::models::FolderKey::Other(_) => FolderType::General,
        };
        Self {
            title: doc.title.clone(),
            description: doc.description.clone().unwrap_or_default(),
            document_type: doc.document_type,
            folder_type,
            is_public: doc.is_public,
            use_kdrive: false,
            tags: doc.tags.clone(),
            consultant: doc.consultant.map(|c| c.to_string()).unwrap_or_default(),
            appel_offre: doc.appel_offre.map(|a| a.to_string()).unwrap_or_default(),
            category: doc.category.map(|c| c.to_string()).unwrap_or_default(),
            file: None,
        }
    }

    /// Check the form before sending. `require_file` is set on create.
    pub fn validate(&self, require_file: bool) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("Le titre est obligatoire".to_string()));
        }
        if require_file && self.file.is_none() {
            return Err(ApiError::Validation("Un fichier est obligatoire".to_string()));
        }
        Ok(())
    }

    /// Text fields in wire order, with empty optional fields left out.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.trim().to_string()),
            ("description", self.description.clone()),
            ("document_type", self.document_type.as_str().to_string()),
            ("folder_type", self.folder_type.as_str().to_string()),
            ("is_public", self.is_public.to_string()),
            ("use_kdrive", self.use_kdrive.to_string()),
        ];
        let optional = [
            ("tags", &self.tags),
            ("consultant", &self.consultant),
            ("appel_offre", &self.appel_offre),
            ("category", &self.category),
        ];
        for (key, value) in optional {
            let value = value.trim();
            if !value.is_empty() {
                fields.push((key, value.to_string()));
            }
        }
        fields.push(("created_by", String::new()));
        fields
    }

    /// Build the multipart body.
    pub(crate) fn to_multipart(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (key, value) in self.text_fields() {
            form = form.text(key, value);
        }
        if let Some(ref upload) = self.file {
            let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.filename.clone());
            if let Some(ref mime) = upload.mime_type {
                part = part
                    .mime_str(mime)
                    .map_err(|e| ApiError::Validation(format!("Type MIME invalide: {}", e)))?;
            }
            form = form.part("file", part);
        }
        Ok(form)
    }
}

/// Suggested local path for a download.
pub fn download_target(dir: &Path, filename: Option<&str>, id: i64) -> PathBuf {
    let name = filename
        .map(|f| f.replace(['/', '\\'], "_"))
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| format!("document-{}", id));
    dir.join(name)
}
