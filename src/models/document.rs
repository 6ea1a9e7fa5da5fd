//! Document records served by the GED backend.
//!
//! A document is one stored file plus its metadata. Folder buckets are never
//! stored on the document itself; they are derived from `folder_type` at
//! display time (see [`crate::folders`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::folder::FolderKey;

/// Business type of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    AppelOffre,
    Etude,
    Rapport,
    Cv,
    Methodologie,
    Contrat,
    /// Also absorbs values this client does not know about.
    #[default]
    #[serde(other)]
    Autre,
}

impl DocumentType {
    pub const ALL: [DocumentType; 7] = [
        Self::AppelOffre,
        Self::Etude,
        Self::Rapport,
        Self::Cv,
        Self::Methodologie,
        Self::Contrat,
        Self::Autre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppelOffre => "APPEL_OFFRE",
            Self::Etude => "ETUDE",
            Self::Rapport => "RAPPORT",
            Self::Cv => "CV",
            Self::Methodologie => "METHODOLOGIE",
            Self::Contrat => "CONTRAT",
            Self::Autre => "AUTRE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AppelOffre => "Appel d'offre",
            Self::Etude => "Étude",
            Self::Rapport => "Rapport",
            Self::Cv => "CV",
            Self::Methodologie => "Méthodologie",
            Self::Contrat => "Contrat",
            Self::Autre => "Autre",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPEL_OFFRE" => Some(Self::AppelOffre),
            "ETUDE" => Some(Self::Etude),
            "RAPPORT" => Some(Self::Rapport),
            "CV" => Some(Self::Cv),
            "METHODOLOGIE" => Some(Self::Methodologie),
            "CONTRAT" => Some(Self::Contrat),
            "AUTRE" => Some(Self::Autre),
            _ => None,
        }
    }
}

/// Coarse file kind derived from the extension tag, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Spreadsheet,
    Presentation,
    Image,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" | "odt" | "rtf" => Self::Word,
            "xls" | "xlsx" | "ods" | "csv" => Self::Spreadsheet,
            "ppt" | "pptx" | "odp" => Self::Presentation,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" => Self::Image,
            "zip" | "rar" | "7z" | "tar" | "gz" => Self::Archive,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::Image => "image",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

/// A stored document and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Server identifier, immutable.
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short extension tag (pdf, doc, xls...). Not validated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,
    /// Raw folder value as sent by the server; see [`Document::folder_key`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_type: DocumentType,
    /// Comma-separated free text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appel_offre: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    /// Assigned by the server at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    /// Human readable size, formatted server-side.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_size_display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl Document {
    /// Folder bucket this document belongs to.
    pub fn folder_key(&self) -> FolderKey {
        FolderKey::classify(self.folder_type.as_deref())
    }

    /// Tags split on `,` and trimmed, empty entries dropped.
    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }

    pub fn file_kind(&self) -> FileKind {
        FileKind::from_extension(&self.file_type)
    }
}

/// Split a comma-separated tag string.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
