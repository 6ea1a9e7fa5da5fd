//! Tender and consultant records used to link documents.
//!
//! Only the fields needed to pick a record are decoded; the admin endpoints
//! return much more.

use serde::{Deserialize, Serialize};

use super::Document;

/// An appel d'offre (tender) as listed for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderSummary {
    pub id: i64,
    #[serde(default, alias = "titre", alias = "title")]
    pub nom_projet: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub date_limite: Option<String>,
    #[serde(default)]
    pub statut: Option<String>,
}

impl TenderSummary {
    pub fn display_name(&self) -> String {
        match (&self.nom_projet, &self.client) {
            (Some(name), Some(client)) => format!("{} ({})", name, client),
            (Some(name), None) => name.clone(),
            (None, Some(client)) => client.clone(),
            (None, None) => format!("#{}", self.id),
        }
    }
}

/// A consultant as listed for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultantSummary {
    pub id: i64,
    #[serde(default, alias = "firstName")]
    pub prenom: Option<String>,
    #[serde(default, alias = "lastName")]
    pub nom: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub competences: Option<String>,
}

impl ConsultantSummary {
    pub fn display_name(&self) -> String {
        let full = [self.prenom.as_deref(), self.nom.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.email.clone().unwrap_or_else(|| format!("#{}", self.id))
        } else {
            full
        }
    }
}

/// One bucket as returned by the scoped grouped endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerFolder {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Response of `GET /documents/appel-offre/{id}/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderFolders {
    pub appel_offre: TenderSummary,
    #[serde(default)]
    pub documents_by_folder: std::collections::BTreeMap<String, ServerFolder>,
}

impl TenderFolders {
    /// Total number of documents across all buckets.
    pub fn document_count(&self) -> usize {
        self.documents_by_folder
            .values()
            .map(|f| f.documents.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tender_aliases() {
        let t: TenderSummary =
            serde_json::from_value(serde_json::json!({"id": 3, "titre": "Refonte SI"})).unwrap();
        assert_eq!(t.display_name(), "Refonte SI");
    }

    #[test]
    fn test_consultant_display_name() {
        let c: ConsultantSummary = serde_json::from_value(
            serde_json::json!({"id": 9, "prenom": "Awa", "nom": "Diallo"}),
        )
        .unwrap();
        assert_eq!(c.display_name(), "Awa Diallo");

        let anon: ConsultantSummary =
            serde_json::from_value(serde_json::json!({"id": 10})).unwrap();
        assert_eq!(anon.display_name(), "#10");
    }
}
