//! Folder aggregation for the grouped document view.
//!
//! A [`FolderView`] always contains the six known folders, even when they are
//! empty, so every folder can offer an "add document" action. Documents with
//! a folder type this client does not know get an ad-hoc bucket keyed by the
//! raw value.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Document, FolderKey, FolderType, ServerFolder};

/// Documents routed to one folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderBucket {
    pub label: String,
    pub documents: Vec<Document>,
}

impl FolderBucket {
    fn empty(key: &FolderKey) -> Self {
        Self {
            label: key.label().to_string(),
            documents: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Folder key to bucket mapping.
///
/// Iteration yields the known folders in [`FolderType::ALL`] order, then
/// ad-hoc folders in the order they were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderView {
    buckets: Vec<(FolderKey, FolderBucket)>,
}

impl Default for FolderView {
    fn default() -> Self {
        Self::empty()
    }
}

impl FolderView {
    /// Six empty known buckets.
    pub fn empty() -> Self {
        let buckets = FolderType::ALL
            .iter()
            .map(|t| {
                let key = FolderKey::Known(*t);
                let bucket = FolderBucket::empty(&key);
                (key, bucket)
            })
            .collect();
        Self { buckets }
    }

    /// Group a flat document list by folder. Input order is kept per bucket.
    pub fn aggregate<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut view = Self::empty();
        for doc in documents {
            let key = doc.folder_key();
            view.bucket_mut(key).documents.push(doc);
        }
        view
    }

    /// Normalize a `documents_by_folder` payload from the scoped endpoint.
    ///
    /// Known folders the server left out are added empty. Server labels win
    /// over local ones when present.
    pub fn from_server(folders: BTreeMap<String, ServerFolder>) -> Self {
        let mut view = Self::empty();
        for (raw_key, folder) in folders {
            let key = FolderKey::classify(Some(&raw_key));
            let bucket = view.bucket_mut(key);
            if !folder.label.trim().is_empty() {
                bucket.label = folder.label;
            }
            bucket.documents.extend(folder.documents);
        }
        view
    }

    fn bucket_mut(&mut self, key: FolderKey) -> &mut FolderBucket {
        let idx = match self.buckets.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                let bucket = FolderBucket::empty(&key);
                self.buckets.push((key, bucket));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[idx].1
    }

    /// Look up a bucket by its wire key (e.g. `"FINANCE"`).
    pub fn get(&self, key: &str) -> Option<&FolderBucket> {
        let wanted = FolderKey::classify(Some(key));
        self.buckets
            .iter()
            .find(|(k, _)| *k == wanted)
            .map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FolderKey, &FolderBucket)> {
        self.buckets.iter().map(|(k, b)| (k, b))
    }

    pub fn keys(&self) -> impl Iterator<Item = &FolderKey> {
        self.buckets.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of documents across every bucket.
    pub fn total_documents(&self) -> usize {
        self.buckets.iter().map(|(_, b)| b.documents.len()).sum()
    }
}

impl Serialize for FolderView {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (key, bucket) in &self.buckets {
            map.serialize_entry(key.as_str(), bucket)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, folder: Option<&str>) -> Document {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("doc {}", id),
            "file_type": "pdf",
            "folder_type": folder,
            "document_type": "AUTRE",
        }))
        .unwrap()
    }

    fn ids(bucket: &FolderBucket) -> Vec<i64> {
        bucket.documents.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_empty_input_yields_six_empty_buckets() {
        let view = FolderView::aggregate(Vec::new());
        assert_eq!(view.len(), 6);
        assert!(view.iter().all(|(_, b)| b.is_empty()));
        assert_eq!(view.total_documents(), 0);
    }

    #[test]
    fn test_finance_and_missing_folder() {
        let view = FolderView::aggregate(vec![doc(1, Some("FINANCE")), doc(2, None)]);

        assert_eq!(ids(view.get("FINANCE").unwrap()), vec![1]);
        assert_eq!(ids(view.get("GENERAL").unwrap()), vec![2]);
        for key in ["ADMIN", "TECHNIQUE", "CONTEXTE", "OUTREACH"] {
            assert!(view.get(key).unwrap().is_empty(), "{} should be empty", key);
        }
    }

    #[test]
    fn test_unknown_folder_gets_adhoc_bucket() {
        let view = FolderView::aggregate(vec![
            doc(1, Some("JURIDIQUE")),
            doc(2, Some("ADMIN")),
            doc(3, Some("JURIDIQUE")),
        ]);

        assert_eq!(view.len(), 7);
        let adhoc = view.get("JURIDIQUE").unwrap();
        assert_eq!(adhoc.label, "JURIDIQUE");
        assert_eq!(ids(adhoc), vec![1, 3]);
        assert_eq!(view.total_documents(), 3);

        let last_key = view.keys().last().unwrap();
        assert_eq!(last_key.as_str(), "JURIDIQUE");
    }

    #[test]
    fn test_order_within_bucket_is_stable() {
        let docs = vec![
            doc(5, Some("TECHNIQUE")),
            doc(1, Some("TECHNIQUE")),
            doc(3, Some("TECHNIQUE")),
        ];
        let view = FolderView::aggregate(docs);
        assert_eq!(ids(view.get("TECHNIQUE").unwrap()), vec![5, 1, 3]);
    }

    #[test]
    fn test_count_preserved_for_mixed_input() {
        let folders = [
            Some("ADMIN"),
            None,
            Some("OUTREACH"),
            Some("autre-chose"),
            Some(""),
            Some("finance"),
        ];
        let docs: Vec<_> = folders
            .iter()
            .enumerate()
            .map(|(i, f)| doc(i as i64, *f))
            .collect();
        let view = FolderView::aggregate(docs);

        assert_eq!(view.total_documents(), folders.len());
        for t in FolderType::ALL {
            assert!(view.get(t.as_str()).is_some());
        }
        assert_eq!(view.len(), 7);
    }

    #[test]
    fn test_from_server_fills_missing_known_folders() {
        let mut payload = BTreeMap::new();
        payload.insert(
            "TECHNIQUE".to_string(),
            ServerFolder {
                label: "Dossier technique".to_string(),
                documents: vec![doc(4, Some("TECHNIQUE"))],
            },
        );
        let view = FolderView::from_server(payload);

        assert_eq!(view.len(), 6);
        let tech = view.get("TECHNIQUE").unwrap();
        assert_eq!(tech.label, "Dossier technique");
        assert_eq!(ids(tech), vec![4]);
        assert_eq!(view.get("FINANCE").unwrap().label, "Financier");
    }

    #[test]
    fn test_serialize_keeps_display_order() {
        let view = FolderView::aggregate(vec![doc(1, Some("GENERAL"))]);
        let json = serde_json::to_string(&view).unwrap();
        let admin = json.find("\"ADMIN\"").unwrap();
        let general = json.find("\"GENERAL\"").unwrap();
        assert!(admin < general);
    }
}
