//! Document list filters and their query string projection.

use std::fmt;

use serde::Serialize;

/// Values that mean "no constraint" wherever a filter is written.
const SENTINELS: [&str; 4] = ["tous", "none", "null", "undefined"];

/// Normalize a raw filter value.
///
/// Sentinels, blank strings and `None` all collapse to `None`.
pub fn normalize(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || SENTINELS.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One filterable field, in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    DocumentType,
    CategoryId,
    FolderType,
    AppelOffreId,
    Search,
}

impl FilterField {
    /// Fixed projection order.
    pub const ORDER: [FilterField; 5] = [
        Self::DocumentType,
        Self::CategoryId,
        Self::FolderType,
        Self::AppelOffreId,
        Self::Search,
    ];

    /// Query parameter name.
    pub fn key(&self) -> &'static str {
        match self {
            Self::DocumentType => "document_type",
            Self::CategoryId => "category_id",
            Self::FolderType => "folder_type",
            Self::AppelOffreId => "appel_offre_id",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Active filters for the document list.
///
/// Fields are private so that every write goes through [`FilterState::set`],
/// which normalizes sentinels away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    document_type: Option<String>,
    category_id: Option<String>,
    folder_type: Option<String>,
    appel_offre_id: Option<String>,
    search: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterState::set`].
    pub fn with(mut self, field: FilterField, value: Option<&str>) -> Self {
        self.set(field, value);
        self
    }

    /// Write a field. Returns `true` when the stored value changed.
    pub fn set(&mut self, field: FilterField, value: Option<&str>) -> bool {
        let normalized = normalize(value);
        let slot = self.slot_mut(field);
        if *slot == normalized {
            return false;
        }
        *slot = normalized;
        true
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::DocumentType => self.document_type.as_deref(),
            FilterField::CategoryId => self.category_id.as_deref(),
            FilterField::FolderType => self.folder_type.as_deref(),
            FilterField::AppelOffreId => self.appel_offre_id.as_deref(),
            FilterField::Search => self.search.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::DocumentType => &mut self.document_type,
            FilterField::CategoryId => &mut self.category_id,
            FilterField::FolderType => &mut self.folder_type,
            FilterField::AppelOffreId => &mut self.appel_offre_id,
            FilterField::Search => &mut self.search,
        }
    }

    /// Active tender filter, if any.
    pub fn tender_id(&self) -> Option<&str> {
        self.appel_offre_id.as_deref()
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ORDER.iter().all(|f| self.get(*f).is_none())
    }

    /// Active fields as `(key, value)` pairs in projection order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        FilterField::ORDER
            .iter()
            .filter_map(|f| self.get(*f).map(|v| (f.key(), v)))
            .collect()
    }

    /// Query string without the leading `?`. Values are percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sentinels() {
        for raw in ["tous", "none", "null", "undefined", "TOUS", "  ", ""] {
            assert_eq!(normalize(Some(raw)), None, "{:?} should normalize away", raw);
        }
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(" CV ")), Some("CV".to_string()));
    }

    #[test]
    fn test_sentinel_document_type_with_search() {
        let filter = FilterState::new()
            .with(FilterField::DocumentType, Some("tous"))
            .with(FilterField::Search, Some("plan"));
        assert_eq!(filter.to_query_string(), "search=plan");
    }

    #[test]
    fn test_fixed_field_order() {
        let filter = FilterState::new()
            .with(FilterField::Search, Some("x"))
            .with(FilterField::AppelOffreId, Some("7"))
            .with(FilterField::FolderType, Some("FINANCE"))
            .with(FilterField::CategoryId, Some("2"))
            .with(FilterField::DocumentType, Some("CV"));
        assert_eq!(
            filter.to_query_string(),
            "document_type=CV&category_id=2&folder_type=FINANCE&appel_offre_id=7&search=x"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let filter = FilterState::new().with(FilterField::Search, Some("plan de charge&co"));
        assert_eq!(filter.to_query_string(), "search=plan%20de%20charge%26co");
    }

    #[test]
    fn test_empty_fields_never_appear() {
        let filter = FilterState::new()
            .with(FilterField::CategoryId, Some("null"))
            .with(FilterField::FolderType, Some("undefined"))
            .with(FilterField::AppelOffreId, Some("none"));
        assert!(filter.is_empty());
        assert_eq!(filter.to_query_string(), "");
    }

    #[test]
    fn test_set_reports_changes() {
        let mut filter = FilterState::new();
        assert!(filter.set(FilterField::AppelOffreId, Some("3")));
        assert!(!filter.set(FilterField::AppelOffreId, Some(" 3 ")));
        assert!(filter.set(FilterField::AppelOffreId, Some("tous")));
        assert_eq!(filter.tender_id(), None);
        assert!(!filter.set(FilterField::AppelOffreId, None));
    }
}
