//! Folder classification for documents attached to a tender.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification bucket for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FolderType {
    Admin,
    Technique,
    Finance,
    Contexte,
    Outreach,
    General,
}

impl FolderType {
    /// Every known folder, in display order.
    pub const ALL: [FolderType; 6] = [
        Self::Admin,
        Self::Technique,
        Self::Finance,
        Self::Contexte,
        Self::Outreach,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Technique => "TECHNIQUE",
            Self::Finance => "FINANCE",
            Self::Contexte => "CONTEXTE",
            Self::Outreach => "OUTREACH",
            Self::General => "GENERAL",
        }
    }

    /// Display name shown to administrators.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administratif",
            Self::Technique => "Technique",
            Self::Finance => "Financier",
            Self::Contexte => "Contexte",
            Self::Outreach => "Prospection",
            Self::General => "Général",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "TECHNIQUE" => Some(Self::Technique),
            "FINANCE" => Some(Self::Finance),
            "CONTEXTE" => Some(Self::Contexte),
            "OUTREACH" => Some(Self::Outreach),
            "GENERAL" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for FolderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a folder bucket.
///
/// Servers occasionally return folder types this client does not know about.
/// Those keep their raw value so the document still lands in exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderKey {
    Known(FolderType),
    Other(String),
}

impl FolderKey {
    /// Classify a raw `folder_type` value.
    ///
    /// Missing or blank values fall back to [`FolderType::General`].
    pub fn classify(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::Known(FolderType::General),
            Some(s) => match FolderType::from_str(s) {
                Some(known) => Self::Known(known),
                None => Self::Other(s.to_string()),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Other(raw) => raw,
        }
    }

    /// Display label; ad-hoc keys use their raw value.
    pub fn label(&self) -> &str {
        match self {
            Self::Known(t) => t.label(),
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<FolderType> for FolderKey {
    fn from(t: FolderType) -> Self {
        Self::Known(t)
    }
}

impl fmt::Display for FolderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known() {
        assert_eq!(
            FolderKey::classify(Some("FINANCE")),
            FolderKey::Known(FolderType::Finance)
        );
        assert_eq!(
            FolderKey::classify(Some("technique")),
            FolderKey::Known(FolderType::Technique)
        );
    }

    #[test]
    fn test_classify_missing_falls_back_to_general() {
        assert_eq!(
            FolderKey::classify(None),
            FolderKey::Known(FolderType::General)
        );
        assert_eq!(
            FolderKey::classify(Some("  ")),
            FolderKey::Known(FolderType::General)
        );
    }

    #[test]
    fn test_classify_unknown_keeps_raw_value() {
        let key = FolderKey::classify(Some("JURIDIQUE"));
        assert_eq!(key, FolderKey::Other("JURIDIQUE".to_string()));
        assert_eq!(key.label(), "JURIDIQUE");
        assert!(!key.is_known());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&FolderType::Outreach).unwrap();
        assert_eq!(json, "\"OUTREACH\"");
        let parsed: FolderType = serde_json::from_str("\"CONTEXTE\"").unwrap();
        assert_eq!(parsed, FolderType::Contexte);
    }
}
