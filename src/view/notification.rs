//! User-visible notifications raised by the document view.

use std::fmt;

use serde::Serialize;

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// One message for the user, with the server detail when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>, err: &ApiError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            detail: err.detail().map(str::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} : {}", self.message, detail),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_notification_carries_detail() {
        let err = ApiError::Status {
            status: StatusCode::FORBIDDEN,
            detail: Some("Permission refusée".to_string()),
        };
        let n = Notification::error("Erreur lors du chargement des documents", &err);
        assert!(n.is_error());
        assert_eq!(
            n.to_string(),
            "Erreur lors du chargement des documents : Permission refusée"
        );
    }
}
