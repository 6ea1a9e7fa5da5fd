//! Explicit session context passed to the API client.
//!
//! Nothing here is global: the CLI builds a [`Session`] from settings at
//! startup and hands it to [`crate::api::GedClient`], which drops it with the
//! client.

use serde::{Deserialize, Serialize};

/// Default scheme of the Django REST framework token authentication.
pub const DEFAULT_AUTH_SCHEME: &str = "Token";

/// Identity of the administrator running the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Pre-issued API token. Obtaining one is out of scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Authorization header scheme (`Token`, `Bearer`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    /// Anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("admin"))
    }

    /// Value of the `Authorization` header, if a token is set.
    pub fn authorization_header(&self) -> Option<String> {
        let token = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        let scheme = self
            .auth_scheme
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AUTH_SCHEME);
        Some(format!("{} {}", scheme, token))
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `GED_API_TOKEN`
    /// - `GED_AUTH_SCHEME`
    /// - `GED_USER_ROLE`
    /// - `GED_USER_ID`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_var("GED_API_TOKEN") {
            self.token = Some(v);
        }
        if let Some(v) = env_var("GED_AUTH_SCHEME") {
            self.auth_scheme = Some(v);
        }
        if let Some(v) = env_var("GED_USER_ROLE") {
            self.role = Some(v);
        }
        if let Some(v) = env_var("GED_USER_ID") {
            self.user_id = Some(v);
        }
        self
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}
