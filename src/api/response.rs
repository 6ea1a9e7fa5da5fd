//! Response decoding at the API boundary.
//!
//! Shapes are checked once here; callers only ever see typed values.

use serde::Deserialize;

use super::error::ApiError;

/// Maximum characters of a raw error body kept as detail.
const MAX_DETAIL_CHARS: usize = 200;

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
    Paginated { results: Vec<T> },
}

impl<T> ListPayload<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) => items,
            ListPayload::Wrapped { data } => data,
            ListPayload::Paginated { results } => results,
        }
    }
}

/// Decode a list body in any accepted shape.
pub(crate) fn decode_list<T>(body: &[u8]) -> Result<Vec<T>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_slice::<ListPayload<T>>(body)
        .map(ListPayload::into_vec)
        .map_err(|e| ApiError::Decode(format!("expected a list: {}", e)))
}

/// Decode a single JSON object body.
pub(crate) fn decode_one<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Pull a human readable detail out of an error body.
///
/// Understands `{"detail": ..}`, `{"error": ..}`, `{"message": ..}` and
/// Django REST framework field errors (`{"title": ["required"]}`). Anything
/// else is returned as trimmed text.
pub fn extract_error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(obj) = value.as_object() {
            for key in ["detail", "error", "message"] {
                if let Some(s) = obj.get(key).and_then(|v| v.as_str()) {
                    return Some(s.to_string());
                }
            }

            let fields: Vec<String> = obj
                .iter()
                .filter_map(|(field, v)| {
                    let msgs = json_messages(v);
                    (!msgs.is_empty()).then(|| format!("{}: {}", field, msgs.join(" ")))
                })
                .collect();
            if !fields.is_empty() {
                return Some(fields.join("; "));
            }
        }
        if let Some(s) = value.as_str() {
            return Some(s.to_string());
        }
    }

    if trimmed.starts_with('<') {
        // HTML error page; nothing worth showing.
        return None;
    }

    Some(truncate_chars(trimmed, MAX_DETAIL_CHARS))
}

fn json_messages(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|i| i.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Parse filename from Content-Disposition header value.
/// Parses both `filename="name.pdf"` and `filename*=UTF-8''name.pdf` formats.
pub fn parse_content_disposition_filename(header: &str) -> Option<String> {
    if let Some(start) = header.find("filename*=") {
        let rest = &header[start + 10..];
        if let Some(quote_start) = rest.find("''") {
            let encoded = rest[quote_start + 2..].split([';', ' ']).next()?;
            if let Ok(decoded) = urlencoding::decode(encoded) {
                let filename = decoded.trim().trim_matches('"').to_string();
                if !filename.is_empty() {
                    return Some(filename);
                }
            }
        }
    }

    if let Some(start) = header.find("filename=") {
        let rest = &header[start + 9..];
        let filename = if let Some(quoted) = rest.strip_prefix('"') {
            quoted.split('"').next()
        } else {
            rest.split([';', ' ']).next()
        };

        if let Some(name) = filename {
            let name = name.trim().to_string();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}

/// A downloaded document file.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Filename suggested by the server, if any.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
