use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const STATUS_UNKNOWN: u16 = 0;
pub const STATUS_VALIDATION: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Failure reported by the remote collaborator. Transport failures use
/// status 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{title}")]
pub struct ApiError {
    pub title: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            errors: None,
            detail: None,
        }
    }

    pub fn network(title: impl Into<String>) -> Self {
        Self::new(STATUS_UNKNOWN, title)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_validation_error(&self) -> bool {
        self.status == STATUS_VALIDATION
    }

    pub fn is_unauthorized_error(&self) -> bool {
        self.status == STATUS_UNAUTHORIZED
    }

    pub fn is_not_found_error(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get(field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
