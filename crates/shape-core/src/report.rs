//! Serializable form of an [`Outcome`]

use serde::Serialize;

use crate::error::Outcome;

/// `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> From<Outcome<T>> for Report<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Ok(data) => Report {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Report {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        }
    }
}
