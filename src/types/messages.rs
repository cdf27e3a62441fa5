//! JSON envelopes shared by the HTTP handlers

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use crate::types::JobCentreCategory;

/// Error body: `{ "success": false, "error": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Job centre list query with pagination and optional filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListJobCentresQuery {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub category: Option<JobCentreCategory>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListJobCentresQuery {
    fn default() -> Self {
        Self {
            state: None,
            category: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl ListJobCentresQuery {
    /// Clamp paging values into the accepted range
    pub fn normalized(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_LIST_LIMIT);
        self.offset = self.offset.max(0);
        self.state = self
            .state
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

/// List response with pagination info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
