//! Job centre types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// How a job centre serves job seekers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobCentreCategory {
    Online,
    #[default]
    Offline,
    Both,
}

impl JobCentreCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobCentreCategory::Online => "online",
            JobCentreCategory::Offline => "offline",
            JobCentreCategory::Both => "both",
        }
    }

    /// Exact, case-sensitive match against the stored spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(JobCentreCategory::Online),
            "offline" => Some(JobCentreCategory::Offline),
            "both" => Some(JobCentreCategory::Both),
            _ => None,
        }
    }

    /// Unknown values silently fall back to `offline`.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

/// A validated job centre ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobCentre {
    pub name: String,
    pub category: JobCentreCategory,
    pub description: Option<String>,
    pub address: Option<String>,
    pub state: String,
    pub city: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub services: Vec<String>,
    pub operating_hours: Option<String>,
    pub is_verified: bool,
    pub is_government: bool,
    pub is_active: bool,
}

/// Job centre row as stored in `job_centres`
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobCentre {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub state: String,
    pub city: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub services: Json<Vec<String>>,
    pub operating_hours: Option<String>,
    pub is_verified: bool,
    pub is_government: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Split a comma-separated services field into trimmed, non-empty entries.
pub fn parse_services(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
