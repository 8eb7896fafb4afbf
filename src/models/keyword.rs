use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::ClientRef;
use super::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPriority {
    Low,
    Medium,
    High,
}

impl KeywordPriority {
    /// Rank for the priority sort: high first.
    pub fn rank(&self) -> u8 {
        match self {
            KeywordPriority::High => 1,
            KeywordPriority::Medium => 2,
            KeywordPriority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordPriority::Low => "low",
            KeywordPriority::Medium => "medium",
            KeywordPriority::High => "high",
        }
    }
}

impl Default for KeywordPriority {
    fn default() -> Self {
        KeywordPriority::Medium
    }
}

impl fmt::Display for KeywordPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(KeywordPriority::Low),
            "medium" => Ok(KeywordPriority::Medium),
            "high" => Ok(KeywordPriority::High),
            other => Err(format!(
                "unknown priority '{}' (expected low, medium, high)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    Active,
    Inactive,
    Paused,
}

impl KeywordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordStatus::Active => "active",
            KeywordStatus::Inactive => "inactive",
            KeywordStatus::Paused => "paused",
        }
    }
}

impl Default for KeywordStatus {
    fn default() -> Self {
        KeywordStatus::Active
    }
}

impl fmt::Display for KeywordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(KeywordStatus::Active),
            "inactive" => Ok(KeywordStatus::Inactive),
            "paused" => Ok(KeywordStatus::Paused),
            other => Err(format!(
                "unknown keyword status '{}' (expected active, inactive, paused)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub client_id: Option<ClientRef>,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub target_regions: Vec<Region>,
    #[serde(default)]
    pub priority: KeywordPriority,
    #[serde(default)]
    pub status: KeywordStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Keyword {
    pub fn client_display_name(&self) -> &str {
        self.client_id
            .as_ref()
            .and_then(|r| r.name())
            .unwrap_or("Unknown Client")
    }

    pub fn belongs_to(&self, client_id: &str) -> bool {
        self.client_id
            .as_ref()
            .map(|r| r.id() == client_id)
            .unwrap_or(false)
    }
}

/// Body for `POST /keywords`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyword {
    pub client_id: String,
    pub keyword: String,
    pub target_regions: Vec<Region>,
    pub priority: KeywordPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `POST /keywords/bulk`: one client, many keyword entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkKeywords {
    pub client_id: String,
    pub keywords: Vec<BulkKeywordEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkKeywordEntry {
    pub keyword: String,
    pub target_regions: Vec<Region>,
    pub priority: KeywordPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkKeywordsResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

/// Response for `PATCH /keywords/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordStatusResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub keyword: Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSort {
    Newest,
    ByPriority,
}

impl KeywordSort {
    pub fn compare(&self, a: &Keyword, b: &Keyword) -> Ordering {
        match self {
            KeywordSort::Newest => b.created_at.cmp(&a.created_at),
            KeywordSort::ByPriority => a.priority.rank().cmp(&b.priority.rank()),
        }
    }
}

impl Default for KeywordSort {
    fn default() -> Self {
        KeywordSort::Newest
    }
}

impl FromStr for KeywordSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" | "latest" => Ok(KeywordSort::Newest),
            "priority" => Ok(KeywordSort::ByPriority),
            other => Err(format!(
                "unknown sort key '{}' (expected newest, priority)",
                other
            )),
        }
    }
}
