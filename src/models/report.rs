use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::ClientRef;
use super::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Weekly,
    Monthly,
    Custom,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Weekly => "weekly",
            ReportType::Monthly => "monthly",
            ReportType::Custom => "custom",
        }
    }
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Weekly
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ReportType::Weekly),
            "monthly" => Ok(ReportType::Monthly),
            "custom" => Ok(ReportType::Custom),
            other => Err(format!(
                "unknown report type '{}' (expected weekly, monthly, custom)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Generating,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Generating => "generating",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        ReportStatus::Generating
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generating" => Ok(ReportStatus::Generating),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(format!(
                "unknown report status '{}' (expected generating, completed, failed)",
                other
            )),
        }
    }
}

/// Aggregate result counts carried on every report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub positive_results: u32,
    #[serde(default)]
    pub negative_results: u32,
    #[serde(default)]
    pub neutral_results: u32,
    #[serde(default)]
    pub new_links: u32,
    #[serde(default)]
    pub improved_links: u32,
    #[serde(default)]
    pub dropped_links: u32,
    #[serde(default)]
    pub suppressed_links: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub client_id: Option<ClientRef>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub scan_id: Option<String>,
    #[serde(default)]
    pub week_number: u32,
    pub region: Region,
    #[serde(default)]
    pub report_type: ReportType,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub summary: ReportSummary,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn client_display_name(&self) -> &str {
        self.client_id
            .as_ref()
            .and_then(|r| r.name())
            .or(self.client_name.as_deref())
            .unwrap_or("Unknown Client")
    }

    pub fn is_downloadable(&self) -> bool {
        self.status == ReportStatus::Completed
    }
}

/// Response for `POST /reports/:id/regenerate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub report: Option<Report>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSort {
    Newest,
    ByWeek,
}

impl ReportSort {
    pub fn compare(&self, a: &Report, b: &Report) -> Ordering {
        match self {
            ReportSort::Newest => b.generated_at.cmp(&a.generated_at),
            ReportSort::ByWeek => b.week_number.cmp(&a.week_number),
        }
    }
}

impl Default for ReportSort {
    fn default() -> Self {
        ReportSort::Newest
    }
}

impl FromStr for ReportSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" | "latest" => Ok(ReportSort::Newest),
            "week" => Ok(ReportSort::ByWeek),
            other => Err(format!("unknown sort key '{}' (expected newest, week)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_default_to_zero() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "region": "US",
            "weekNumber": 12,
            "reportType": "weekly",
            "status": "completed"
        }))
        .unwrap();

        assert_eq!(report.summary.total_results, 0);
        assert_eq!(report.summary.suppressed_links, 0);
        assert!(report.is_downloadable());
    }

    #[test]
    fn generating_reports_are_not_downloadable() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "_id": "r2",
            "region": "UK",
            "status": "generating"
        }))
        .unwrap();
        assert!(!report.is_downloadable());
    }
}
