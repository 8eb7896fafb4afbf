use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::report::Report;
use super::scan::Scan;

/// Payload of `GET /dashboard/admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub overview: AdminOverview,
    #[serde(default)]
    pub recent_activity: RecentActivity,
    #[serde(default)]
    pub charts: DashboardCharts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub active_clients: u64,
    #[serde(default)]
    pub total_keywords: u64,
    #[serde(default)]
    pub active_keywords: u64,
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub total_reports: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentActivity {
    #[serde(default)]
    pub scans: Vec<Scan>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    #[serde(default)]
    pub scan_trends: Vec<TrendPoint>,
}

/// One day of the scan-trend aggregation; `_id` is the `YYYY-MM-DD` group key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(rename = "_id")]
    pub date: String,
    #[serde(default)]
    pub count: u64,
}

/// Payload of `GET /dashboard/client`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub client: ClientInfo,
    pub overview: ClientOverview,
    #[serde(default)]
    pub recent_activity: RecentActivity,
    #[serde(default)]
    pub campaign_stats: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub campaign_progress: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOverview {
    #[serde(default)]
    pub total_keywords: u64,
    #[serde(default)]
    pub active_keywords: u64,
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub total_reports: u64,
    #[serde(default)]
    pub completed_scans: u64,
    #[serde(default)]
    pub running_scans: u64,
    #[serde(default)]
    pub failed_scans: u64,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub avg_results: f64,
}
