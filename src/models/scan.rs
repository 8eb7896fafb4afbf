use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::{non_empty_or, ClientData, ClientRef};
use super::region::Region;

/// Backend-driven processing state of a scan. The console never moves this
/// directly except by creating a scan, which starts at `running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    // Historical records carry "pending"; it maps onto scheduled.
    #[serde(alias = "pending")]
    Scheduled,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    /// Rank used by the by-status sort: completed < running < failed < rest.
    pub fn rank(&self) -> u8 {
        match self {
            ScanStatus::Completed => 1,
            ScanStatus::Running => 2,
            ScanStatus::Failed => 3,
            ScanStatus::Scheduled => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Scheduled => "scheduled",
            ScanStatus::Running => "running",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }
}

impl Default for ScanStatus {
    fn default() -> Self {
        ScanStatus::Scheduled
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" | "pending" => Ok(ScanStatus::Scheduled),
            "running" => Ok(ScanStatus::Running),
            "completed" => Ok(ScanStatus::Completed),
            "failed" => Ok(ScanStatus::Failed),
            other => Err(format!(
                "unknown scan status '{}' (expected scheduled, running, completed, failed)",
                other
            )),
        }
    }
}

/// Visibility of a scan's results to the end customer, independent of
/// processing status. Advances forward only: not_sent -> sent -> viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    NotSent,
    Sent,
    Viewed,
}

impl ClientStatus {
    pub fn can_advance_to(&self, next: ClientStatus) -> bool {
        matches!(
            (self, next),
            (ClientStatus::NotSent, ClientStatus::Sent) | (ClientStatus::Sent, ClientStatus::Viewed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::NotSent => "not_sent",
            ClientStatus::Sent => "sent",
            ClientStatus::Viewed => "viewed",
        }
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::NotSent
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Manual,
    // Legacy records used "scheduled" and "auto" for the same thing.
    #[serde(alias = "scheduled", alias = "auto")]
    Automated,
    CreatorScan,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Manual => "manual",
            ScanType::Automated => "automated",
            ScanType::CreatorScan => "creator_scan",
        }
    }
}

impl Default for ScanType {
    fn default() -> Self {
        ScanType::Automated
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub client_id: Option<ClientRef>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub region: Region,
    #[serde(default)]
    pub scan_type: ScanType,
    #[serde(default)]
    pub status: ScanStatus,
    #[serde(default)]
    pub client_status: ClientStatus,
    #[serde(default)]
    pub results_count: u32,
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_to_client_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub viewed_by_client_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_scan_enabled: bool,
    #[serde(default)]
    pub week_number: u32,
}

impl Scan {
    pub fn client_display_name(&self) -> &str {
        self.client_id
            .as_ref()
            .and_then(|r| r.name())
            .or(self.client_name.as_deref())
            .unwrap_or("Unknown Client")
    }

    /// Timestamp the list views sort and display by: completion time when
    /// the scan finished, start time otherwise.
    pub fn activity_timestamp(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.started_at)
    }

    /// Whether "send to client" is currently legal for this scan.
    pub fn can_send_to_client(&self) -> bool {
        self.send_rejection().is_none()
    }

    /// The reason "send to client" must be rejected, checked in the same
    /// order the admin screen reports them. None means the action is legal;
    /// callers must not issue the request when this is Some.
    pub fn send_rejection(&self) -> Option<&'static str> {
        if matches!(self.client_status, ClientStatus::Sent | ClientStatus::Viewed) {
            return Some("This scan has already been sent to the client.");
        }
        if self.status != ScanStatus::Completed {
            return Some("Only completed scans can be sent.");
        }
        if self.results_count == 0 {
            return Some("No results to send to client.");
        }
        None
    }

    /// Client payload for send-to-client, assembled from the populated
    /// reference when present, with the screen's fallback values otherwise.
    pub fn client_data(&self) -> ClientData {
        let settings = self.client_id.as_ref().and_then(|r| r.settings());

        ClientData {
            name: self.client_display_name().to_string(),
            client_id: self
                .client_id
                .as_ref()
                .map(|r| r.id().to_string())
                .unwrap_or_default(),
            email: None,
            industry: non_empty_or(settings.map(|s| s.industry.as_str()).unwrap_or(""), "Business"),
            business_type: non_empty_or(
                settings.map(|s| s.business_type.as_str()).unwrap_or(""),
                "Business",
            ),
            target_audience: non_empty_or(
                settings.map(|s| s.target_audience.as_str()).unwrap_or(""),
                "General",
            ),
            region: self.region,
            website: settings.map(|s| s.website.clone()).unwrap_or_default(),
            description: non_empty_or(
                settings.map(|s| s.description.as_str()).unwrap_or(""),
                "Business client",
            ),
        }
    }

    fn client_sort_key(&self) -> String {
        self.client_id
            .as_ref()
            .and_then(|r| r.name())
            .or(self.client_name.as_deref())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// Body for `POST /scans`. New scans start running and invisible to the
/// client until the admin sends them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScan {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub keywords: Vec<String>,
    pub region: Region,
    pub scan_type: ScanType,
    pub results_count: u32,
    pub status: ScanStatus,
    pub client_status: ClientStatus,
}

impl NewScan {
    pub fn manual(client_id: String, client_name: Option<String>, keywords: Vec<String>, region: Region) -> Self {
        Self {
            client_id,
            client_name,
            keywords,
            region,
            scan_type: ScanType::Manual,
            results_count: 0,
            status: ScanStatus::Running,
            client_status: ClientStatus::NotSent,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub scan: CreatedScan,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedScan {
    // The create response carries both `_id` and `id`; mapping only `_id`
    // leaves the duplicate to be ignored as an unknown key.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub status: Option<ScanStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteScanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted_scan_id: Option<String>,
    #[serde(default)]
    pub deleted_results_count: u64,
}

/// Envelope for action endpoints (send-to-client, auto-scan toggles).
#[derive(Debug, Clone, Deserialize)]
pub struct ScanActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for `POST /scans/:id/results`, which completes a scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub results_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSort {
    Latest,
    Oldest,
    MostResults,
    ByClient,
    ByStatus,
}

impl ScanSort {
    pub fn compare(&self, a: &Scan, b: &Scan) -> Ordering {
        match self {
            ScanSort::Latest => b.activity_timestamp().cmp(&a.activity_timestamp()),
            ScanSort::Oldest => a.activity_timestamp().cmp(&b.activity_timestamp()),
            ScanSort::MostResults => b.results_count.cmp(&a.results_count),
            ScanSort::ByClient => a.client_sort_key().cmp(&b.client_sort_key()),
            ScanSort::ByStatus => a.status.rank().cmp(&b.status.rank()),
        }
    }
}

impl Default for ScanSort {
    fn default() -> Self {
        ScanSort::Latest
    }
}

impl FromStr for ScanSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(ScanSort::Latest),
            "oldest" => Ok(ScanSort::Oldest),
            "results" => Ok(ScanSort::MostResults),
            "client" => Ok(ScanSort::ByClient),
            "status" => Ok(ScanSort::ByStatus),
            other => Err(format!(
                "unknown sort key '{}' (expected latest, oldest, results, client, status)",
                other
            )),
        }
    }
}
