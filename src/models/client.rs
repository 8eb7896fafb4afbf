use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::region::Region;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub contact: ClientContact,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub settings: ClientSettings,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    pub fn subscription_status(&self) -> Option<SubscriptionStatus> {
        self.subscription.as_ref().map(|s| s.status)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Trial,
    Suspended,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Suspended => "suspended",
        }
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Active
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            "trial" => Ok(SubscriptionStatus::Trial),
            "suspended" => Ok(SubscriptionStatus::Suspended),
            other => Err(format!("unknown subscription status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub auto_scan: bool,
    #[serde(default)]
    pub scan_frequency: ScanFrequency,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            industry: String::new(),
            business_type: String::new(),
            target_audience: String::new(),
            website: String::new(),
            description: String::new(),
            auto_scan: true,
            scan_frequency: ScanFrequency::Weekly,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanFrequency {
    Weekly,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
    Monthly,
}

impl Default for ScanFrequency {
    fn default() -> Self {
        ScanFrequency::Weekly
    }
}

/// Client reference on scans, keywords and reports. The backend sends either
/// a bare id string or a populated summary object depending on the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientRef {
    Populated(ClientSummary),
    Id(String),
}

impl ClientRef {
    pub fn id(&self) -> &str {
        match self {
            ClientRef::Populated(summary) => &summary.id,
            ClientRef::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ClientRef::Populated(summary) if !summary.name.is_empty() => Some(&summary.name),
            _ => None,
        }
    }

    pub fn settings(&self) -> Option<&ClientSettings> {
        match self {
            ClientRef::Populated(summary) => summary.settings.as_ref(),
            ClientRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub settings: Option<ClientSettings>,
}

/// Body for creating or replacing a client record.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    pub name: String,
    pub contact: ClientContact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
    pub settings: ClientSettings,
}

/// Per-client aggregate counts from `/clients/:id/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    #[serde(default)]
    pub total_keywords: u64,
    #[serde(default)]
    pub active_keywords: u64,
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub total_reports: u64,
}

/// Payload describing the client on whose behalf a scan runs; sent verbatim
/// to the sentiment-analysis and send-to-client endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    pub name: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub industry: String,
    pub business_type: String,
    pub target_audience: String,
    pub region: Region,
    pub website: String,
    pub description: String,
}

impl ClientData {
    pub fn from_client(client: &Client, region: Region) -> Self {
        Self {
            name: client.name.clone(),
            client_id: client.id.clone(),
            email: Some(client.contact.email.clone()),
            industry: non_empty_or(&client.settings.industry, "Business"),
            business_type: non_empty_or(&client.settings.business_type, "Business"),
            target_audience: non_empty_or(&client.settings.target_audience, "General"),
            region,
            website: client.settings.website.clone(),
            description: non_empty_or(&client.settings.description, "Business client"),
        }
    }
}

pub(crate) fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSort {
    Name,
    Newest,
}

impl ClientSort {
    pub fn compare(&self, a: &Client, b: &Client) -> Ordering {
        match self {
            ClientSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ClientSort::Newest => b.created_at.cmp(&a.created_at),
        }
    }
}

impl Default for ClientSort {
    fn default() -> Self {
        ClientSort::Name
    }
}

impl FromStr for ClientSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ClientSort::Name),
            "newest" | "latest" => Ok(ClientSort::Newest),
            other => Err(format!("unknown sort key '{}' (expected name, newest)", other)),
        }
    }
}
