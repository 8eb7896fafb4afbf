//! Typed views of the backend's JSON records.
//!
//! The backend owns these shapes; everything here is camelCase on the wire
//! with Mongo-style `_id` identifiers (accepted as `id` too). Records are
//! deserialized leniently: unknown fields are ignored and most fields carry
//! defaults, so older documents and partial projections still load.

pub mod client;
pub mod dashboard;
pub mod keyword;
pub mod region;
pub mod report;
pub mod scan;
pub mod user;

pub use client::{
    Client, ClientContact, ClientData, ClientPayload, ClientRef, ClientSettings, ClientSort,
    ClientStats, ClientSummary, ScanFrequency, Subscription, SubscriptionStatus,
};
pub use dashboard::{
    AdminDashboard, AdminOverview, ClientDashboard, ClientInfo, ClientOverview, DashboardCharts,
    RecentActivity, TrendPoint,
};
pub use keyword::{
    BulkKeywordEntry, BulkKeywords, BulkKeywordsResponse, Keyword, KeywordPriority, KeywordSort,
    KeywordStatus, KeywordStatusResponse, NewKeyword,
};
pub use region::Region;
pub use report::{
    Report, ReportActionResponse, ReportSort, ReportStatus, ReportSummary, ReportType,
};
pub use scan::{
    ClientStatus, CreateScanResponse, CreatedScan, DeleteScanResponse, NewScan, SaveResultsResponse,
    Scan, ScanActionResponse, ScanSort, ScanStatus, ScanType,
};
pub use user::{AuthUser, LoginResponse, UserRole};
