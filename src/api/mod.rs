//! Typed, per-resource services over the gateway.
//!
//! Each service is a thin wrapper owning an [`ApiGateway`](crate::gateway::ApiGateway)
//! handle: it knows its endpoints and payload shapes, returns typed DTOs,
//! and propagates [`GatewayError`](crate::gateway::GatewayError) untouched.
//! Authorization failures never surface here; the gateway has already torn
//! the session down by the time a service sees the error.

mod query;

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod gate;
pub mod keywords;
pub mod orm_scan;
pub mod reports;
pub mod scans;

pub use auth::AuthApi;
pub use clients::ClientApi;
pub use dashboard::DashboardApi;
pub use gate::{ActionGate, ActionPermit};
pub use keywords::{KeywordApi, KeywordQuery};
pub use orm_scan::{OrmScanApi, PipelineResponse};
pub use reports::ReportApi;
pub use scans::{ScanApi, ScanApiError, ScanQuery};
