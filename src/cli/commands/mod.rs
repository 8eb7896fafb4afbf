pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod keywords;
pub mod reports;
pub mod scans;
