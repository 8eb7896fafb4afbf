//! The trigger-scan workflow.
//!
//! A scan run is a fixed four-step chain against the backend: create the
//! scan record, search the web, score the findings, persist the results.
//! The chain is strictly sequential and every step must succeed for the
//! scan to complete; a failure leaves the already-created record behind in
//! `running` state and reports the step that died.

mod error;
mod pipeline;
mod runner;

pub use error::TriggerError;
pub use pipeline::{LivePipeline, ScanPipeline, StepError};
pub use runner::TriggerRunner;

use crate::models::{Client, ClientData, Region};

/// The fixed sequence of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStep {
    CreateScan,
    Search,
    Analyze,
    SaveResults,
}

impl TriggerStep {
    pub const ALL: [TriggerStep; 4] = [
        TriggerStep::CreateScan,
        TriggerStep::Search,
        TriggerStep::Analyze,
        TriggerStep::SaveResults,
    ];

    /// 1-based position, the way the progress lines count.
    pub fn index(&self) -> u8 {
        match self {
            TriggerStep::CreateScan => 1,
            TriggerStep::Search => 2,
            TriggerStep::Analyze => 3,
            TriggerStep::SaveResults => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerStep::CreateScan => "Creating scan record",
            TriggerStep::Search => "Fetching search results",
            TriggerStep::Analyze => "Analyzing sentiment",
            TriggerStep::SaveResults => "Saving results",
        }
    }
}

/// Everything a run needs up front: the client it runs on behalf of, the
/// keywords to search, and the target region.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub client: Client,
    pub keywords: Vec<String>,
    pub region: Region,
}

impl TriggerRequest {
    pub fn new(client: Client, keywords: Vec<String>, region: Region) -> Self {
        Self {
            client,
            keywords,
            region,
        }
    }

    /// Search query for step 2: the client's name prepended to the joined
    /// keywords, anchoring results to the client.
    pub fn combined_query(&self) -> String {
        let keywords = self.keywords.join(" ");
        if self.client.name.is_empty() {
            keywords
        } else {
            format!("{} {}", self.client.name, keywords)
        }
    }

    /// Client payload the analysis and persistence steps carry.
    pub fn client_data(&self) -> ClientData {
        ClientData::from_client(&self.client, self.region)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub scan_id: String,
    pub results_count: u32,
    pub steps_completed: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(name: &str) -> Client {
        Client {
            id: "c1".to_string(),
            name: name.to_string(),
            logo: None,
            contact: Default::default(),
            subscription: None,
            settings: Default::default(),
            keywords: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn combined_query_prefixes_client_name() {
        let request = TriggerRequest::new(
            client("Acme Corp"),
            vec!["reviews".to_string(), "reputation".to_string()],
            Region::US,
        );
        assert_eq!(request.combined_query(), "Acme Corp reviews reputation");
    }

    #[test]
    fn combined_query_without_name_is_just_keywords() {
        let request = TriggerRequest::new(client(""), vec!["reviews".to_string()], Region::UK);
        assert_eq!(request.combined_query(), "reviews");
    }

    #[test]
    fn steps_are_numbered_one_to_four() {
        let indexes: Vec<u8> = TriggerStep::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
    }
}
