use tracing::{info, warn};
use uuid::Uuid;

use super::error::TriggerError;
use super::pipeline::{ScanPipeline, StepError};
use super::{TriggerOutcome, TriggerRequest, TriggerStep};
use crate::gateway::GatewayError;

/// Drives the four steps of a scan run strictly in order.
///
/// There is no parallelism and no cancellation: a step failure aborts the
/// remainder and reports exactly which step died. Work already done stays
/// done; a scan record created by step 1 survives a later failure.
pub struct TriggerRunner<P> {
    pipeline: P,
}

impl<P: ScanPipeline> TriggerRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self, request: &TriggerRequest) -> Result<TriggerOutcome, TriggerError> {
        self.run_with_progress(request, |_| {}).await
    }

    /// Runs the pipeline, announcing each step to `on_step` just before it
    /// executes, which is what the console's progress lines hang off.
    pub async fn run_with_progress<F>(
        &self,
        request: &TriggerRequest,
        mut on_step: F,
    ) -> Result<TriggerOutcome, TriggerError>
    where
        F: FnMut(TriggerStep),
    {
        if request.keywords.is_empty() {
            return Err(TriggerError::NoKeywords);
        }

        let run_id = Uuid::new_v4();
        info!(
            "trigger run {}: client '{}', {} keyword(s), region {}",
            run_id,
            request.client.name,
            request.keywords.len(),
            request.region
        );

        on_step(TriggerStep::CreateScan);
        let scan_id = self
            .pipeline
            .create_scan(request)
            .await
            .map_err(|e| fail(run_id, TriggerStep::CreateScan, e))?;
        info!("trigger run {}: created scan {}", run_id, scan_id);

        on_step(TriggerStep::Search);
        let links = self
            .pipeline
            .search(request)
            .await
            .map_err(|e| fail(run_id, TriggerStep::Search, e))?;
        info!("trigger run {}: search returned {} link(s)", run_id, links.len());

        on_step(TriggerStep::Analyze);
        let results = self
            .pipeline
            .analyze(request, links)
            .await
            .map_err(|e| fail(run_id, TriggerStep::Analyze, e))?;
        info!("trigger run {}: analyzed {} result(s)", run_id, results.len());

        on_step(TriggerStep::SaveResults);
        let results_count = self
            .pipeline
            .save_results(request, &scan_id, results)
            .await
            .map_err(|e| fail(run_id, TriggerStep::SaveResults, e))?;
        info!(
            "trigger run {}: completed scan {} with {} result(s)",
            run_id, scan_id, results_count
        );

        Ok(TriggerOutcome {
            scan_id,
            results_count,
            steps_completed: TriggerStep::ALL.len() as u8,
        })
    }
}

/// Maps a step failure onto the message the console shows: timeouts get the
/// timeout wording, a 500 gets the generic server-error wording, anything
/// else carries its own message under the step heading.
fn fail(run_id: Uuid, step: TriggerStep, error: StepError) -> TriggerError {
    warn!(
        "trigger run {}: step {} ({}) failed: {}",
        run_id,
        step.index(),
        step.label(),
        error
    );

    match error {
        StepError::Gateway(GatewayError::Timeout) => TriggerError::TimedOut { step },
        StepError::Gateway(GatewayError::Api { status: 500, .. }) => TriggerError::StepFailed {
            step,
            message: "Server error during scan. Please try again.".to_string(),
        },
        StepError::Gateway(err) => TriggerError::StepFailed {
            step,
            message: err.message(),
        },
        StepError::Failed(message) => TriggerError::StepFailed { step, message },
    }
}
