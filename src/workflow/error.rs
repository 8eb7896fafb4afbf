use thiserror::Error;

use super::TriggerStep;

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("Please add at least one keyword")]
    NoKeywords,

    #[error("Scan timed out. The process is taking longer than expected. Please try again with fewer keywords or check your internet connection.")]
    TimedOut { step: TriggerStep },

    #[error("Step {} of 4 ({}) failed: {message}", .step.index(), .step.label())]
    StepFailed { step: TriggerStep, message: String },
}

impl TriggerError {
    /// The step the run died on, when it got that far.
    pub fn step(&self) -> Option<TriggerStep> {
        match self {
            TriggerError::NoKeywords => None,
            TriggerError::TimedOut { step } | TriggerError::StepFailed { step, .. } => Some(*step),
        }
    }
}
