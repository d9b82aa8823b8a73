use std::fmt;

use super::AnalysisError;

/// Where an analysis is in its `initialize -> fill* -> finalize` lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
    Finalized,
}

/// A call on the analysis contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Initialize,
    Fill,
    Finalize,
}

impl LifecycleState {
    /// State reached by performing `step`, or `InvalidTransition` if `step`
    /// is not allowed from here. Nothing is legal once finalized.
    pub fn advance(self, step: LifecycleStep) -> Result<LifecycleState, AnalysisError> {
        match (self, step) {
            (LifecycleState::Uninitialized, LifecycleStep::Initialize) => Ok(LifecycleState::Initialized),
            (LifecycleState::Initialized, LifecycleStep::Fill) => Ok(LifecycleState::Initialized),
            (LifecycleState::Initialized, LifecycleStep::Finalize) => Ok(LifecycleState::Finalized),
            (state, step) => Err(AnalysisError::InvalidTransition { state, step }),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Initialized => write!(f, "initialized"),
            LifecycleState::Finalized => write!(f, "finalized"),
        }
    }
}

impl fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStep::Initialize => write!(f, "initialize"),
            LifecycleStep::Fill => write!(f, "fill"),
            LifecycleStep::Finalize => write!(f, "finalize"),
        }
    }
}
