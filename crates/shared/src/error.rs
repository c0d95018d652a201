use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{SpinGeneration, SpinPhase};

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("image request timed out")]
    Timeout,
    #[error("image provider responded with status {0}")]
    Status(u16),
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image fetch task ended before producing a result")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("stale callback for generation {got:?}; current is {expected:?}")]
    StaleGeneration {
        expected: SpinGeneration,
        got: SpinGeneration,
    },
    #[error("engine is not resolving (phase {0:?})")]
    NotResolving(SpinPhase),
    #[error("engine is not spinning (phase {0:?})")]
    NotSpinning(SpinPhase),
    #[error("resolution payload must be text, image or failure")]
    NonTerminalPayload,
    #[error("invalid wheel size {0}")]
    InvalidSize(i64),
}

impl EngineError {
    pub fn is_stale(&self) -> bool {
        matches!(self, EngineError::StaleGeneration { .. })
    }
}
