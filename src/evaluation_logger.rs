use serde::{Deserialize, Serialize};

use crate::{EvaluationReason, FlagValue};

/// Record of a single flag evaluation made through [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationEvent {
    #[allow(missing_docs)]
    pub flag: String,
    #[allow(missing_docs)]
    pub flag_version: i64,
    #[allow(missing_docs)]
    pub user: String,
    #[allow(missing_docs)]
    pub value: FlagValue,
    #[allow(missing_docs)]
    pub reason: EvaluationReason,
    /// RFC 3339 time of the evaluation.
    pub timestamp: String,
}

/// Receives every successful evaluation, e.g. to forward it to an analytics pipeline.
///
/// Closures taking an [`EvaluationEvent`] implement this trait.
pub trait EvaluationLogger {
    #[allow(missing_docs)]
    fn log_evaluation(&self, event: EvaluationEvent);
}

pub(crate) struct NoopEvaluationLogger;
impl EvaluationLogger for NoopEvaluationLogger {
    fn log_evaluation(&self, _event: EvaluationEvent) {}
}

impl<T: Fn(EvaluationEvent)> EvaluationLogger for T {
    fn log_evaluation(&self, event: EvaluationEvent) {
        self(event);
    }
}
