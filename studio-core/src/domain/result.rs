use super::task::TaskKind;
use std::time::Duration;

/// The single response shape returned to callers regardless of which provider served them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub output: String,
    /// Provider that actually produced `output`, after any fallback.
    pub provider: String,
    pub model_used: String,
    pub task: TaskKind,
    pub latency: Duration,
    /// Upstream attempts made, including the successful one.
    pub attempts: usize,
}

impl NormalizedResult {
    pub fn used_fallback(&self) -> bool {
        self.attempts > 1
    }

    /// Equality that ignores timing, for comparing repeated runs.
    pub fn same_content(&self, other: &Self) -> bool {
        self.output == other.output
            && self.provider == other.provider
            && self.model_used == other.model_used
            && self.task == other.task
            && self.attempts == other.attempts
    }
}
