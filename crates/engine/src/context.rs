use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::metrics::FetchMetrics;

/// Per-run state handed through the engine: the run id for log correlation,
/// the cancellation token and the metrics handle.
#[derive(Debug, Clone)]
pub struct FetchContext {
    run_id: Uuid,
    cancellation: CancellationToken,
    metrics: FetchMetrics,
}

impl FetchContext {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            cancellation,
            metrics: FetchMetrics::new(),
        }
    }

    /// Context with its own token, for callers that never cancel.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn metrics(&self) -> &FetchMetrics {
        &self.metrics
    }
}
