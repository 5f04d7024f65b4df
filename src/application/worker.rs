use crate::application::processor::{ChargeProcessor, ExecutionOutcome};
use crate::domain::charge::ChargeId;
use crate::error::{BillingError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Consuming half of the processor's FIFO of charges to execute.
pub struct ChargeQueue {
    receiver: mpsc::UnboundedReceiver<ChargeId>,
}

impl ChargeQueue {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<ChargeId>) -> Self {
        Self { receiver }
    }

    /// Number of charges waiting to be processed.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Executes queued charges and periodically notifies riders of overdue ones.
///
/// Denied charges stay pending and are not put back on the queue.
pub struct ChargeWorker {
    processor: Arc<ChargeProcessor>,
    queue: ChargeQueue,
}

impl ChargeWorker {
    pub fn new(processor: Arc<ChargeProcessor>, queue: ChargeQueue) -> Self {
        Self { processor, queue }
    }

    /// Processes every charge currently queued, in enqueue order.
    pub async fn drain(&mut self) -> Vec<(ChargeId, Result<ExecutionOutcome>)> {
        let mut results = Vec::with_capacity(self.queue.len());
        while let Ok(id) = self.queue.receiver.try_recv() {
            let result = execute(&self.processor, id).await;
            results.push((id, result));
        }
        results
    }

    /// Runs until `shutdown` resolves, executing charges as they arrive and
    /// scanning for overdue charges every `scan_interval`.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut scan = tokio::time::interval(self.processor.config().scan_interval);
        info!("charge worker started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(id) = self.queue.receiver.recv() => {
                    // Outcomes are already logged by `execute`.
                    let _outcome = execute(&self.processor, id).await;
                }
                _ = scan.tick() => {
                    if let Err(e) = self.processor.notify_overdue().await {
                        error!(error = %e, "overdue scan failed");
                    }
                }
            }
        }

        info!("charge worker stopped");
    }
}

async fn execute(processor: &ChargeProcessor, id: ChargeId) -> Result<ExecutionOutcome> {
    let result = processor.execute_charge(id).await;
    match &result {
        Ok(_) => {}
        Err(BillingError::PaymentNotAuthorized) => {
            warn!(charge = %id, "charge left pending after denial");
        }
        Err(e) => error!(charge = %id, error = %e, "charge processing failed"),
    }
    result
}
