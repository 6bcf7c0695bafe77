use crate::config::{Config, Mode};
use crate::errors::{ProcessorError, WorkError};
use crate::results::{ProcessOutcome, ProcessResults};
use crate::sqs::{QueueClient, SqsClient};
use crate::work::{ShareableWorker, Worker};
use rusoto_sqs::Message as SqsMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

const DEADLINE_ERROR: &str = "message processing did not finish before the batch deadline";
const LOST_OUTCOME_ERROR: &str = "message processing did not report an outcome";

/// Redrives one batch of SQS messages through a worker.
///
/// Every message in the batch is handed to the worker concurrently, one
/// task per message. Failed attempts are retried immediately up to the
/// configured ceiling, keeping only the last attempt's error. Once all
/// outcomes are in, successfully processed messages are deleted from the
/// consumed queue and any remaining failures are reported in one
/// aggregate [`ProcessorError::BatchFailure`].
pub struct Redriver {
    config: Config,
    queue_client: Option<Arc<dyn QueueClient>>,
}

impl Redriver {
    pub fn new(config: Config) -> Self {
        Redriver {
            config,
            queue_client: None,
        }
    }

    /// Uses the supplied queue client for deletions instead of building
    /// one from the configured mode. Intended for tests and custom
    /// transports.
    pub fn with_queue_client(config: Config, queue_client: Arc<dyn QueueClient>) -> Self {
        Redriver {
            config,
            queue_client: Some(queue_client),
        }
    }

    /// Processes one batch and decides the batch verdict.
    ///
    /// Returns `Ok(())` only when every message was processed
    /// successfully. A mix of successes and failures (or a batch that
    /// failed entirely) comes back as
    /// [`ProcessorError::BatchFailure`]; configuration, transport and
    /// deletion problems abort the call with their own error.
    ///
    /// Successful messages are always deleted from the queue when a
    /// queue client is attached, even when the whole batch succeeded;
    /// leaving them behind would only invite redelivery. The first
    /// deletion error aborts the call before any failure reporting.
    pub async fn handle_messages(
        &self,
        messages: Vec<SqsMessage>,
        worker: Box<ShareableWorker>,
    ) -> Result<(), ProcessorError> {
        if self.config.retries < 1 {
            return Err(ProcessorError::ConfigurationError(
                "retries must be 1 or above",
            ));
        }
        let queue_client = self.acquire_queue_client()?;

        let worker: Arc<ShareableWorker> = Arc::from(worker);
        let total = messages.len();
        let (tx, mut rx) = mpsc::channel(total.max(1));
        let mut pending: HashMap<usize, SqsMessage> = HashMap::with_capacity(total);

        for (index, message) in messages.into_iter().enumerate() {
            pending.insert(index, message.clone());
            let worker = Arc::clone(&worker);
            let tx = tx.clone();
            let retries = self.config.retries;
            tokio::spawn(async move {
                let outcome = execute(message, worker, retries).await;
                // The receiver is gone once the batch deadline expires
                let _ = tx.send((index, outcome)).await;
            });
        }
        drop(tx);

        let deadline = self.config.batch_deadline.map(|d| Instant::now() + d);
        let mut deadline_expired = false;
        let mut results = ProcessResults::new(total);
        while results.received() < total {
            let received = match deadline {
                Some(at) => match time::timeout_at(at, rx.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        warn!(
                            "Batch deadline expired with {} messages still pending",
                            pending.len()
                        );
                        deadline_expired = true;
                        break;
                    }
                },
                None => rx.recv().await,
            };
            match received {
                Some((index, outcome)) => {
                    pending.remove(&index);
                    results.add_result(outcome);
                }
                None => break,
            }
        }
        for (_, message) in pending {
            let error = if deadline_expired {
                WorkError::new(DEADLINE_ERROR)
            } else {
                WorkError::new(LOST_OUTCOME_ERROR)
            };
            results.add_result(ProcessOutcome::new(message, Some(error)));
        }

        delete_processed_messages(&results, queue_client.as_ref()).await?;

        if results.has_only_successes() {
            debug!("All {} messages processed successfully", results.total());
            return Ok(());
        }
        Err(ProcessorError::BatchFailure(results))
    }

    fn acquire_queue_client(&self) -> Result<Option<Arc<dyn QueueClient>>, ProcessorError> {
        if let Some(queue_client) = &self.queue_client {
            return Ok(Some(Arc::clone(queue_client)));
        }
        match &self.config.mode {
            Mode::Debug => Ok(None),
            Mode::AWS(region, queue) => Ok(Some(Arc::new(SqsClient::new(region.clone(), queue)?))),
            Mode::Local(port, queue) => Ok(Some(Arc::new(SqsClient::local(*port, queue)?))),
        }
    }
}

/// Runs the retry loop for one message and produces its terminal outcome.
/// Attempts are strictly sequential; the first success wins, otherwise
/// the error of the last attempt is kept.
async fn execute(
    message: SqsMessage,
    worker: Arc<ShareableWorker>,
    retries: u64,
) -> ProcessOutcome {
    let mut last_error = None;
    for attempt in 1..=retries {
        match run_attempt(&message, &worker).await {
            Ok(()) => {
                last_error = None;
                break;
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed for message {:?}: {}",
                    attempt, retries, &message.message_id, e
                );
                last_error = Some(e);
            }
        }
    }
    ProcessOutcome::new(message, last_error)
}

// Each attempt gets its own task so a panicking worker surfaces as a
// failed attempt instead of losing the outcome for its message.
async fn run_attempt(message: &SqsMessage, worker: &Arc<ShareableWorker>) -> Result<(), WorkError> {
    let message = message.clone();
    let worker = Arc::clone(worker);
    let attempt = tokio::spawn(async move { worker.process(message).await });
    match attempt.await {
        Ok(result) => result,
        Err(e) => Err(WorkError::new(format!("worker crashed: {}", e))),
    }
}

async fn delete_processed_messages(
    results: &ProcessResults,
    queue_client: Option<&Arc<dyn QueueClient>>,
) -> Result<(), ProcessorError> {
    let queue_client = match queue_client {
        Some(queue_client) => queue_client,
        None => {
            debug!(
                "No queue client attached, skipping deletion of {} processed messages",
                results.successes().len()
            );
            return Ok(());
        }
    };
    for outcome in results.successes() {
        match outcome.message().receipt_handle.as_deref() {
            Some(receipt_handle) => queue_client.delete_message(receipt_handle).await?,
            None => error!(
                "Cannot delete message {:?} as it has no receipt handle",
                outcome.message()
            ),
        }
    }
    Ok(())
}
