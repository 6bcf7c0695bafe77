use crate::errors::WorkError;
use rusoto_sqs::Message as SqsMessage;

/// Terminal result of processing one message: the message itself plus the
/// error from the last attempt, if every attempt failed.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    message: SqsMessage,
    error: Option<WorkError>,
}

impl ProcessOutcome {
    pub fn new(message: SqsMessage, error: Option<WorkError>) -> Self {
        ProcessOutcome { message, error }
    }

    pub fn message(&self) -> &SqsMessage {
        &self.message
    }

    pub fn error(&self) -> Option<&WorkError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Accumulated outcomes for one batch, partitioned as they arrive.
///
/// Outcomes land in `successes` or `failures` solely based on whether an
/// error is present. Order within each list is completion order, which is
/// unrelated to the order messages were submitted in.
#[derive(Debug, Clone)]
pub struct ProcessResults {
    total: usize,
    successes: Vec<ProcessOutcome>,
    failures: Vec<ProcessOutcome>,
}

impl ProcessResults {
    pub fn new(total: usize) -> Self {
        ProcessResults {
            total,
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn add_result(&mut self, outcome: ProcessOutcome) {
        if outcome.is_success() {
            self.successes.push(outcome);
        } else {
            self.failures.push(outcome);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn successes(&self) -> &[ProcessOutcome] {
        &self.successes
    }

    pub fn failures(&self) -> &[ProcessOutcome] {
        &self.failures
    }

    /// Number of outcomes collected so far.
    pub fn received(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn has_only_successes(&self) -> bool {
        self.successes.len() == self.total
    }
}
