use crate::errors::{ProcessorError, WorkError};
use futures::future::{BoxFuture, FutureExt};
use rusoto_sqs::Message as SqsMessage;
use std::convert::From;
use std::str::FromStr;

/// A worker processes one message and reports whether the attempt
/// succeeded.
///
/// Workers must tolerate being invoked more than once for the same
/// message: every failed attempt is retried with the identical message up
/// to the configured ceiling, and SQS itself only guarantees at-least-once
/// delivery.
pub trait Worker {
    fn process(&self, message: SqsMessage) -> BoxFuture<'static, Result<(), WorkError>>;
}

pub type ShareableWorker = dyn Worker + Send + Sync;

/// Demo worker that expects a JSON [`WorkLoad`] body and logs it.
#[derive(Clone, Default)]
pub struct WorkerImpl;

impl Worker for WorkerImpl {
    fn process(&self, m: SqsMessage) -> BoxFuture<'static, Result<(), WorkError>> {
        let f = async move {
            let body = m
                .body
                .ok_or_else(|| WorkError::new("Message contains no body"))?;
            let workload = WorkLoad::from_str(body.as_ref())
                .map_err(|e| WorkError::new(format!("Invalid Workload {:?}", e)))?;
            info!("Received workload: {:#?}", &workload);
            Ok(())
        };
        f.boxed()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkLoad {
    pub text: String,
}

impl FromStr for WorkLoad {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, <Self as FromStr>::Err> {
        serde_json::from_str(s).map_err(ProcessorError::from)
    }
}
