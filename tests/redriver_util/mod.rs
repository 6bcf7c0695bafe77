use futures::future::{self, BoxFuture, FutureExt};
use rs_sqs_redriver::errors::{ProcessorError, WorkError};
use rs_sqs_redriver::sqs::QueueClient;
use rs_sqs_redriver::work::Worker;
use rusoto_core::RusotoError;
use rusoto_sqs::{DeleteMessageError, Message as SqsMessage};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// What the scripted worker should do with a given message, per attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Succeed,
    FailTimes(u64),
    AlwaysFail,
    Panic,
    Hang,
}

/// Worker whose behavior is scripted per message id. Invocation counts are
/// shared so tests can inspect them after the worker has been handed off.
pub struct ScriptedWorker {
    scripts: HashMap<String, Action>,
    invocations: Arc<Mutex<HashMap<String, u64>>>,
}

impl ScriptedWorker {
    pub fn new(scripts: Vec<(&str, Action)>) -> Self {
        ScriptedWorker {
            scripts: scripts
                .into_iter()
                .map(|(id, action)| (id.to_owned(), action))
                .collect(),
            invocations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn invocations(&self) -> Arc<Mutex<HashMap<String, u64>>> {
        Arc::clone(&self.invocations)
    }
}

impl Worker for ScriptedWorker {
    fn process(&self, message: SqsMessage) -> BoxFuture<'static, Result<(), WorkError>> {
        let id = message.message_id.clone().unwrap_or_default();
        let action = self
            .scripts
            .get(&id)
            .cloned()
            .unwrap_or(Action::Succeed);
        let attempt = {
            let mut invocations = self.invocations.lock().unwrap();
            let count = invocations.entry(id).or_insert(0);
            *count += 1;
            *count
        };
        let f = async move {
            match action {
                Action::Succeed => Ok(()),
                Action::FailTimes(times) if attempt <= times => {
                    Err(WorkError::new(format!("attempt {} failed", attempt)))
                }
                Action::FailTimes(_) => Ok(()),
                Action::AlwaysFail => Err(WorkError::new(format!("attempt {} failed", attempt))),
                Action::Panic => panic!("worker exploded"),
                Action::Hang => future::pending::<Result<(), WorkError>>().await,
            }
        };
        f.boxed()
    }
}

pub fn invocations_for(invocations: &Arc<Mutex<HashMap<String, u64>>>, id: &str) -> u64 {
    *invocations.lock().unwrap().get(id).unwrap_or(&0)
}

/// Queue client standing in for SQS: records deleted receipt handles, or
/// fails every call when built with [`RecordingQueueClient::failing`].
pub struct RecordingQueueClient {
    deleted: Arc<Mutex<Vec<String>>>,
    attempts: Arc<Mutex<u64>>,
    fail_deletions: bool,
}

impl RecordingQueueClient {
    pub fn new() -> Self {
        RecordingQueueClient {
            deleted: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(Mutex::new(0)),
            fail_deletions: false,
        }
    }

    pub fn failing() -> Self {
        RecordingQueueClient {
            fail_deletions: true,
            ..RecordingQueueClient::new()
        }
    }

    pub fn deleted(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.deleted)
    }

    pub fn attempts(&self) -> Arc<Mutex<u64>> {
        Arc::clone(&self.attempts)
    }
}

impl QueueClient for RecordingQueueClient {
    fn delete_message(&self, receipt_handle: &str) -> BoxFuture<'_, Result<(), ProcessorError>> {
        let receipt_handle = receipt_handle.to_owned();
        let deleted = Arc::clone(&self.deleted);
        let attempts = Arc::clone(&self.attempts);
        let fail_deletions = self.fail_deletions;
        let f = async move {
            *attempts.lock().unwrap() += 1;
            if fail_deletions {
                return Err(ProcessorError::from(RusotoError::Service(
                    DeleteMessageError::ReceiptHandleIsInvalid(
                        "injected deletion failure".to_owned(),
                    ),
                )));
            }
            deleted.lock().unwrap().push(receipt_handle);
            Ok(())
        };
        f.boxed()
    }
}

pub fn test_message(id: &str) -> SqsMessage {
    let mut message = SqsMessage::default();
    message.message_id = Some(id.to_owned());
    message.receipt_handle = Some(format!("receipt-{}-{}", id, Uuid::new_v4()));
    message.body = Some(format!(r#"{{"text": "{}"}}"#, id));
    message
}
