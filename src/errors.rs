use crate::results::ProcessResults;
use rusoto_core::request::TlsError as RusotoTlsError;
use rusoto_core::RusotoError;
use rusoto_credential::CredentialsError as RusotoCredentialsError;
use rusoto_sqs::{DeleteMessageError, ReceiveMessageError};
use serde_json::Error as SerdeJsonError;
use std::convert::From;
use std::error::Error;
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum ProcessorError {
    ConfigurationError(&'static str),
    CommandLineError(&'static str),
    TlsError(RusotoTlsError),
    CredentialsError(RusotoCredentialsError),
    SqsReceiveMessageError(RusotoError<ReceiveMessageError>),
    SqsDeleteMessageError(RusotoError<DeleteMessageError>),
    JsonParseError(SerdeJsonError),
    BatchFailure(ProcessResults),
}

impl Display for ProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessorError::ConfigurationError(e) => {
                write!(f, "A configuration error occurred: {}", e)
            }
            ProcessorError::CommandLineError(e) => {
                write!(f, "A command line error occurred: {}", e)
            }
            ProcessorError::TlsError(e) => write!(f, "A TLS error occurred: {:#?}", e),
            ProcessorError::CredentialsError(e) => {
                write!(f, "A credentials error occurred: {:#?}", e)
            }
            ProcessorError::SqsReceiveMessageError(e) => {
                write!(f, "Error receiving SQS messages: {:#?}", e)
            }
            ProcessorError::SqsDeleteMessageError(e) => {
                write!(f, "Error deleting SQS message: {:#?}", e)
            }
            ProcessorError::JsonParseError(e) => write!(f, "Error parsing JSON: {:#?}", e),
            ProcessorError::BatchFailure(results) => {
                writeln!(f, "messages processing failed:")?;
                for outcome in results.failures() {
                    writeln!(
                        f,
                        "message: {}, error: {}",
                        outcome
                            .message()
                            .message_id
                            .as_deref()
                            .unwrap_or("<no message id>"),
                        outcome
                            .error()
                            .map(|e| e.to_string())
                            .unwrap_or_default()
                    )?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ProcessorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ProcessorError::TlsError(ref e) => Some(e),
            ProcessorError::CredentialsError(ref e) => Some(e),
            ProcessorError::SqsReceiveMessageError(ref e) => Some(e),
            ProcessorError::SqsDeleteMessageError(ref e) => Some(e),
            ProcessorError::JsonParseError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<RusotoTlsError> for ProcessorError {
    fn from(e: RusotoTlsError) -> Self {
        ProcessorError::TlsError(e)
    }
}

impl From<RusotoCredentialsError> for ProcessorError {
    fn from(e: RusotoCredentialsError) -> Self {
        ProcessorError::CredentialsError(e)
    }
}

impl From<RusotoError<ReceiveMessageError>> for ProcessorError {
    fn from(e: RusotoError<ReceiveMessageError>) -> Self {
        ProcessorError::SqsReceiveMessageError(e)
    }
}

impl From<RusotoError<DeleteMessageError>> for ProcessorError {
    fn from(e: RusotoError<DeleteMessageError>) -> Self {
        ProcessorError::SqsDeleteMessageError(e)
    }
}

impl From<SerdeJsonError> for ProcessorError {
    fn from(e: SerdeJsonError) -> Self {
        ProcessorError::JsonParseError(e)
    }
}

/// Error reported by a [`Worker`](crate::work::Worker) for a single attempt.
///
/// Every work error is treated the same way: the attempt failed and the
/// message is eligible for another attempt until the retry ceiling is hit.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkError {
    message: String,
}

impl WorkError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        WorkError {
            message: message.into(),
        }
    }
}

impl Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for WorkError {}
