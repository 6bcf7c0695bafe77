use crate::errors::ProcessorError;
use futures::future::{BoxFuture, FutureExt};
use rusoto_core::request::HttpClient;
use rusoto_core::Region;
use rusoto_credential::{DefaultCredentialsProvider, StaticProvider};
use rusoto_sqs::{
    DeleteMessageRequest, Message as SqsMessage, ReceiveMessageRequest, Sqs,
    SqsClient as RusotoSqsClient,
};
use std::convert::From;
use std::sync::Arc;

const SQS_LOCAL_REGION: &str = "sqs-local";

/// Capability the batch coordinator needs from the queue: removing one
/// message by its receipt handle.
///
/// [`SqsClient`] is the real implementation; tests inject their own.
pub trait QueueClient: Send + Sync {
    fn delete_message(&self, receipt_handle: &str) -> BoxFuture<'_, Result<(), ProcessorError>>;
}

/// Thin wrapper around the Rusoto SQS client, bound to one queue url.
#[derive(Clone)]
pub struct SqsClient {
    pub queue_url: String,
    sqs: Arc<RusotoSqsClient>,
}

impl SqsClient {
    pub fn new(region: Region, queue_url: &str) -> Result<Self, ProcessorError> {
        let sqs = build_sqs_client(region)?;
        Ok(SqsClient {
            queue_url: queue_url.to_owned(),
            sqs: Arc::new(sqs),
        })
    }

    /// Client for a local Elastic MQ server listening on `port`.
    pub fn local(port: u32, queue_url: &str) -> Result<Self, ProcessorError> {
        SqsClient::new(build_local_region(port), queue_url)
    }

    pub async fn fetch_messages(&self) -> Result<Vec<SqsMessage>, ProcessorError> {
        trace!("fetch_messages called");
        let mut request = ReceiveMessageRequest::default();
        request.max_number_of_messages = Some(10);
        request.queue_url = self.queue_url.clone();

        let result = self.sqs.receive_message(request).await?;
        debug!("fetch messages result: {:?}", &result);
        Ok(result.messages.unwrap_or_else(Vec::new))
    }
}

impl QueueClient for SqsClient {
    fn delete_message(&self, receipt_handle: &str) -> BoxFuture<'_, Result<(), ProcessorError>> {
        debug!("delete_message called. receipt_handle: {}", receipt_handle);
        let mut request = DeleteMessageRequest::default();
        request.queue_url = self.queue_url.clone();
        request.receipt_handle = receipt_handle.to_owned();

        let sqs = Arc::clone(&self.sqs);
        let f = async move {
            sqs.delete_message(request)
                .await
                .map_err(ProcessorError::from)
        };
        f.boxed()
    }
}

fn build_sqs_client(region: Region) -> Result<RusotoSqsClient, ProcessorError> {
    let dispatcher = HttpClient::new()?;
    match region {
        Region::Custom {
            name: _,
            endpoint: _,
        } => {
            // Local endpoints accept any credentials, they just have to exist
            let credentials_provider =
                StaticProvider::new("fakeKey".to_string(), "fakeSecret".to_string(), None, None);
            Ok(RusotoSqsClient::new_with(
                dispatcher,
                credentials_provider,
                region,
            ))
        }
        _ => {
            let credentials_provider = DefaultCredentialsProvider::new()?;
            Ok(RusotoSqsClient::new_with(
                dispatcher,
                credentials_provider,
                region,
            ))
        }
    }
}

fn build_local_region(port: u32) -> Region {
    Region::Custom {
        name: SQS_LOCAL_REGION.to_string(),
        endpoint: format!("http://localhost:{}", port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_region_endpoint() {
        match build_local_region(9324) {
            Region::Custom { name, endpoint } => {
                assert_eq!(SQS_LOCAL_REGION, name);
                assert_eq!("http://localhost:9324", endpoint);
            }
            region => panic!("expected a custom region, got {:?}", region),
        }
    }

    #[test]
    fn test_local_client_construction() {
        let client = SqsClient::local(9324, "http://localhost:9324/queue/test").unwrap();
        assert_eq!("http://localhost:9324/queue/test", client.queue_url);
    }
}
