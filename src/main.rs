#[macro_use]
extern crate log;

use rs_sqs_redriver::cli::Cli;
use rs_sqs_redriver::config::{Config, Mode};
use rs_sqs_redriver::errors::ProcessorError;
use rs_sqs_redriver::redriver::Redriver;
use rs_sqs_redriver::sqs::SqsClient;
use rs_sqs_redriver::work::WorkerImpl;
use rusoto_sqs::Message as SqsMessage;

#[tokio::main]
async fn main() {
    env_logger::init();

    match Cli::new().determine_config() {
        Ok(config) => {
            println!("Initializing rs-sqs-redriver: {:?}", &config.mode);
            if let Err(e) = run(config).await {
                panic!("{}", e);
            }
        }
        Err(e) => {
            panic!("{}", e);
        }
    }
}

async fn run(config: Config) -> Result<(), ProcessorError> {
    let messages = fetch_batch(&config).await?;
    if messages.is_empty() {
        println!("No messages received for queue");
        return Ok(());
    }

    info!("Redriving a batch of {} messages", messages.len());
    let redriver = Redriver::new(config);
    redriver
        .handle_messages(messages, Box::new(WorkerImpl::default()))
        .await
}

async fn fetch_batch(config: &Config) -> Result<Vec<SqsMessage>, ProcessorError> {
    match &config.mode {
        Mode::Debug => Ok(demo_messages()),
        Mode::AWS(region, queue) => {
            SqsClient::new(region.clone(), queue)?.fetch_messages().await
        }
        Mode::Local(port, queue) => SqsClient::local(*port, queue)?.fetch_messages().await,
    }
}

fn demo_messages() -> Vec<SqsMessage> {
    (1..=3)
        .map(|i| {
            let mut message = SqsMessage::default();
            message.message_id = Some(format!("demo-{}", i));
            message.receipt_handle = Some(format!("demo-receipt-{}", i));
            message.body = Some(format!(r#"{{"text": "demo workload {}"}}"#, i));
            message
        })
        .collect()
}
