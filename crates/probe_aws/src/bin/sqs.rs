use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::queue::QueueRunner;
use probe_core::run_flow;

const QUEUE_NAME: &str = "my-queue";
const MESSAGE_BODY: &str = "Hello World!";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_sqs::Client::new(&config.sdk_config().await);
    let runner = QueueRunner::new(client, QUEUE_NAME, MESSAGE_BODY);

    let report = match run_flow(&runner).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "queue flow aborted");
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    match runner.receive_from_all_queues().await {
        Ok(queues) => {
            println!("queues:");
            for (queue_url, records) in queues {
                println!("* {queue_url}");
                for record in records {
                    println!("  {record}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::warn!(%error, "failed to list queues");
            ExitCode::SUCCESS
        }
    }
}
