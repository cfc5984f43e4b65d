use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::logs::LogsRunner;
use probe_core::run_flow;

const LOG_GROUP_NAME: &str = "my-log-group";
const LOG_STREAM_NAME: &str = "my-log-stream";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_cloudwatchlogs::Client::new(&config.sdk_config().await);
    let runner = LogsRunner::new(client, LOG_GROUP_NAME, LOG_STREAM_NAME);

    match run_flow(&runner).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "log flow aborted");
            ExitCode::FAILURE
        }
    }
}
