use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::table::TableRunner;
use probe_core::run_flow;

const TABLE_NAME: &str = "my-table";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_dynamodb::Client::new(&config.sdk_config().await);
    let runner = TableRunner::new(client, TABLE_NAME);

    let report = match run_flow(&runner).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "table flow aborted");
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    match runner.scan_all().await {
        Ok(records) => {
            println!("scan results ({}):", records.len());
            for record in records {
                println!("* {record}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::warn!(%error, "failed to scan table");
            ExitCode::SUCCESS
        }
    }
}
