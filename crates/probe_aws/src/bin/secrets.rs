use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::secret::SecretRunner;
use probe_core::run_flow;

const SECRET_NAME: &str = "my-secret";
const INITIAL_VALUE: &str = "my-secret-value";
const UPDATED_VALUE: &str = "my-new-secret-value";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_secretsmanager::Client::new(&config.sdk_config().await);
    let runner = SecretRunner::new(client, SECRET_NAME, INITIAL_VALUE, UPDATED_VALUE);

    let report = match run_flow(&runner).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "secret flow aborted");
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    match runner.list_names().await {
        Ok(names) => {
            println!("secrets:");
            for name in names {
                println!("* {name}");
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::warn!(%error, "failed to list secrets");
            ExitCode::SUCCESS
        }
    }
}
