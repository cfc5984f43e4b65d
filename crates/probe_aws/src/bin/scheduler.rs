use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::schedule::ScheduleRunner;
use probe_core::run_flow;

const GROUP_NAME: &str = "default";
const SCHEDULE_NAME: &str = "my-scheduler";
const TARGET_ARN: &str = "arn:aws:lambda:us-east-1:000000000000:function:my-function";
const ROLE_ARN: &str = "arn:aws:iam::000000000000:role/service-role/MySchedulerRole";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_scheduler::Client::new(&config.sdk_config().await);
    let runner = ScheduleRunner::new(client, GROUP_NAME, SCHEDULE_NAME, TARGET_ARN, ROLE_ARN);

    let report = match run_flow(&runner).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "schedule flow aborted");
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    match runner.enumerate_groups().await {
        Ok(groups) => {
            println!("schedule groups:");
            for (group, records) in groups {
                println!("* {group}");
                for record in records {
                    println!("  {record}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::warn!(%error, "failed to list schedule groups");
            ExitCode::SUCCESS
        }
    }
}
