use std::process::ExitCode;

use probe_aws::config::StackConfig;
use probe_aws::report::print_report;
use probe_aws::runners::bucket::BucketRunner;
use probe_core::run_flow;

const BUCKET_NAME: &str = "my-bucket";
const OBJECT_KEY: &str = "my-key";
const OBJECT_BODY: &[u8] = b"Hello, World!";

#[tokio::main]
async fn main() -> ExitCode {
    probe_aws::init_tracing();

    let config = StackConfig::from_env();
    let client = aws_sdk_s3::Client::new(&config.sdk_config().await);
    let runner = BucketRunner::new(client, BUCKET_NAME, OBJECT_KEY, OBJECT_BODY);

    let report = match run_flow(&runner).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "bucket flow aborted");
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    match runner.enumerate_buckets().await {
        Ok(buckets) => {
            println!("buckets:");
            for (bucket, records) in buckets {
                println!("* {bucket}");
                for record in records {
                    println!("  {record}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::warn!(%error, "failed to list buckets");
            ExitCode::SUCCESS
        }
    }
}
