use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

use probe_aws::echo::handle_echo_event;

async fn handle_request(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let response = handle_echo_event(&event.payload);
    serde_json::to_value(response)
        .map_err(|error| Error::from(format!("failed to serialize echo response: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    probe_aws::init_tracing();
    lambda_runtime::run(service_fn(handle_request)).await
}
