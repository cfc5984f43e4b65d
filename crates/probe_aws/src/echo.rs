//! Pure API Gateway echo handler behind the `lambda_echo` binary. Logs the
//! incoming request's shape and answers with a fixed greeting; runtime
//! wiring stays in the binary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

pub fn handle_echo_event(event: &Value) -> ApiGatewayResponse {
    let summary = summarize_request(event);
    tracing::info!(request = %summary, "api gateway request received");

    ApiGatewayResponse {
        status_code: 200,
        headers: json!({"Content-Type": "text/plain"}),
        body: "Hello, Lambda!".to_string(),
    }
}

/// Collects the fields worth echoing. Absent fields log as `unknown`
/// rather than failing the invocation.
fn summarize_request(event: &Value) -> Value {
    let unknown = || Value::String("unknown".to_string());
    json!({
        "request_id": event
            .pointer("/requestContext/requestId")
            .cloned()
            .unwrap_or_else(unknown),
        "http_method": event.get("httpMethod").cloned().unwrap_or_else(unknown),
        "path": event.get("path").cloned().unwrap_or_else(unknown),
        "query_string_parameters": event
            .get("queryStringParameters")
            .cloned()
            .unwrap_or(Value::Null),
        "headers": event.get("headers").cloned().unwrap_or(Value::Null),
        "body": event.get("body").cloned().unwrap_or(Value::Null),
        "is_base64_encoded": event
            .get("isBase64Encoded")
            .cloned()
            .unwrap_or(Value::Bool(false)),
    })
}
