use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;

const ENDPOINT_VAR: &str = "LOCALSTACK_ENDPOINT";
const REGION_VAR: &str = "LOCALSTACK_DEFAULT_REGION";
const ACCESS_KEY_ID_VAR: &str = "LOCALSTACK_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY_VAR: &str = "LOCALSTACK_SECRET_ACCESS_KEY";

const DEFAULT_ENDPOINT: &str = "http://localhost:4566";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ACCESS_KEY_ID: &str = "AKID";
const DEFAULT_SECRET_ACCESS_KEY: &str = "SECRET";

/// Connection settings for the LocalStack endpoint, resolved once at
/// startup and passed to whichever service client a probe constructs.
/// There is no process-wide environment mutation; unset variables fall
/// back to the LocalStack defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    pub endpoint_url: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl StackConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let resolve = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            endpoint_url: resolve(ENDPOINT_VAR, DEFAULT_ENDPOINT),
            region: resolve(REGION_VAR, DEFAULT_REGION),
            access_key_id: resolve(ACCESS_KEY_ID_VAR, DEFAULT_ACCESS_KEY_ID),
            secret_access_key: resolve(SECRET_ACCESS_KEY_VAR, DEFAULT_SECRET_ACCESS_KEY),
        }
    }

    /// Builds the shared SDK configuration: explicit endpoint, region, and
    /// static credentials, bypassing the default provider chain.
    pub async fn sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .endpoint_url(self.endpoint_url.clone())
            .credentials_provider(Credentials::new(
                self.access_key_id.clone(),
                self.secret_access_key.clone(),
                None,
                None,
                "localstack-static",
            ))
            .load()
            .await
    }
}
