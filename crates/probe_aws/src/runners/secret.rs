use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use aws_sdk_secretsmanager::Client;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

/// Provisions a secret with an initial value, rotates it to a new value,
/// and reads the current value back.
pub struct SecretRunner {
    client: Client,
    spec: ResourceSpec,
    initial_value: String,
    updated_value: String,
}

impl SecretRunner {
    pub fn new(client: Client, secret_name: &str, initial_value: &str, updated_value: &str) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::Secret, secret_name),
            initial_value: initial_value.to_string(),
            updated_value: updated_value.to_string(),
        }
    }

    /// Names of every secret in the store, for the binary's listing.
    pub async fn list_names(&self) -> Result<Vec<String>, FlowError> {
        let output = self
            .client
            .list_secrets()
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output
            .secret_list()
            .iter()
            .filter_map(|entry| entry.name().map(str::to_string))
            .collect())
    }
}

#[async_trait]
impl ResourceFlow for SecretRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .create_secret()
            .name(&self.spec.name)
            .secret_string(&self.initial_value)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_resource_exists_exception() {
                    Ok(Provisioned::AlreadyExists)
                } else {
                    Err(FlowError::provision(
                        &self.spec,
                        DisplayErrorContext(&service_error),
                    ))
                }
            }
        }
    }

    async fn write(&self) -> Result<(), FlowError> {
        self.client
            .update_secret()
            .secret_id(&self.spec.name)
            .secret_string(&self.updated_value)
            .send()
            .await
            .map_err(|error| FlowError::write(&self.spec, DisplayErrorContext(&error)))?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.spec.name)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(vec![Record::new(
            self.spec.name.clone(),
            output.secret_string().unwrap_or_default(),
        )])
    }
}
