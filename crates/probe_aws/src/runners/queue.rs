use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::Client;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

use crate::poll::{read_until_visible, PollPolicy};

/// Provisions a queue, sends one message, and receives messages back.
pub struct QueueRunner {
    client: Client,
    spec: ResourceSpec,
    message_body: String,
    poll: PollPolicy,
}

impl QueueRunner {
    pub fn new(client: Client, queue_name: &str, message_body: &str) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::Queue, queue_name),
            message_body: message_body.to_string(),
            poll: PollPolicy::default(),
        }
    }

    #[cfg(test)]
    fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// The queue URL is resolved per call rather than cached; the runner
    /// stays stateless between flow stages. The caller tags the stage.
    async fn queue_url(&self) -> Result<String, String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(&self.spec.name)
            .send()
            .await
            .map_err(|error| DisplayErrorContext(&error).to_string())?;
        output
            .queue_url()
            .map(str::to_string)
            .ok_or_else(|| "queue url missing from response".to_string())
    }

    async fn receive_from(&self, queue_url: &str) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(10)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output
            .messages()
            .iter()
            .map(|message| {
                Record::new(
                    message.message_id().unwrap_or("unknown"),
                    message.body().unwrap_or_default(),
                )
            })
            .collect())
    }

    /// Enumerates every queue and the messages currently receivable from
    /// it. A queue that fails to receive is skipped, not fatal.
    pub async fn receive_from_all_queues(&self) -> Result<Vec<(String, Vec<Record>)>, FlowError> {
        let output = self
            .client
            .list_queues()
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        let mut queues = Vec::new();
        for queue_url in output.queue_urls() {
            match self.receive_from(queue_url).await {
                Ok(records) => queues.push((queue_url.clone(), records)),
                Err(error) => {
                    tracing::warn!(%queue_url, %error, "skipping queue");
                }
            }
        }
        Ok(queues)
    }
}

#[async_trait]
impl ResourceFlow for QueueRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .create_queue()
            .queue_name(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_queue_name_exists() {
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
        let queue_url = self
            .queue_url()
            .await
            .map_err(|message| FlowError::write(&self.spec, message))?;
        self.client
            .send_message()
            .queue_url(queue_url)
            .message_body(&self.message_body)
            .send()
            .await
            .map_err(|error| FlowError::write(&self.spec, DisplayErrorContext(&error)))?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        let queue_url = self
            .queue_url()
            .await
            .map_err(|message| FlowError::read(&self.spec, message))?;
        read_until_visible(
            &self.poll,
            || self.receive_from(&queue_url),
            |records| !records.is_empty(),
        )
        .await
    }
}
