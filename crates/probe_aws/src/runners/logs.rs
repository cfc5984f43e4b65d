use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use aws_sdk_cloudwatchlogs::Client;
use chrono::Utc;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

use crate::poll::{read_until_visible, PollPolicy};

/// Provisions a log group plus one stream inside it, puts a single log
/// event, and reads the stream back from the head.
pub struct LogsRunner {
    client: Client,
    spec: ResourceSpec,
    stream_name: String,
    poll: PollPolicy,
}

impl LogsRunner {
    pub fn new(client: Client, group_name: &str, stream_name: &str) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::LogGroup, group_name),
            stream_name: stream_name.to_string(),
            poll: PollPolicy::default(),
        }
    }

    #[cfg(test)]
    fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    async fn ensure_group(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .create_log_group()
            .log_group_name(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_resource_already_exists_exception() {
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

    async fn ensure_stream(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .create_log_stream()
            .log_group_name(&self.spec.name)
            .log_stream_name(&self.stream_name)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_resource_already_exists_exception() {
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

    async fn fetch_events(&self) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(&self.spec.name)
            .log_stream_name(&self.stream_name)
            .start_from_head(true)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output
            .events()
            .iter()
            .map(|event| {
                let record = Record::new(
                    self.stream_name.clone(),
                    event.message().unwrap_or_default(),
                );
                match event.timestamp() {
                    Some(millis) => record.with_timestamp_millis(millis),
                    None => record,
                }
            })
            .collect())
    }
}

#[async_trait]
impl ResourceFlow for LogsRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        let group = self.ensure_group().await?;
        let stream = self.ensure_stream().await?;
        // The pair only counts as pre-existing when both halves were found.
        if group.already_existed() && stream.already_existed() {
            Ok(Provisioned::AlreadyExists)
        } else {
            Ok(Provisioned::Created)
        }
    }

    async fn write(&self) -> Result<(), FlowError> {
        let now = Utc::now();
        let event = InputLogEvent::builder()
            .message(format!(
                "This is a log message written by the CloudWatch Logs API at {}",
                now.to_rfc3339()
            ))
            .timestamp(now.timestamp_millis())
            .build()
            .map_err(|error| FlowError::write(&self.spec, error))?;

        self.client
            .put_log_events()
            .log_group_name(&self.spec.name)
            .log_stream_name(&self.stream_name)
            .log_events(event)
            .send()
            .await
            .map_err(|error| FlowError::write(&self.spec, DisplayErrorContext(&error)))?;
        Ok(())
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        read_until_visible(&self.poll, || self.fetch_events(), |events| {
            !events.is_empty()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_cloudwatchlogs::operation::create_log_group::CreateLogGroupError;
    use aws_sdk_cloudwatchlogs::operation::create_log_stream::CreateLogStreamError;
    use aws_sdk_cloudwatchlogs::operation::get_log_events::GetLogEventsOutput;
    use aws_sdk_cloudwatchlogs::operation::put_log_events::PutLogEventsOutput;
    use aws_sdk_cloudwatchlogs::types::error::ResourceAlreadyExistsException;
    use aws_sdk_cloudwatchlogs::types::OutputLogEvent;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use probe_core::run_flow;

    use super::*;

    fn already_exists_group() -> CreateLogGroupError {
        CreateLogGroupError::ResourceAlreadyExistsException(
            ResourceAlreadyExistsException::builder()
                .message("log group exists")
                .build(),
        )
    }

    fn already_exists_stream() -> CreateLogStreamError {
        CreateLogStreamError::ResourceAlreadyExistsException(
            ResourceAlreadyExistsException::builder()
                .message("log stream exists")
                .build(),
        )
    }

    #[tokio::test]
    async fn existing_group_and_stream_classify_as_already_exists() {
        let group_rule =
            mock!(Client::create_log_group).then_error(already_exists_group);
        let stream_rule =
            mock!(Client::create_log_stream).then_error(already_exists_stream);
        let client = mock_client!(
            aws_sdk_cloudwatchlogs,
            RuleMode::MatchAny,
            [&group_rule, &stream_rule]
        );

        let runner = LogsRunner::new(client, "my-log-group", "my-log-stream");
        let provisioned = runner.ensure().await.expect("ensure should succeed");

        assert_eq!(provisioned, Provisioned::AlreadyExists);
    }

    #[tokio::test]
    async fn fresh_stream_counts_as_created() {
        let group_rule =
            mock!(Client::create_log_group).then_error(already_exists_group);
        let stream_rule = mock!(Client::create_log_stream)
            .then_output(|| aws_sdk_cloudwatchlogs::operation::create_log_stream::CreateLogStreamOutput::builder().build());
        let client = mock_client!(
            aws_sdk_cloudwatchlogs,
            RuleMode::MatchAny,
            [&group_rule, &stream_rule]
        );

        let runner = LogsRunner::new(client, "my-log-group", "my-log-stream");
        let provisioned = runner.ensure().await.expect("ensure should succeed");

        assert_eq!(provisioned, Provisioned::Created);
    }

    #[tokio::test]
    async fn full_pass_reads_back_the_log_event() {
        let group_rule = mock!(Client::create_log_group).then_output(|| {
            aws_sdk_cloudwatchlogs::operation::create_log_group::CreateLogGroupOutput::builder()
                .build()
        });
        let stream_rule = mock!(Client::create_log_stream).then_output(|| {
            aws_sdk_cloudwatchlogs::operation::create_log_stream::CreateLogStreamOutput::builder()
                .build()
        });
        let put_rule =
            mock!(Client::put_log_events).then_output(|| PutLogEventsOutput::builder().build());
        let get_rule = mock!(Client::get_log_events).then_output(|| {
            GetLogEventsOutput::builder()
                .events(
                    OutputLogEvent::builder()
                        .message("hello from the stream")
                        .timestamp(1_700_000_000_000)
                        .build(),
                )
                .build()
        });
        let client = mock_client!(
            aws_sdk_cloudwatchlogs,
            RuleMode::MatchAny,
            [&group_rule, &stream_rule, &put_rule, &get_rule]
        );

        let runner = LogsRunner::new(client, "my-log-group", "my-log-stream")
            .with_poll(PollPolicy::immediate());
        let report = run_flow(&runner).await.expect("flow should complete");

        assert_eq!(report.provisioned, Provisioned::Created);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].body, "hello from the stream");
        assert!(report.records[0].timestamp.is_some());
    }
}
