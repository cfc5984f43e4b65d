use async_trait::async_trait;
use aws_sdk_scheduler::error::DisplayErrorContext;
use aws_sdk_scheduler::types::{FlexibleTimeWindow, FlexibleTimeWindowMode, Target};
use aws_sdk_scheduler::Client;

use probe_core::{FlowError, Provisioned, Record, ResourceFlow, ResourceKind, ResourceSpec};

/// Provisions a schedule group, creates one rate schedule in it, and lists
/// groups with their schedules back.
pub struct ScheduleRunner {
    client: Client,
    spec: ResourceSpec,
    schedule_name: String,
    target_arn: String,
    role_arn: String,
}

impl ScheduleRunner {
    pub fn new(
        client: Client,
        group_name: &str,
        schedule_name: &str,
        target_arn: &str,
        role_arn: &str,
    ) -> Self {
        Self {
            client,
            spec: ResourceSpec::new(ResourceKind::ScheduleGroup, group_name),
            schedule_name: schedule_name.to_string(),
            target_arn: target_arn.to_string(),
            role_arn: role_arn.to_string(),
        }
    }

    async fn schedules_in(&self, group_name: &str) -> Result<Vec<Record>, FlowError> {
        let output = self
            .client
            .list_schedules()
            .group_name(group_name)
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        Ok(output
            .schedules()
            .iter()
            .map(|schedule| {
                let record = Record::new(
                    schedule.name().unwrap_or("unknown"),
                    format!("group {group_name}"),
                );
                match schedule.creation_date().and_then(|c| c.to_millis().ok()) {
                    Some(millis) => record.with_timestamp_millis(millis),
                    None => record,
                }
            })
            .collect())
    }

    /// Enumerates every schedule group with its schedules. A group that
    /// fails to list is skipped, not fatal.
    pub async fn enumerate_groups(&self) -> Result<Vec<(String, Vec<Record>)>, FlowError> {
        let output = self
            .client
            .list_schedule_groups()
            .send()
            .await
            .map_err(|error| FlowError::read(&self.spec, DisplayErrorContext(&error)))?;

        let mut groups = Vec::new();
        for group in output.schedule_groups() {
            let Some(name) = group.name() else {
                continue;
            };
            match self.schedules_in(name).await {
                Ok(records) => groups.push((name.to_string(), records)),
                Err(error) => {
                    tracing::warn!(group = name, %error, "skipping schedule group");
                }
            }
        }
        Ok(groups)
    }
}

#[async_trait]
impl ResourceFlow for ScheduleRunner {
    fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    async fn ensure(&self) -> Result<Provisioned, FlowError> {
        match self
            .client
            .create_schedule_group()
            .name(&self.spec.name)
            .send()
            .await
        {
            Ok(_) => Ok(Provisioned::Created),
            Err(error) => {
                let service_error = error.into_service_error();
                if service_error.is_conflict_exception() {
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
        let target = Target::builder()
            .arn(&self.target_arn)
            .role_arn(&self.role_arn)
            .build()
            .map_err(|error| FlowError::write(&self.spec, error))?;
        let window = FlexibleTimeWindow::builder()
            .mode(FlexibleTimeWindowMode::Off)
            .build()
            .map_err(|error| FlowError::write(&self.spec, error))?;

        match self
            .client
            .create_schedule()
            .group_name(&self.spec.name)
            .name(&self.schedule_name)
            .description("probe schedule")
            .schedule_expression("rate(1 minute)")
            .target(target)
            .flexible_time_window(window)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(error) => {
                let service_error = error.into_service_error();
                // Re-runs find the schedule in place; that is not a failure.
                if service_error.is_conflict_exception() {
                    tracing::info!(schedule = %self.schedule_name, "schedule already exists");
                    Ok(())
                } else {
                    Err(FlowError::write(
                        &self.spec,
                        DisplayErrorContext(&service_error),
                    ))
                }
            }
        }
    }

    async fn read(&self) -> Result<Vec<Record>, FlowError> {
        self.schedules_in(&self.spec.name).await
    }
}
