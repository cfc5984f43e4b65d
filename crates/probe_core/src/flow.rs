use async_trait::async_trait;

use crate::error::FlowError;
use crate::record::Record;
use crate::spec::ResourceSpec;

/// Outcome of an idempotent create. Finding the resource already in place
/// is success, not failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyExists,
}

impl Provisioned {
    pub fn already_existed(&self) -> bool {
        matches!(self, Provisioned::AlreadyExists)
    }
}

/// One probe's view of its resource: create it if absent, write one record,
/// read records back. Implementations map their service's "already exists"
/// error to `Provisioned::AlreadyExists` and everything else to a
/// stage-tagged `FlowError`.
#[async_trait]
pub trait ResourceFlow {
    fn spec(&self) -> &ResourceSpec;

    async fn ensure(&self) -> Result<Provisioned, FlowError>;

    async fn write(&self) -> Result<(), FlowError>;

    async fn read(&self) -> Result<Vec<Record>, FlowError>;
}

/// What one pass over a resource produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub resource: ResourceSpec,
    pub provisioned: Provisioned,
    pub records: Vec<Record>,
    pub read_error: Option<FlowError>,
}

/// Runs the linear ensure-write-read pass.
///
/// Provision and write failures abort and surface as `Err`; a read failure
/// is recorded on the report and the pass still counts as completed. No
/// retries happen here.
pub async fn run_flow<F>(flow: &F) -> Result<FlowReport, FlowError>
where
    F: ResourceFlow + ?Sized,
{
    let spec = flow.spec().clone();

    let provisioned = flow.ensure().await?;
    match provisioned {
        Provisioned::Created => tracing::info!(resource = %spec, "resource created"),
        Provisioned::AlreadyExists => {
            tracing::info!(resource = %spec, "resource already exists")
        }
    }

    flow.write().await?;
    tracing::info!(resource = %spec, "record written");

    match flow.read().await {
        Ok(records) => {
            tracing::info!(resource = %spec, count = records.len(), "records read");
            Ok(FlowReport {
                resource: spec,
                provisioned,
                records,
                read_error: None,
            })
        }
        Err(error) => {
            tracing::warn!(resource = %spec, %error, "read failed, continuing");
            Ok(FlowReport {
                resource: spec,
                provisioned,
                records: Vec::new(),
                read_error: Some(error),
            })
        }
    }
}
