//! Service-agnostic provisioning flow primitives.
//!
//! This crate owns the resource/record data model, the uniform error
//! taxonomy, and the ensure-write-read flow driver. It intentionally
//! excludes AWS SDK and async runtime concerns; those live in `probe_aws`.

pub mod error;
pub mod flow;
pub mod record;
pub mod spec;

pub use error::FlowError;
pub use flow::{run_flow, FlowReport, Provisioned, ResourceFlow};
pub use record::Record;
pub use spec::{ResourceKind, ResourceSpec};
