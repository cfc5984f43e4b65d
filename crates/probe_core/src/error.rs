use thiserror::Error;

use crate::spec::ResourceSpec;

/// Uniform error taxonomy for a probe flow.
///
/// Every failure is tagged with the stage it occurred in; the stage, not the
/// call site, decides severity. Provision and write failures abort the flow,
/// read failures are reported and skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("failed to provision {resource}: {message}")]
    Provision { resource: String, message: String },
    #[error("failed to write to {resource}: {message}")]
    Write { resource: String, message: String },
    #[error("failed to read from {resource}: {message}")]
    Read { resource: String, message: String },
}

impl FlowError {
    pub fn provision(spec: &ResourceSpec, message: impl ToString) -> Self {
        FlowError::Provision {
            resource: spec.to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(spec: &ResourceSpec, message: impl ToString) -> Self {
        FlowError::Write {
            resource: spec.to_string(),
            message: message.to_string(),
        }
    }

    pub fn read(spec: &ResourceSpec, message: impl ToString) -> Self {
        FlowError::Read {
            resource: spec.to_string(),
            message: message.to_string(),
        }
    }

    /// True when the flow must stop at this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FlowError::Read { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ResourceKind;

    #[test]
    fn read_errors_are_non_fatal() {
        let spec = ResourceSpec::new(ResourceKind::Bucket, "my-bucket");
        assert!(FlowError::provision(&spec, "boom").is_fatal());
        assert!(FlowError::write(&spec, "boom").is_fatal());
        assert!(!FlowError::read(&spec, "boom").is_fatal());
    }

    #[test]
    fn messages_carry_stage_and_resource() {
        let spec = ResourceSpec::new(ResourceKind::Secret, "my-secret");
        let error = FlowError::provision(&spec, "access denied");
        assert_eq!(
            error.to_string(),
            "failed to provision secret 'my-secret': access denied"
        );
    }
}
