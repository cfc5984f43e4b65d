use std::fmt;

/// The kind of external resource a probe provisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    LogGroup,
    Table,
    Bucket,
    Queue,
    ScheduleGroup,
    Secret,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::LogGroup => "log group",
            ResourceKind::Table => "table",
            ResourceKind::Bucket => "bucket",
            ResourceKind::Queue => "queue",
            ResourceKind::ScheduleGroup => "schedule group",
            ResourceKind::Secret => "secret",
        }
    }
}

/// Identifies one named external resource. Immutable once chosen; declared
/// as a constant at each probe's start and never generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceSpec {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.label(), self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_kind_and_name() {
        let spec = ResourceSpec::new(ResourceKind::Queue, "my-queue");
        assert_eq!(spec.to_string(), "queue 'my-queue'");
    }
}
