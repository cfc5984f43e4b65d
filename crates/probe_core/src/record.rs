use std::fmt;

use chrono::{DateTime, Utc};

/// One payload read back from a resource: a log event, an item, an object
/// key, a message, or a secret value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Message id, object key, sort key, schedule name, ...
    pub identity: String,
    pub body: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(identity: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            body: body.into(),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Builds a record from an epoch-millisecond timestamp, dropping values
    /// outside chrono's representable range.
    pub fn with_timestamp_millis(self, millis: i64) -> Self {
        match DateTime::from_timestamp_millis(millis) {
            Some(timestamp) => self.with_timestamp(timestamp),
            None => self,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timestamp {
            Some(timestamp) => write!(
                f,
                "{}: {} ({})",
                self.identity,
                self.body,
                timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            None => write!(f, "{}: {}", self.identity, self.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_without_timestamp() {
        let record = Record::new("my-key", "Hello, World!");
        assert_eq!(record.to_string(), "my-key: Hello, World!");
    }

    #[test]
    fn renders_millisecond_timestamp() {
        let record = Record::new("event", "ping").with_timestamp_millis(0);
        assert_eq!(record.to_string(), "event: ping (1970-01-01 00:00:00)");
    }

    #[test]
    fn ignores_out_of_range_timestamp() {
        let record = Record::new("event", "ping").with_timestamp_millis(i64::MAX);
        assert!(record.timestamp.is_none());
    }
}
