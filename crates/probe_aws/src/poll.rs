use std::future::Future;
use std::time::Duration;

/// Bounded re-read policy for eventually consistent listings
/// (list-after-put, receive-after-send). The original assumption of
/// immediate visibility does not hold for every backing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(400),
        }
    }
}

impl PollPolicy {
    /// A single read, no waiting. Used by tests and by flows whose backing
    /// service reads its own writes.
    pub fn immediate() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Re-runs `read` until `is_visible` accepts its result or the attempt
/// budget is spent, then returns the last result. Read errors propagate
/// immediately; an empty final result is not an error.
pub async fn read_until_visible<T, E, F, Fut>(
    policy: &PollPolicy,
    mut read: F,
    is_visible: impl Fn(&T) -> bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last = read().await?;
    for attempt in 1..policy.attempts {
        if is_visible(&last) {
            return Ok(last);
        }
        tracing::debug!(attempt, "records not yet visible, polling again");
        tokio::time::sleep(policy.delay).await;
        last = read().await?;
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn eager_policy(attempts: u32) -> PollPolicy {
        PollPolicy {
            attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn returns_first_visible_result() {
        let calls = Cell::new(0u32);
        let result: Result<Vec<u32>, String> = read_until_visible(
            &eager_policy(5),
            || {
                calls.set(calls.get() + 1);
                let ready = calls.get() >= 3;
                async move { Ok(if ready { vec![1] } else { vec![] }) }
            },
            |records| !records.is_empty(),
        )
        .await;

        assert_eq!(result, Ok(vec![1]));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn accepts_empty_result_after_budget() {
        let calls = Cell::new(0u32);
        let result: Result<Vec<u32>, String> = read_until_visible(
            &eager_policy(3),
            || {
                calls.set(calls.get() + 1);
                async { Ok(vec![]) }
            },
            |records| !records.is_empty(),
        )
        .await;

        assert_eq!(result, Ok(vec![]));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn propagates_read_errors_immediately() {
        let result: Result<Vec<u32>, String> = read_until_visible(
            &eager_policy(5),
            || async { Err("boom".to_string()) },
            |records: &Vec<u32>| !records.is_empty(),
        )
        .await;

        assert_eq!(result, Err("boom".to_string()));
    }
}
