use std::fmt;

use thiserror::Error;

/// Why an `offer` gave up before admitting its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutTimeoutCause {
    /// Another producer held the put-exclusion for the whole wait window.
    LockUnavailable,
    /// The queue stayed at `maxQueueDepth` for the whole wait window.
    DepthExceeded,
}

impl fmt::Display for PutTimeoutCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutTimeoutCause::LockUnavailable => {
                write!(f, "could not gain the lock on put within the timeout period")
            }
            PutTimeoutCause::DepthExceeded => {
                write!(f, "put failed after timeout, max queue depth exceeded")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("{0} is not in the priority set")]
    InvalidPriority(String),

    #[error("{0}")]
    PutTimeout(PutTimeoutCause),

    #[error("could not gain the lock on poll within the timeout")]
    PollTimeout,

    #[error("queue instantiation failed: {0}")]
    Instantiation(String),
}

impl QueueError {
    pub(crate) fn invalid_priority<P: fmt::Debug>(priority: &P) -> Self {
        QueueError::InvalidPriority(format!("{priority:?}"))
    }

    /// True for either flavour of put or poll timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueueError::PutTimeout(_) | QueueError::PollTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_exceeded_message_is_stable() {
        let err = QueueError::PutTimeout(PutTimeoutCause::DepthExceeded);
        assert_eq!(
            err.to_string(),
            "put failed after timeout, max queue depth exceeded"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn invalid_priority_names_the_priority() {
        let err = QueueError::invalid_priority(&42);
        assert_eq!(err.to_string(), "42 is not in the priority set");
        assert!(!err.is_timeout());
    }
}
