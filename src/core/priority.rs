//! Priority domains.
//!
//! A [`PriorityDomain`] is the fixed, ordered set of priorities a queue accepts
//! plus the priority used when a caller does not name one. It is built once and
//! never changes afterwards.

use std::collections::BTreeSet;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::core::error::QueueError;

/// Five-level priority scale, lowest to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Lowest = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Lowest,
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// The five-level domain. Its computed default is [`Priority::Medium`].
    pub fn domain() -> PriorityDomain<Priority> {
        PriorityDomain {
            descending: Priority::ALL.iter().rev().copied().collect(),
            default: Priority::Medium,
        }
    }

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Priorities that map onto a dense run of slots, so buckets can live in a `Vec`.
pub trait DenseIndex {
    /// Distance of `self` above `lowest`, or `None` when `self < lowest`.
    fn offset_from(&self, lowest: &Self) -> Option<usize>;
}

impl DenseIndex for Priority {
    #[inline]
    fn offset_from(&self, lowest: &Self) -> Option<usize> {
        self.ordinal().checked_sub(lowest.ordinal())
    }
}

macro_rules! impl_dense_index {
    ($($t:ty),*) => {
        $(
            impl DenseIndex for $t {
                #[inline]
                fn offset_from(&self, lowest: &Self) -> Option<usize> {
                    let diff = i128::from(*self) - i128::from(*lowest);
                    usize::try_from(diff).ok()
                }
            }
        )*
    };
}

impl_dense_index!(i8, i16, i32, i64, u8, u16, u32, u64);

/// Ordered set of valid priorities and the default priority.
///
/// Invariants: the set is non-empty and the default is a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityDomain<P> {
    /// Highest first. This is also the dequeue scan order.
    descending: Vec<P>,
    default: P,
}

impl<P> PriorityDomain<P>
where
    P: Ord + Clone + Debug,
{
    /// Builds a domain whose default is computed from the priorities.
    ///
    /// The default is `descending[len / 2]`: for an odd count that is the exact
    /// middle, for an even count it is the lower of the two middle values (the
    /// upper-middle index of the descending list). `[4, 3, 2, 1]` yields `2`.
    pub fn new<I>(priorities: I) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = P>,
    {
        let descending = Self::sort_descending(priorities)?;
        let default = descending[descending.len() / 2].clone();
        Ok(Self {
            descending,
            default,
        })
    }

    /// Builds a domain with an explicit default, which must be one of `priorities`.
    pub fn with_default<I>(priorities: I, default: P) -> Result<Self, QueueError>
    where
        I: IntoIterator<Item = P>,
    {
        let descending = Self::sort_descending(priorities)?;
        if descending.binary_search_by(|p| default.cmp(p)).is_err() {
            return Err(QueueError::Instantiation(format!(
                "default priority {default:?} is not in the priority set"
            )));
        }
        Ok(Self {
            descending,
            default,
        })
    }

    fn sort_descending<I>(priorities: I) -> Result<Vec<P>, QueueError>
    where
        I: IntoIterator<Item = P>,
    {
        let set: BTreeSet<P> = priorities.into_iter().collect();
        if set.is_empty() {
            return Err(QueueError::Instantiation(
                "priority set cannot be empty".to_string(),
            ));
        }
        Ok(set.into_iter().rev().collect())
    }

    pub fn contains(&self, priority: &P) -> bool {
        // descending order, so the comparator is flipped
        self.descending
            .binary_search_by(|p| priority.cmp(p))
            .is_ok()
    }
}

impl<P> PriorityDomain<P> {
    /// All priorities, highest first.
    #[inline]
    pub fn descending(&self) -> &[P] {
        &self.descending
    }

    #[inline]
    pub fn default_priority(&self) -> &P {
        &self.default
    }

    #[inline]
    pub fn highest(&self) -> &P {
        &self.descending[0]
    }

    #[inline]
    pub fn lowest(&self) -> &P {
        &self.descending[self.descending.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descending.len()
    }

    /// Never true for a constructed domain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descending.is_empty()
    }
}

impl PriorityDomain<i32> {
    /// Contiguous range `[min, max]` with the computed default.
    pub fn range(min: i32, max: i32) -> Result<Self, QueueError> {
        Self::check_bounds(min, max)?;
        Self::new(min..=max)
    }

    /// Contiguous range `[min, max]` with an explicit default.
    pub fn range_with_default(min: i32, max: i32, default: i32) -> Result<Self, QueueError> {
        Self::check_bounds(min, max)?;
        Self::with_default(min..=max, default)
    }

    fn check_bounds(min: i32, max: i32) -> Result<(), QueueError> {
        if min > max {
            return Err(QueueError::Instantiation(
                "minPriority cannot be greater than maxPriority".to_string(),
            ));
        }
        Ok(())
    }
}
