use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::core::error::QueueError;
use crate::core::priority::PriorityDomain;
use crate::core::queue::BucketStore;

/// Buckets keyed directly by priority.
///
/// Works for any hashable priority; no enumerability needed.
#[derive(Debug)]
pub struct MappedBuckets<P, M> {
    buckets: HashMap<P, VecDeque<M>>,
}

impl<P, M> BucketStore<P, M> for MappedBuckets<P, M>
where
    P: Ord + Clone + Hash + Send,
    M: Send,
{
    fn for_domain(domain: &PriorityDomain<P>) -> Result<Self, QueueError> {
        // sized exactly, the key set never grows
        let mut buckets = HashMap::with_capacity(domain.len());
        for priority in domain.descending() {
            buckets.insert(priority.clone(), VecDeque::new());
        }
        Ok(Self { buckets })
    }

    #[inline]
    fn get(&self, priority: &P) -> Option<&VecDeque<M>> {
        self.buckets.get(priority)
    }

    #[inline]
    fn get_mut(&mut self, priority: &P) -> Option<&mut VecDeque<M>> {
        self.buckets.get_mut(priority)
    }

    fn size_all(&self) -> usize {
        self.buckets.values().map(VecDeque::len).sum()
    }

    fn clear_all(&mut self) -> usize {
        self.buckets
            .values_mut()
            .map(|bucket| {
                let n = bucket.len();
                bucket.clear();
                n
            })
            .sum()
    }

    fn is_empty_all(&self) -> bool {
        self.buckets.values().all(VecDeque::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_priorities_get_their_own_buckets() {
        let domain = PriorityDomain::new(["alpha", "beta", "gamma"]).unwrap();
        let mut store: MappedBuckets<&str, u32> = BucketStore::for_domain(&domain).unwrap();
        assert_eq!(store.buckets.len(), 3);

        store.get_mut(&"beta").unwrap().push_back(1);
        store.get_mut(&"beta").unwrap().push_back(2);
        assert_eq!(store.get(&"beta").and_then(|b| b.front()), Some(&1));
        assert!(store.get(&"delta").is_none());
        assert_eq!(store.size_all(), 2);

        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty_all());
    }
}
