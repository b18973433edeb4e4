use std::collections::VecDeque;
use std::fmt::Debug;

use crate::core::error::QueueError;
use crate::core::priority::{DenseIndex, PriorityDomain};
use crate::core::queue::BucketStore;

/// Buckets in a `Vec`, slot `i` holding priority `lowest + i`.
///
/// Only contiguous domains are accepted: every value in `lowest..=highest`
/// must be a member, so the slot count equals the domain size. Sparse
/// domains belong in [`MappedBuckets`](crate::core::queue::MappedBuckets).
#[derive(Debug)]
pub struct IndexedBuckets<P, M> {
    lowest: P,
    slots: Vec<VecDeque<M>>,
}

impl<P: DenseIndex, M> IndexedBuckets<P, M> {
    #[inline]
    fn slot(&self, priority: &P) -> Option<usize> {
        priority
            .offset_from(&self.lowest)
            .filter(|&i| i < self.slots.len())
    }
}

impl<P, M> BucketStore<P, M> for IndexedBuckets<P, M>
where
    P: DenseIndex + Ord + Clone + Debug + Send,
    M: Send,
{
    fn for_domain(domain: &PriorityDomain<P>) -> Result<Self, QueueError> {
        let lowest = domain.lowest().clone();
        let span = domain
            .highest()
            .offset_from(&lowest)
            .and_then(|top| top.checked_add(1));
        if span != Some(domain.len()) {
            return Err(QueueError::Instantiation(format!(
                "indexed buckets need a contiguous priority range, got {} priorities between {:?} and {:?}",
                domain.len(),
                lowest,
                domain.highest()
            )));
        }
        let slots = (0..domain.len()).map(|_| VecDeque::new()).collect();
        Ok(Self { lowest, slots })
    }

    #[inline]
    fn get(&self, priority: &P) -> Option<&VecDeque<M>> {
        self.slot(priority).map(|i| &self.slots[i])
    }

    #[inline]
    fn get_mut(&mut self, priority: &P) -> Option<&mut VecDeque<M>> {
        self.slot(priority).map(move |i| &mut self.slots[i])
    }

    fn size_all(&self) -> usize {
        self.slots.iter().map(VecDeque::len).sum()
    }

    fn clear_all(&mut self) -> usize {
        let mut cleared = 0;
        for slot in &mut self.slots {
            cleared += slot.len();
            slot.clear();
        }
        cleared
    }

    fn is_empty_all(&self) -> bool {
        self.slots.iter().all(VecDeque::is_empty)
    }
}
