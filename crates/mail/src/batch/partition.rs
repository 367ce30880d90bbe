//! Size-threshold partitioning

use crate::models::MailItem;

/// An ordered group of items moved together before a batch checkpoint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch<'a> {
    items: Vec<&'a MailItem>,
    total_size: u64,
}

impl<'a> Batch<'a> {
    fn push(&mut self, item: &'a MailItem) {
        self.items.push(item);
        self.total_size = self.total_size.saturating_add(item.size);
    }

    pub fn items(&self) -> &[&'a MailItem] {
        &self.items
    }

    /// Accumulated size of all items in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered batches produced for one transfer run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSet<'a> {
    batches: Vec<Batch<'a>>,
}

impl<'a> BatchSet<'a> {
    pub fn batches(&self) -> &[Batch<'a>] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Total number of items across all batches
    pub fn item_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Batch<'a>> {
        self.batches.iter()
    }
}

impl<'s, 'a> IntoIterator for &'s BatchSet<'a> {
    type Item = &'s Batch<'a>;
    type IntoIter = std::slice::Iter<'s, Batch<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.batches.iter()
    }
}

/// Split `items` into batches whose accumulated size reaches `threshold`.
///
/// A batch is closed right after the item that makes its total reach or
/// exceed the threshold, so closed batches may overshoot it and items are
/// never split. The trailing batch may stay below the threshold. Concatenating
/// the batches reproduces `items` in order.
///
/// `threshold` is expected to be non-zero; with zero every item ends up in
/// its own batch.
pub fn partition(items: &[MailItem], threshold: u64) -> BatchSet<'_> {
    let mut batches = Vec::new();
    let mut current = Batch::default();

    for item in items {
        current.push(item);
        if current.total_size >= threshold {
            batches.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        batches.push(current);
    }

    BatchSet { batches }
}

/// Plan the batches for a run.
///
/// When the whole input fits under `threshold` it becomes a single batch
/// without partitioning; otherwise this is [`partition`].
pub fn plan(items: &[MailItem], threshold: u64) -> BatchSet<'_> {
    if items.is_empty() {
        return BatchSet::default();
    }

    let total: u64 = items.iter().fold(0u64, |acc, i| acc.saturating_add(i.size));
    if total <= threshold {
        let mut whole = Batch::default();
        for item in items {
            whole.push(item);
        }
        return BatchSet {
            batches: vec![whole],
        };
    }

    partition(items, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FolderId, ItemId};

    fn make_items(sizes: &[u64]) -> Vec<MailItem> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| {
                MailItem::builder(ItemId::new(format!("i{}", i + 1)), FolderId::new("src"))
                    .size(*size)
                    .build()
            })
            .collect()
    }

    fn ids(batch: &Batch<'_>) -> Vec<String> {
        batch.items().iter().map(|i| i.id.as_str().to_string()).collect()
    }

    /// Deterministic pseudo-random sizes (xorshift) for sweeping inputs
    fn sizes_from_seed(seed: u64, len: usize, max: u64) -> Vec<u64> {
        let mut state = seed.max(1);
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state % (max + 1)
            })
            .collect()
    }

    #[test]
    fn test_reference_example() {
        let items = make_items(&[60, 50, 10]);
        let set = partition(&items, 100);

        assert_eq!(set.len(), 2);
        assert_eq!(ids(&set.batches()[0]), vec!["i1", "i2"]);
        assert_eq!(set.batches()[0].total_size(), 110);
        assert_eq!(ids(&set.batches()[1]), vec!["i3"]);
        assert_eq!(set.batches()[1].total_size(), 10);
    }

    #[test]
    fn test_empty_input() {
        assert!(partition(&[], 100).is_empty());
        assert!(plan(&[], 100).is_empty());
    }

    #[test]
    fn test_oversized_item_is_singleton() {
        let items = make_items(&[10, 500, 20]);
        let set = partition(&items, 100);

        assert_eq!(set.len(), 2);
        assert_eq!(ids(&set.batches()[0]), vec!["i1", "i2"]);
        assert_eq!(ids(&set.batches()[1]), vec!["i3"]);

        let items = make_items(&[500, 20]);
        let set = partition(&items, 100);
        assert_eq!(ids(&set.batches()[0]), vec!["i1"]);
        assert_eq!(ids(&set.batches()[1]), vec!["i2"]);
    }

    #[test]
    fn test_exact_threshold_closes_batch() {
        let items = make_items(&[40, 60, 5]);
        let set = partition(&items, 100);

        assert_eq!(set.len(), 2);
        assert_eq!(set.batches()[0].total_size(), 100);
        assert_eq!(ids(&set.batches()[1]), vec!["i3"]);
    }

    #[test]
    fn test_total_under_threshold_is_one_batch() {
        let items = make_items(&[10, 20, 30]);

        let set = partition(&items, 100);
        assert_eq!(set.len(), 1);
        assert_eq!(set.batches()[0].len(), 3);

        let planned = plan(&items, 100);
        assert_eq!(planned, set);
    }

    #[test]
    fn test_plan_delegates_when_over_threshold() {
        let items = make_items(&[60, 50, 10]);
        assert_eq!(plan(&items, 100), partition(&items, 100));
    }

    #[test]
    fn test_flattened_batches_match_input() {
        for seed in 1..50u64 {
            let sizes = sizes_from_seed(seed, (seed as usize % 23) + 1, 250);
            let items = make_items(&sizes);
            let threshold = (seed * 37) % 400 + 1;
            let set = partition(&items, threshold);

            let flattened: Vec<&MailItem> =
                set.iter().flat_map(|b| b.items().iter().copied()).collect();
            assert_eq!(flattened.len(), items.len());
            for (got, want) in flattened.iter().zip(items.iter()) {
                assert!(std::ptr::eq(*got, want));
            }
        }
    }

    #[test]
    fn test_non_final_batches_reach_threshold() {
        for seed in 1..50u64 {
            let sizes = sizes_from_seed(seed * 7, 30, 120);
            let items = make_items(&sizes);
            let threshold = 150;
            let set = partition(&items, threshold);

            if let Some((_, head)) = set.batches().split_last() {
                for batch in head {
                    assert!(batch.total_size() >= threshold);
                }
            }
            for batch in set.iter() {
                assert!(!batch.is_empty());
                let sum: u64 = batch.items().iter().map(|i| i.size).sum();
                assert_eq!(sum, batch.total_size());
            }
        }
    }

    #[test]
    fn test_partition_is_idempotent() {
        let items = make_items(&sizes_from_seed(42, 40, 90));
        assert_eq!(partition(&items, 200), partition(&items, 200));
    }

    #[test]
    fn test_item_count() {
        let items = make_items(&[60, 50, 10, 99, 1]);
        assert_eq!(partition(&items, 100).item_count(), 5);
    }
}
