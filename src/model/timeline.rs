//! Ordered, duplicate-free sequence of sort keys
//!
//! A `Timeline` only stores identities and their ordering keys; the items themselves live in
//! the post store. The sequence is kept in strictly decreasing key order (newest first), which
//! is also display order.
//!
//! Merging is tuned for the polling case: a fresh page usually contains a handful of new
//! items at the head plus many already-known ones. Known identities are filtered through a
//! hash index, and the stored sequence is only walked from the front as far as the last
//! insertion point. The timeline never evicts, so memory grows with the session.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

use crate::domain::sort_key::SortKey;

/// Outcome of a merge, used to keep indices into the old sequence pointing at the same items
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    /// Number of new items
    pub inserted: usize,
    /// For every inserted item, the index in the *old* sequence it was placed before
    /// (non-decreasing; `old_len` means appended)
    pub insertion_points: Vec<usize>,
}

impl MergeResult {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// How far the item previously at `old` moved down
    pub fn shift(&self, old: usize) -> usize {
        self.insertion_points.partition_point(|&point| point <= old)
    }

    /// New index of the item previously at `old`
    pub fn remap(&self, old: usize) -> usize {
        old + self.shift(old)
    }
}

#[derive(Debug, Clone)]
pub struct Timeline<I> {
    keys: Vec<SortKey<I>>,
    index: HashMap<I, SortKey<I>>,
}

impl<I> Default for Timeline<I> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<I> Timeline<I>
where
    I: Clone + Eq + Hash + Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, id: &I) -> bool {
        self.index.contains_key(id)
    }

    pub fn key_of(&self, id: &I) -> Option<&SortKey<I>> {
        self.index.get(id)
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.keys.get(index).map(|key| &key.id)
    }

    pub fn oldest(&self) -> Option<&SortKey<I>> {
        self.keys.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.keys.iter().map(|key| &key.id)
    }

    pub fn index_of(&self, id: &I) -> Option<usize> {
        let key = self.index.get(id)?;
        // Descending order: the sought key is compared against each stored one
        self.keys.binary_search_by(|stored| key.cmp(stored)).ok()
    }

    /// Insert every key whose identity is not stored yet, keeping the order
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = SortKey<I>>) -> MergeResult {
        let mut fresh: Vec<SortKey<I>> = incoming
            .into_iter()
            .filter(|key| !self.index.contains_key(&key.id))
            .collect();
        if fresh.is_empty() {
            return MergeResult::default();
        }

        fresh.sort_unstable_by(|a, b| b.cmp(a));
        let mut seen = HashSet::with_capacity(fresh.len());
        fresh.retain(|key| seen.insert(key.id.clone()));

        for key in &fresh {
            self.index.insert(key.id.clone(), key.clone());
        }

        let old_len = self.keys.len();
        let inserted = fresh.len();

        // Whole page is older than the tail
        if self.keys.last().is_none_or(|tail| fresh[0] < *tail) {
            self.keys.extend(fresh);
            return MergeResult {
                inserted,
                insertion_points: vec![old_len; inserted],
            };
        }

        let mut insertion_points = Vec::with_capacity(inserted);
        let mut cursor = 0;
        for key in &fresh {
            while cursor < old_len && self.keys[cursor] > *key {
                cursor += 1;
            }
            insertion_points.push(cursor);
        }

        let scanned = insertion_points.last().copied().unwrap_or(0);
        let mut merged = Vec::with_capacity(scanned + inserted);
        let mut fresh = fresh.into_iter().zip(insertion_points.iter().copied()).peekable();
        for (old, key) in self.keys.drain(..scanned).enumerate() {
            while let Some((new_key, _)) = fresh.next_if(|&(_, point)| point <= old) {
                merged.push(new_key);
            }
            merged.push(key);
        }
        merged.extend(fresh.map(|(new_key, _)| new_key));
        self.keys.splice(0..0, merged);

        MergeResult {
            inserted,
            insertion_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    fn key(secs: i64, id: &str) -> SortKey<String> {
        SortKey::new(
            Utc.timestamp_opt(secs, 0).single().expect("valid timestamp"),
            id.to_string(),
        )
    }

    fn ids(timeline: &Timeline<String>) -> Vec<&str> {
        timeline.iter().map(String::as_str).collect()
    }

    fn assert_sorted_unique(timeline: &Timeline<String>) {
        assert!(timeline.keys.windows(2).all(|w| w[0] > w[1]));
        let unique: HashSet<_> = timeline.iter().collect();
        assert_eq!(unique.len(), timeline.len());
        assert_eq!(timeline.index.len(), timeline.len());
    }

    #[fixture]
    fn timeline() -> Timeline<String> {
        let mut timeline = Timeline::new();
        timeline.merge(vec![key(30, "p1"), key(20, "p2"), key(10, "p3")]);
        timeline
    }

    #[rstest]
    fn test_merge_into_empty(timeline: Timeline<String>) {
        assert_eq!(ids(&timeline), vec!["p1", "p2", "p3"]);
        assert_sorted_unique(&timeline);
    }

    #[rstest]
    fn test_merge_new_head_shifts_everything(mut timeline: Timeline<String>) {
        let result = timeline.merge(vec![key(50, "n1"), key(40, "n2")]);

        assert_eq!(ids(&timeline), vec!["n1", "n2", "p1", "p2", "p3"]);
        assert_eq!(result.inserted, 2);
        for old in 0..3 {
            assert_eq!(result.shift(old), 2);
            assert_eq!(result.remap(old), old + 2);
        }
    }

    #[rstest]
    fn test_merge_known_only_is_noop(mut timeline: Timeline<String>) {
        let result = timeline.merge(vec![key(30, "p1"), key(10, "p3")]);

        assert!(result.is_empty());
        assert_eq!((0..3).map(|i| result.shift(i)).collect::<Vec<_>>(), vec![0, 0, 0]);
        assert_eq!(ids(&timeline), vec!["p1", "p2", "p3"]);
    }

    #[rstest]
    fn test_merge_in_the_middle(mut timeline: Timeline<String>) {
        let result = timeline.merge(vec![key(25, "m"), key(30, "p1")]);

        assert_eq!(ids(&timeline), vec!["p1", "m", "p2", "p3"]);
        assert_eq!(result.insertion_points, vec![1]);
        assert_eq!(result.remap(0), 0);
        assert_eq!(result.remap(1), 2);
        assert_eq!(result.remap(2), 3);
    }

    #[rstest]
    fn test_merge_older_page_appends(mut timeline: Timeline<String>) {
        let result = timeline.merge(vec![key(5, "o1"), key(1, "o2")]);

        assert_eq!(ids(&timeline), vec!["p1", "p2", "p3", "o1", "o2"]);
        assert_eq!(result.insertion_points, vec![3, 3]);
        assert_eq!(result.shift(2), 0);
    }

    #[rstest]
    fn test_merge_dedupes_within_page(mut timeline: Timeline<String>) {
        let result = timeline.merge(vec![key(40, "n"), key(40, "n"), key(35, "n")]);

        assert_eq!(result.inserted, 1);
        assert_eq!(ids(&timeline), vec!["n", "p1", "p2", "p3"]);
        assert_eq!(timeline.key_of(&"n".to_string()), Some(&key(40, "n")));
    }

    #[rstest]
    fn test_equal_timestamps_order_by_identity(mut timeline: Timeline<String>) {
        timeline.merge(vec![key(20, "p0"), key(20, "p9")]);

        assert_eq!(ids(&timeline), vec!["p1", "p9", "p2", "p0", "p3"]);
        assert_sorted_unique(&timeline);
    }

    #[rstest]
    fn test_overlapping_merges_stay_sorted(mut timeline: Timeline<String>) {
        timeline.merge(vec![key(15, "a"), key(35, "b"), key(20, "p2"), key(0, "c")]);
        timeline.merge(vec![key(36, "d"), key(15, "a"), key(12, "e"), key(35, "b")]);
        timeline.merge(vec![key(100, "f"), key(-5, "g"), key(22, "h")]);

        assert_eq!(
            ids(&timeline),
            vec!["f", "d", "b", "p1", "h", "p2", "a", "e", "p3", "c", "g"]
        );
        assert_sorted_unique(&timeline);
    }

    #[rstest]
    fn test_index_of(mut timeline: Timeline<String>) {
        timeline.merge(vec![key(25, "m")]);

        assert_eq!(timeline.index_of(&"p1".to_string()), Some(0));
        assert_eq!(timeline.index_of(&"m".to_string()), Some(1));
        assert_eq!(timeline.index_of(&"p3".to_string()), Some(3));
        assert_eq!(timeline.index_of(&"missing".to_string()), None);
    }

    #[test]
    fn test_shift_counts_points_before_or_at_old_index() {
        let result = MergeResult {
            inserted: 3,
            insertion_points: vec![0, 2, 2],
        };

        assert_eq!(result.shift(0), 1);
        assert_eq!(result.shift(1), 1);
        assert_eq!(result.shift(2), 3);
        assert_eq!(result.remap(5), 8);
    }
}
