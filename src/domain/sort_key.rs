use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// A lightweight ordering key for timeline entries
///
/// Timelines store only these keys in display order; the entries themselves
/// live in a centralized map owned by the post store. Ordering is by
/// timestamp first and identity second, so two entries sharing a timestamp
/// still have a deterministic position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey<I> {
    pub at: DateTime<Utc>,
    pub id: I,
}

impl<I> SortKey<I> {
    pub fn new(at: DateTime<Utc>, id: I) -> Self {
        Self { at, id }
    }
}

impl<I: Ord> PartialOrd for SortKey<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: Ord> Ord for SortKey<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at.cmp(&other.at) {
            Ordering::Equal => self.id.cmp(&other.id),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_sort_key_orders_by_timestamp_first() {
        let older = SortKey::new(at(1000), "z");
        let newer = SortKey::new(at(2000), "a");

        assert!(newer > older);
    }

    #[test]
    fn test_sort_key_breaks_ties_by_identity() {
        let a = SortKey::new(at(1000), "a");
        let b = SortKey::new(at(1000), "b");

        assert!(b > a);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }
}
