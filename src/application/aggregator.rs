//! Pure aggregation over scan results: per-key counts, totals and
//! top-N rankings. No I/O happens here.

use std::collections::HashMap;

/// How many entries the rankings keep.
pub const TOP_N: usize = 10;

/// Insertion-ordered name → count accumulator.
///
/// Ranking ties are broken by first-seen order: two keys with equal
/// counts rank in the order the scan encountered them, and re-running
/// over the same snapshot yields the same ranking.
#[derive(Debug, Default, Clone)]
pub struct CountMap {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` to `name`, creating the entry on first sight.
    pub fn add(&mut self, name: &str, count: u64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), count));
            }
        }
    }

    /// Count for `name`; absent keys read as zero.
    pub fn get(&self, name: &str) -> u64 {
        self.index.get(name).map(|&i| self.entries[i].1).unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Up to `n` entries, highest count first. The sort is stable, so
    /// equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// Aggregated usage for one audit run. Policy and statement counts are
/// keyed by compartment name, dynamic-group counts by domain display name.
#[derive(Debug, Default, Clone)]
pub struct UsageReport {
    pub policy_counts: CountMap,
    pub statement_counts: CountMap,
    pub dynamic_group_counts: CountMap,
}

impl UsageReport {
    pub fn total_policies(&self) -> u64 {
        self.policy_counts.total()
    }

    pub fn total_statements(&self) -> u64 {
        self.statement_counts.total()
    }

    pub fn total_dynamic_groups(&self) -> u64 {
        self.dynamic_group_counts.total()
    }

    pub fn top_policies(&self) -> Vec<(String, u64)> {
        self.policy_counts.top(TOP_N)
    }

    pub fn top_statements(&self) -> Vec<(String, u64)> {
        self.statement_counts.top(TOP_N)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(pairs: &[(&str, u64)]) -> CountMap {
        let mut map = CountMap::new();
        for (name, count) in pairs {
            map.add(name, *count);
        }
        map
    }

    #[test]
    fn test_add_accumulates_per_key() {
        let mut map = CountMap::new();
        map.add("dev", 2);
        map.add("dev", 3);
        map.add("prod", 1);

        assert_eq!(map.get("dev"), 5);
        assert_eq!(map.get("prod"), 1);
        assert_eq!(map.get("missing"), 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_total_equals_sum_of_per_key_counts() {
        let map = map_of(&[("a", 4), ("b", 0), ("c", 7)]);
        assert_eq!(map.total(), map.iter().map(|(_, c)| c).sum::<u64>());
        assert_eq!(map.total(), 11);
    }

    #[test]
    fn test_top_sorts_descending_and_truncates() {
        let pairs: Vec<(String, u64)> = (0..15).map(|i| (format!("c{i}"), i as u64)).collect();
        let mut map = CountMap::new();
        for (name, count) in &pairs {
            map.add(name, *count);
        }

        let top = map.top(TOP_N);
        assert_eq!(top.len(), TOP_N);
        assert_eq!(top[0], ("c14".to_string(), 14));
        for pair in top.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_top_returns_fewer_entries_than_requested_when_map_is_small() {
        let map = map_of(&[("only", 3)]);
        assert_eq!(map.top(TOP_N), vec![("only".to_string(), 3)]);
    }

    #[test]
    fn test_top_ties_keep_first_seen_order() {
        let map = map_of(&[("late-big", 9), ("tie-a", 5), ("tie-b", 5), ("tie-c", 5)]);

        let top = map.top(3);
        assert_eq!(top[0].0, "late-big");
        // tie-c is dropped only because it was seen last
        assert_eq!(top[1].0, "tie-a");
        assert_eq!(top[2].0, "tie-b");
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let map = map_of(&[("z", 1), ("a", 2), ("m", 3)]);
        let keys: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_usage_report_totals() {
        let mut report = UsageReport::default();
        report.policy_counts.add("a", 3);
        report.policy_counts.add("b", 2);
        report.statement_counts.add("a", 7);
        report.dynamic_group_counts.add("Default", 4);

        assert_eq!(report.total_policies(), 5);
        assert_eq!(report.total_statements(), 7);
        assert_eq!(report.total_dynamic_groups(), 4);
    }
}
