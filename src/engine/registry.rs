//! Position arena and aggregation pass.
//!
//! Every classified element becomes one [`Occurrence`] stored in a flat
//! arena. Key groups and in-progress blocks refer to occurrences by arena
//! index; whether an occurrence is claimed by an accepted block lives in a
//! separate bitset.

use std::hash::Hash;

use super::filter::KeyFilter;
use super::multimap::OrderedMultimap;

/// Sentinel in the position lookup for excluded elements.
const EXCLUDED: usize = usize::MAX;

/// One element occurrence in the original sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Index into the original sequence.
    pub position: usize,
    /// First-seen index of the occurrence's key group.
    pub group: usize,
}

/// A key's significance, fixed when the key was first seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupInfo {
    /// Whether the group may anchor blocks.
    pub significant: bool,
}

/// Result of the aggregation pass: arena, key groups and consumed flags.
#[derive(Debug)]
pub struct PositionRegistry<K> {
    occurrences: Vec<Occurrence>,
    by_position: Vec<usize>,
    groups: OrderedMultimap<K, usize>,
    info: Vec<GroupInfo>,
    consumed: Vec<bool>,
    excluded: usize,
}

impl<K: Eq + Hash + Clone> PositionRegistry<K> {
    /// Walk `elements` once, classifying each with `filter`.
    pub fn aggregate<T, F>(elements: &[T], filter: &F) -> Self
    where
        F: KeyFilter<T, Key = K> + ?Sized,
    {
        Self::aggregate_with(elements, filter, |_| {})
    }

    /// Like [`aggregate`](Self::aggregate), reporting each processed index.
    pub fn aggregate_with<T, F>(
        elements: &[T],
        filter: &F,
        mut on_element: impl FnMut(usize),
    ) -> Self
    where
        F: KeyFilter<T, Key = K> + ?Sized,
    {
        let mut registry = Self {
            occurrences: Vec::with_capacity(elements.len()),
            by_position: vec![EXCLUDED; elements.len()],
            groups: OrderedMultimap::new(),
            info: Vec::new(),
            consumed: Vec::with_capacity(elements.len()),
            excluded: 0,
        };

        for (position, element) in elements.iter().enumerate() {
            on_element(position);
            let Some(verdict) = filter.classify(element) else {
                registry.excluded += 1;
                continue;
            };
            let id = registry.occurrences.len();
            let (group, first_seen) = registry.groups.put(verdict.key, id);
            if first_seen {
                registry.info.push(GroupInfo {
                    significant: verdict.significant,
                });
            }
            registry.occurrences.push(Occurrence { position, group });
            registry.by_position[position] = id;
            registry.consumed.push(false);
        }

        registry
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of keys allowed to anchor blocks.
    #[must_use]
    pub fn significant_group_count(&self) -> usize {
        self.info.iter().filter(|g| g.significant).count()
    }

    /// Number of elements the filter excluded.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.excluded
    }

    /// Keys in first-seen order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        self.groups.keys()
    }

    /// Arena indices of the group's occurrences, ascending by position.
    #[must_use]
    pub fn group_members(&self, group: usize) -> &[usize] {
        self.groups.values_at(group)
    }

    /// Significance of a group.
    #[must_use]
    pub fn group_info(&self, group: usize) -> GroupInfo {
        self.info[group]
    }

    /// The occurrence stored at arena index `id`.
    #[must_use]
    pub fn occurrence(&self, id: usize) -> Occurrence {
        self.occurrences[id]
    }

    /// Unconsumed occurrence at `position`, if that position was classified.
    #[must_use]
    pub fn available_at(&self, position: usize) -> Option<usize> {
        let id = *self.by_position.get(position)?;
        (id != EXCLUDED && !self.consumed[id]).then_some(id)
    }

    /// Whether the occurrence is claimed by a block.
    #[must_use]
    pub fn is_consumed(&self, id: usize) -> bool {
        self.consumed[id]
    }

    /// Claim occurrences.
    pub fn consume(&mut self, ids: impl IntoIterator<Item = usize>) {
        for id in ids {
            debug_assert!(!self.consumed[id], "occurrence {id} claimed twice");
            self.consumed[id] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter::{Classified, FnFilter, IdentityFilter};

    #[test]
    fn test_aggregate_groups_in_first_seen_order() {
        let lines = ["b", "a", "b", "c", "a"];
        let registry = PositionRegistry::aggregate(&lines, &IdentityFilter);

        assert_eq!(registry.keys(), &["b", "a", "c"]);
        let positions: Vec<usize> = registry
            .group_members(1)
            .iter()
            .map(|&id| registry.occurrence(id).position)
            .collect();
        assert_eq!(positions, vec![1, 4]);
    }

    #[test]
    fn test_significance_fixed_by_first_verdict() {
        // "x" is insignificant on its first sight only.
        let first = std::cell::Cell::new(true);
        let filter = FnFilter::new(|s: &&str| {
            let significant = !(*s == "x" && first.replace(false));
            Some(Classified {
                key: s.to_string(),
                significant,
            })
        });
        let registry = PositionRegistry::aggregate(&["x", "x", "x"], &filter);
        assert!(!registry.group_info(0).significant);
        assert_eq!(registry.significant_group_count(), 0);
    }

    #[test]
    fn test_excluded_elements_keep_positions() {
        let filter = FnFilter::new(|s: &&str| {
            (!s.is_empty()).then(|| Classified::significant(s.to_string()))
        });
        let registry = PositionRegistry::aggregate(&["a", "", "a"], &filter);

        assert_eq!(registry.excluded_count(), 1);
        assert_eq!(registry.group_count(), 1);
        assert_eq!(registry.available_at(1), None);
        let id = registry.available_at(2).unwrap();
        assert_eq!(registry.occurrence(id).position, 2);
    }

    #[test]
    fn test_consume() {
        let mut registry = PositionRegistry::aggregate(&["a", "a", "a"], &IdentityFilter);
        registry.consume([0, 2]);
        assert!(registry.is_consumed(0));
        assert_eq!(registry.available_at(0), None);
        assert_eq!(registry.available_at(1), Some(1));
        assert!(!registry.is_consumed(1));
    }

    #[test]
    fn test_available_at_past_end() {
        let registry = PositionRegistry::aggregate(&["a"], &IdentityFilter);
        assert_eq!(registry.available_at(1), None);
    }
}
