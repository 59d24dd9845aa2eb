//! Block discovery.
//!
//! # Overview
//!
//! After the aggregation pass, keys are visited in first-seen order. Every
//! unclaimed occurrence of a significant key with at least two of them
//! starts a *chain*, and the chains grow forward one part at a time:
//!
//! 1. For every chain, look at the element right after its last part.
//!    Unclaimed successors are bucketed by key.
//! 2. A successor may be the first part of a later chain. Taking it drops
//!    that later chain, which keeps chains disjoint.
//! 3. The first key (in first-seen order) whose bucket still extends two or
//!    more chains becomes the next part. Chains without a successor in that
//!    bucket are dropped and their positions become free again, so length
//!    wins over repetition count.
//! 4. Growth stops when no bucket extends two chains.
//!
//! Nothing is claimed while a block grows. A finished block is accepted and
//! its positions claimed when it meets `min_parts`; the same key is then
//! visited again, since unclaimed repeats of it may form another block. A
//! rejected block is dismissed and leaves every position unclaimed.
//!
//! # Example
//!
//! ```
//! use concordance::engine::{Concordance, IdentityFilter, NeverCancel};
//! use concordance::SearchOptions;
//!
//! let lines = ["fn a() {", "}", "fn b() {", "}", "fn a() {", "}"];
//! let concordance = Concordance::new(&lines, IdentityFilter);
//! let outcome = concordance.find_blocks(&SearchOptions::new(), &NeverCancel);
//!
//! assert_eq!(outcome.blocks.len(), 1);
//! assert_eq!(outcome.blocks[0].part_count(), 2);
//! assert_eq!(outcome.blocks[0].occurrence_starts(), &[0, 4]);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use std::time::Instant;

use serde::Serialize;

use super::block::{Block, BlockLayout};
use super::cancel::Cancellation;
use super::filter::{IdentityFilter, KeyFilter};
use super::registry::PositionRegistry;
use crate::options::SearchOptions;
use crate::progress::{PHASE_AGGREGATE, PHASE_SEARCH};

/// Statistics from one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// Elements in the input sequence
    pub total_elements: usize,
    /// Elements the filter excluded
    pub excluded_elements: usize,
    /// Distinct keys
    pub unique_keys: usize,
    /// Distinct keys allowed to anchor blocks
    pub significant_keys: usize,
    /// Blocks in the result
    pub accepted_blocks: usize,
    /// Finished blocks rejected by `min_parts`
    pub dismissed_blocks: usize,
    /// Growth steps that dropped occurrences to gain a part
    pub backtracks: usize,
    /// Positions claimed by accepted blocks
    pub covered_positions: usize,
    /// Whether cancellation stopped the search
    pub interrupted: bool,
    /// Whether `max_blocks` stopped the search
    pub truncated: bool,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

/// Accepted blocks plus statistics.
#[derive(Debug, Clone)]
pub struct SearchOutcome<'a, T> {
    /// Blocks in discovery order
    pub blocks: Vec<Block<'a, T>>,
    /// Search statistics
    pub summary: SearchSummary,
}

impl<T> SearchOutcome<'_, T> {
    /// Position layout of every block, in discovery order.
    #[must_use]
    pub fn layouts(&self) -> Vec<BlockLayout> {
        self.blocks.iter().map(Block::layout).collect()
    }
}

/// Duplicate-block finder over one borrowed sequence.
///
/// Each [`find_blocks`](Self::find_blocks) call rebuilds its working state
/// from scratch, so repeated calls are independent and return identical
/// results for identical inputs.
#[derive(Debug, Clone)]
pub struct Concordance<'a, T, F> {
    elements: &'a [T],
    filter: F,
}

impl<'a, T: std::fmt::Display> Concordance<'a, T, IdentityFilter> {
    /// Search keyed by each element's `Display` form.
    #[must_use]
    pub fn unfiltered(elements: &'a [T]) -> Self {
        Self::new(elements, IdentityFilter)
    }
}

/// How growing a block from one key ended.
enum Growth {
    /// Fewer than two unclaimed, significant occurrences.
    NoSeed,
    /// Cancellation was observed.
    Cancelled,
    /// Disjoint occurrence chains of arena ids, all of the same length.
    Finished(Vec<Vec<usize>>),
}

/// The part chosen for the next growth step.
struct Continuation {
    group: usize,
    /// `(chain index, successor id)`, in chain order
    matches: Vec<(usize, usize)>,
}

impl<'a, T, F> Concordance<'a, T, F>
where
    F: KeyFilter<T>,
    F::Key: Clone,
{
    /// Prepare a search over `elements`.
    #[must_use]
    pub fn new(elements: &'a [T], filter: F) -> Self {
        Self { elements, filter }
    }

    /// The searched sequence.
    #[must_use]
    pub fn elements(&self) -> &'a [T] {
        self.elements
    }

    /// Find repeated contiguous blocks.
    ///
    /// `cancel` is polled before each key is visited and before each growth
    /// step. On cancellation the blocks accepted so far are returned and
    /// `summary.interrupted` is set; a block still growing is dropped.
    pub fn find_blocks<C>(&self, options: &SearchOptions, cancel: &C) -> SearchOutcome<'a, T>
    where
        C: Cancellation + ?Sized,
    {
        let start_time = Instant::now();
        let progress = options.progress_callback.as_deref();

        log::info!("Grouping {} elements", self.elements.len());
        if let Some(callback) = progress {
            callback.on_phase_start(PHASE_AGGREGATE, self.elements.len());
        }
        let mut registry = PositionRegistry::aggregate_with(self.elements, &self.filter, |i| {
            if let Some(callback) = progress {
                callback.on_progress(i + 1);
            }
        });
        if let Some(callback) = progress {
            callback.on_phase_end(PHASE_AGGREGATE);
        }

        let mut summary = SearchSummary {
            total_elements: self.elements.len(),
            excluded_elements: registry.excluded_count(),
            unique_keys: registry.group_count(),
            significant_keys: registry.significant_group_count(),
            ..Default::default()
        };
        log::info!(
            "Searching {} keys ({} significant, {} elements excluded)",
            summary.unique_keys,
            summary.significant_keys,
            summary.excluded_elements
        );

        if let Some(callback) = progress {
            callback.on_phase_start(PHASE_SEARCH, registry.group_count());
        }

        let mut blocks = Vec::new();
        let mut group = 0;
        while group < registry.group_count() {
            if cancel.is_cancelled() {
                summary.interrupted = true;
                break;
            }
            if let Some(callback) = progress {
                callback.on_progress(group + 1);
            }

            let chains = match grow(&registry, group, cancel, &mut summary) {
                Growth::NoSeed => {
                    group += 1;
                    continue;
                }
                Growth::Cancelled => {
                    summary.interrupted = true;
                    break;
                }
                Growth::Finished(chains) => chains,
            };

            let part_count = chains[0].len();
            if !options.accepts(part_count) {
                log::debug!(
                    "Dismissed block at position {} ({} parts x {} occurrences)",
                    registry.occurrence(chains[0][0]).position,
                    part_count,
                    chains.len()
                );
                summary.dismissed_blocks += 1;
                group += 1;
                continue;
            }

            registry.consume(chains.iter().flatten().copied());
            let starts: Vec<usize> = chains
                .iter()
                .map(|chain| registry.occurrence(chain[0]).position)
                .collect();
            log::debug!(
                "Accepted block {} at positions {:?} ({} parts)",
                blocks.len() + 1,
                starts,
                part_count
            );
            let block = Block::new(self.elements, starts, part_count);
            summary.covered_positions += block.covered_positions();
            blocks.push(block);
            if let Some(callback) = progress {
                callback.on_message(&format!("{} blocks found", blocks.len()));
            }

            if options.block_limit() == Some(blocks.len()) {
                summary.truncated = true;
                break;
            }
            // Stay on this key: unclaimed repeats may form another block.
        }

        if let Some(callback) = progress {
            callback.on_phase_end(PHASE_SEARCH);
        }

        summary.accepted_blocks = blocks.len();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        if summary.interrupted {
            log::warn!("Search cancelled after {} blocks", summary.accepted_blocks);
        } else {
            log::info!(
                "Found {} blocks covering {} positions",
                summary.accepted_blocks,
                summary.covered_positions
            );
        }

        SearchOutcome { blocks, summary }
    }
}

/// Seed chains from `group` and grow them as far as they go.
///
/// Nothing is claimed here; the caller claims the chains of an accepted block.
fn grow<K, C>(
    registry: &PositionRegistry<K>,
    group: usize,
    cancel: &C,
    summary: &mut SearchSummary,
) -> Growth
where
    K: Eq + Hash + Clone,
    C: Cancellation + ?Sized,
{
    if !registry.group_info(group).significant {
        return Growth::NoSeed;
    }
    let mut chains: Vec<Vec<usize>> = registry
        .group_members(group)
        .iter()
        .copied()
        .filter(|&id| !registry.is_consumed(id))
        .map(|id| vec![id])
        .collect();
    if chains.len() < 2 {
        return Growth::NoSeed;
    }

    loop {
        if cancel.is_cancelled() {
            return Growth::Cancelled;
        }

        let Some(step) = next_part(registry, &chains) else {
            break;
        };

        if step.matches.len() < chains.len() {
            summary.backtracks += 1;
            log::trace!(
                "Trading {} occurrences for part {} (key #{})",
                chains.len() - step.matches.len(),
                chains[0].len() + 1,
                step.group
            );
        }
        chains = extend(chains, &step);
    }

    Growth::Finished(chains)
}

/// Find the first key (in first-seen order) that continues two or more chains.
fn next_part<K>(registry: &PositionRegistry<K>, chains: &[Vec<usize>]) -> Option<Continuation>
where
    K: Eq + Hash + Clone,
{
    let mut buckets: BTreeMap<usize, Vec<(usize, usize)>> = BTreeMap::new();
    for (index, chain) in chains.iter().enumerate() {
        let Some(&last) = chain.last() else {
            continue;
        };
        let position = registry.occurrence(last).position;
        if let Some(next) = registry.available_at(position + 1) {
            buckets
                .entry(registry.occurrence(next).group)
                .or_default()
                .push((index, next));
        }
    }

    let chain_starts: HashMap<usize, usize> = chains
        .iter()
        .enumerate()
        .filter_map(|(index, chain)| chain.first().map(|&id| (id, index)))
        .collect();

    buckets.into_iter().find_map(|(group, matches)| {
        let matches = resolve_overlaps(matches, &chain_starts);
        (matches.len() > 1).then_some(Continuation { group, matches })
    })
}

/// Drop matches of chains whose first part an earlier chain takes as its
/// successor.
///
/// Chains are disjoint and ordered by position, so a successor inside
/// another chain is always the first part of a later chain.
fn resolve_overlaps(
    matches: Vec<(usize, usize)>,
    chain_starts: &HashMap<usize, usize>,
) -> Vec<(usize, usize)> {
    let mut taken = HashSet::new();
    let mut kept = Vec::with_capacity(matches.len());
    for (index, successor) in matches {
        if taken.contains(&index) {
            continue;
        }
        if let Some(&owner) = chain_starts.get(&successor) {
            taken.insert(owner);
        }
        kept.push((index, successor));
    }
    kept
}

/// Apply a growth step, returning the new chains.
///
/// Chains without a match are dropped; the rest gain the matched successor.
fn extend(chains: Vec<Vec<usize>>, step: &Continuation) -> Vec<Vec<usize>> {
    let mut matches = step.matches.iter().peekable();
    chains
        .into_iter()
        .enumerate()
        .filter_map(|(index, mut chain)| {
            let &(_, successor) = matches.next_if(|(matched, _)| *matched == index)?;
            chain.push(successor);
            Some(chain)
        })
        .collect()
}
