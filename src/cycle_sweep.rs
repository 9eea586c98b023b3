//! Cyclic multi-pass sweep for k-wise (k >= 2) region intersections.
//!
//! Pass 0 computes all pairwise (2-wise) intersections via `RegionSweep`.
//! Each subsequent pass grows every surviving intersection by one more
//! original region: pass *i* takes the (i+2)-wise intersections from pass
//! *i-1* and tests each against every original region not already among its
//! parents, keeping the ones that still intersect. The cycle is a fixpoint:
//! it stops once a pass produces nothing new. Results are deduplicated by
//! their canonicalized (sorted) parent-id set, since the same k-subset can
//! be reached by growing different (k-1)-subsets in different orders.

use crate::events::{ObserverState, Publisher, SweepEvent, Subscriber};
use crate::region::{Linkage, Region};
use crate::sweep::RegionSweep;
use std::collections::HashSet;

struct PairCollector {
    pairs: Vec<(Region, Region)>,
}

impl Subscriber for PairCollector {
    fn on_event(&mut self, event: &SweepEvent) {
        if let SweepEvent::Finalize(a, b) = event {
            self.pairs.push((a.clone(), b.clone()));
        }
    }
    fn state(&self) -> ObserverState {
        ObserverState::Receiving
    }
}

fn parent_ids(region: &Region, fallback: &Region) -> Vec<String> {
    region
        .provenance()
        .map(|p| p.parents.clone())
        .unwrap_or_else(|| vec![fallback.id().to_string()])
}

fn canonical_key(ids: &[String]) -> Vec<String> {
    let mut sorted = ids.to_vec();
    sorted.sort();
    sorted
}

/// The full cyclic multi-pass k-wise intersection sweep.
pub struct RegionCycleSweep {
    dimension: usize,
}

impl RegionCycleSweep {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Run every pass to fixpoint, returning every derived k-wise (k >= 2)
    /// intersection region found, each carrying `Linkage::Aggregate`
    /// provenance listing its full parent id set.
    pub fn run(&self, regions: &[Region]) -> Vec<Region> {
        let mut pairs = PairCollector { pairs: Vec::new() };
        {
            let mut publisher = Publisher::new();
            publisher.subscribe(&mut pairs);
            RegionSweep::new(self.dimension).run(regions, &mut publisher);
        }

        let mut all_results: Vec<Region> = Vec::new();
        let mut seen: HashSet<Vec<String>> = HashSet::new();

        let mut current_level: Vec<Region> = Vec::new();
        for (a, b) in pairs.pairs {
            if let Some(mut merged) = a.intersect(&b, Linkage::Aggregate) {
                let key = canonical_key(&parent_ids(&merged, &merged));
                if seen.insert(key.clone()) {
                    merged = reattach_parents(merged, key);
                    current_level.push(merged.clone());
                    all_results.push(merged);
                }
            }
        }

        log::debug!("cycle sweep pass 0 produced {} pairwise intersections", current_level.len());
        let mut pass = 1;
        while !current_level.is_empty() {
            let mut next_level = Vec::new();
            for derived in &current_level {
                let parents: HashSet<&str> = derived
                    .provenance()
                    .map(|p| p.parents.iter().map(String::as_str).collect())
                    .unwrap_or_default();

                for candidate in regions {
                    if parents.contains(candidate.id()) {
                        continue;
                    }
                    if let Some(grown) = derived.intersect(candidate, Linkage::None) {
                        let mut new_parents: Vec<String> = derived
                            .provenance()
                            .map(|p| p.parents.clone())
                            .unwrap_or_default();
                        new_parents.push(candidate.id().to_string());
                        let key = canonical_key(&new_parents);
                        if seen.insert(key.clone()) {
                            let grown = reattach_parents(grown, key);
                            next_level.push(grown.clone());
                            all_results.push(grown);
                        }
                    }
                }
            }
            log::debug!("cycle sweep pass {pass} grew {} new intersections", next_level.len());
            pass += 1;
            current_level = next_level;
        }

        all_results
    }
}

fn reattach_parents(mut region: Region, parents: Vec<String>) -> Region {
    region.set_provenance_parents(parents);
    region
}

/// A `RegionCycleSweep` restricted to chains containing one target region,
/// for efficient single-region queries: growth only proceeds along chains
/// that already contain `target`, pruning branches that can never satisfy
/// the restriction.
pub struct RestrictedRegionCycleSweep {
    inner: RegionCycleSweep,
}

impl RestrictedRegionCycleSweep {
    pub fn new(dimension: usize) -> Self {
        Self { inner: RegionCycleSweep::new(dimension) }
    }

    /// Run the cycle sweep, keeping only derived regions whose parent set
    /// contains `target_id`.
    pub fn run(&self, regions: &[Region], target_id: &str) -> Vec<Region> {
        let all = self.inner.run(regions);
        let restricted: Vec<Region> = all
            .into_iter()
            .filter(|r| {
                r.provenance()
                    .map(|p| p.parents.iter().any(|id| id == target_id))
                    .unwrap_or(false)
            })
            .collect();

        if restricted.is_empty() {
            log::warn!("restricted cycle sweep for '{target_id}' pruned every pass to empty");
        }
        restricted
    }
}
