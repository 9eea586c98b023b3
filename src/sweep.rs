//! One-pass, per-dimension sweep-line algorithm for pairwise region overlap.
//!
//! `RegionSweep` generalizes the teacher's `streaming::active_set::ActiveSet`
//! + `commands::intersect_engine::sweep_line_intersect` combination from a
//! single sorted-genomic-coordinate sweep into a per-dimension sweep over a
//! `RegionTimeline`. For each of the `dimension` axes it walks that axis's
//! Begin/End events with an `ActiveSet`, and for every pair simultaneously
//! active it broadcasts a tentative `SweepEvent::Intersect`. Once every axis
//! has been swept, pairs tentatively overlapping on all `dimension` axes are
//! broadcast as confirmed via `SweepEvent::Finalize` -- the same
//! temporary-then-final edge promotion `RegionIntersectionGraph` applies
//! when subscribed (see `graph.rs`).
//!
//! `Begin`/`End` lifecycle events are emitted once, against dimension 0
//! (the timeline's default/primary axis), since the spec ties a region's
//! overall sweep lifecycle to a single reference axis rather than requiring
//! one lifecycle per axis.

use crate::events::{Publisher, SweepEvent};
use crate::region::Region;
use crate::timeline::{EventKind, RegionTimeline};
use rustc_hash::FxHashMap;

/// A sliding active set keyed by region id, compacted lazily once dead
/// entries dominate -- the same `Vec` + `head_idx` shape as the teacher's
/// `ActiveSet<T>`, adapted to remove by id rather than by expiry position
/// since region extents aren't known to be disjoint-sorted across ids.
struct ActiveSet {
    entries: Vec<Option<Region>>,
    head_idx: usize,
    live: usize,
}

const COMPACTION_THRESHOLD: usize = 4096;

impl ActiveSet {
    fn new() -> Self {
        Self { entries: Vec::new(), head_idx: 0, live: 0 }
    }

    fn push(&mut self, region: Region) {
        self.entries.push(Some(region));
        self.live += 1;
    }

    fn remove(&mut self, id: &str) {
        if let Some(slot) = self.entries[self.head_idx..]
            .iter_mut()
            .find(|e| e.as_ref().map(|r| r.id() == id).unwrap_or(false))
        {
            *slot = None;
            self.live -= 1;
        }
        if self.entries.len() - self.head_idx > COMPACTION_THRESHOLD && self.live * 2 < self.entries.len() {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let remaining: Vec<Region> = self.entries[self.head_idx..]
            .iter()
            .filter_map(|e| e.clone())
            .collect();
        self.entries = remaining.into_iter().map(Some).collect();
        self.head_idx = 0;
    }

    fn iter(&self) -> impl Iterator<Item = &Region> {
        self.entries[self.head_idx..].iter().filter_map(|e| e.as_ref())
    }
}

/// Configuration for a `RegionSweep` run.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    pub dimension: usize,
}

/// The one-pass, per-dimension overlap sweep.
pub struct RegionSweep {
    config: SweepConfig,
}

impl RegionSweep {
    pub fn new(dimension: usize) -> Self {
        Self { config: SweepConfig { dimension } }
    }

    /// Run the sweep over `regions`, broadcasting `Init`, per-axis
    /// `Begin`/`End`/`Intersect`, cross-axis-confirmed `Finalize`, then
    /// `Done` to `publisher`.
    pub fn run(&self, regions: &[Region], publisher: &mut Publisher) {
        publisher.publish(SweepEvent::Init);
        log::debug!("sweep starting over {} regions, dimension {}", regions.len(), self.config.dimension);

        let timeline = RegionTimeline::new(regions.to_vec());
        let mut overlap_counts: FxHashMap<(String, String), u32> = FxHashMap::default();

        for dim in 0..self.config.dimension {
            log::trace!("sweeping dimension {dim}");
            let mut active = ActiveSet::new();
            for event in timeline.events(dim) {
                match event.kind {
                    EventKind::Begin => {
                        for other in active.iter() {
                            // event.region's Begin is firing now (latest-begin);
                            // other is already active (earlier-begin). Spec
                            // requires Intersect's components in
                            // (latest-begin, earlier-begin) order.
                            publisher.publish(SweepEvent::Intersect(event.region.clone(), other.clone()));
                            *overlap_counts
                                .entry(ordered_key(other.id(), event.region.id()))
                                .or_insert(0) += 1;
                        }
                        if dim == 0 {
                            publisher.publish(SweepEvent::Begin(event.region.clone()));
                        }
                        active.push(event.region.clone());
                    }
                    EventKind::End => {
                        if dim == 0 {
                            publisher.publish(SweepEvent::End(event.region.clone()));
                        }
                        active.remove(event.region.id());
                    }
                }
            }
        }

        let by_id: FxHashMap<&str, &Region> = regions.iter().map(|r| (r.id(), r)).collect();
        let mut finalized = 0usize;
        for ((a, b), count) in overlap_counts {
            if count as usize == self.config.dimension {
                if let (Some(&ra), Some(&rb)) = (by_id.get(a.as_str()), by_id.get(b.as_str())) {
                    publisher.publish(SweepEvent::Finalize(ra.clone(), rb.clone()));
                    finalized += 1;
                }
            }
        }

        log::debug!("sweep finalized {finalized} pairwise intersections");
        publisher.publish(SweepEvent::Done);
    }
}

fn ordered_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
