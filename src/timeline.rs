//! Multi-dimensional region event timeline.
//!
//! Generalizes the original system's `MdTimeline`/`MdTEvent` abstract
//! classes: rather than a single chromosome-ordered stream (the teacher's
//! `multiinter.rs` event list), a `RegionTimeline` exposes one sorted
//! Begin/End event stream per dimension, each of length `2 * regions.len()`.
//! Event ordering follows the teacher's `multiinter.rs` tie-break exactly
//! (`position.cmp().then(is_start.cmp())`, i.e. End before Begin at equal
//! position) unless `config::touching_is_overlap` flips it.

use crate::config;
use crate::region::Region;
use std::cmp::Ordering as CmpOrdering;

/// Whether an event marks the start or end of a region's extent along a
/// given dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Begin,
    End,
}

/// A single point where some region's extent starts or ends along one
/// dimension.
#[derive(Debug, Clone)]
pub struct MdTEvent {
    pub when: f64,
    pub kind: EventKind,
    pub region: Region,
    pub dimension: usize,
    /// Insertion order, used as the final tie-break so otherwise-equal
    /// events replay deterministically.
    pub order: usize,
}

impl MdTEvent {
    fn key(&self) -> (f64, u8, usize) {
        // End sorts before Begin at equal `when`, unless touching counts as
        // overlap, in which case Begin must fire first so the active set
        // already contains the arriving region when End is processed.
        let kind_rank = match self.kind {
            EventKind::End => {
                if config::touching_is_overlap() {
                    1
                } else {
                    0
                }
            }
            EventKind::Begin => {
                if config::touching_is_overlap() {
                    0
                } else {
                    1
                }
            }
        };
        (self.when, kind_rank, self.order)
    }
}

impl PartialEq for MdTEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for MdTEvent {}

impl PartialOrd for MdTEvent {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for MdTEvent {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.key()
            .0
            .partial_cmp(&other.key().0)
            .unwrap_or(CmpOrdering::Equal)
            .then(self.key().1.cmp(&other.key().1))
            .then(self.key().2.cmp(&other.key().2))
    }
}

/// A multi-dimensional event timeline over a fixed snapshot of regions.
///
/// Timelines are immutable once built (the snapshot is taken at
/// construction, same as the original system binds a timeline to one
/// `RegionSet` state); `RegionSet::timeline()` rebuilds and re-caches this
/// whenever the set mutates.
#[derive(Clone)]
pub struct RegionTimeline {
    regions: Vec<Region>,
    dimension: usize,
}

impl RegionTimeline {
    pub fn new(regions: Vec<Region>) -> Self {
        let dimension = regions.first().map(|r| r.dimension()).unwrap_or(1);
        Self { regions, dimension }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The sorted Begin/End event sequence along `dim` (length `2 *
    /// regions().len()`).
    pub fn events(&self, dim: usize) -> Vec<MdTEvent> {
        let mut order = 0usize;
        let mut events: Vec<MdTEvent> = Vec::with_capacity(self.regions.len() * 2);
        for region in &self.regions {
            let iv = region.interval(dim);
            events.push(MdTEvent {
                when: iv.lower,
                kind: EventKind::Begin,
                region: region.clone(),
                dimension: dim,
                order,
            });
            order += 1;
            events.push(MdTEvent {
                when: iv.upper,
                kind: EventKind::End,
                region: region.clone(),
                dimension: dim,
                order,
            });
            order += 1;
        }
        events.sort();
        events
    }

    /// Shorthand for `events(0)`, the default/primary dimension.
    pub fn events_default(&self) -> Vec<MdTEvent> {
        self.events(0)
    }

    /// A single-dimension adapter view restricted to one axis.
    pub fn one_dimensional(&self, dim: usize) -> RegionTimelineOneDimen<'_> {
        RegionTimelineOneDimen { timeline: self, dim }
    }
}

/// A view of a `RegionTimeline` restricted to a single dimension, mirroring
/// the original system's `MdTimelineOneDimen`.
pub struct RegionTimelineOneDimen<'a> {
    timeline: &'a RegionTimeline,
    dim: usize,
}

impl<'a> RegionTimelineOneDimen<'a> {
    pub fn events(&self) -> Vec<MdTEvent> {
        self.timeline.events(self.dim)
    }
}
