//! Sweep task runners: subscriber shapes that turn a sweep's broadcast
//! events into a typed result, following the original system's
//! `SweepTaskRunner.prepare(cls, RegionSweep, ...)` factory pattern
//! (`sources/algorithms/sweepln/regionsweepovlps.py`).

use crate::events::{ObserverState, Publisher, Subscriber, SweepEvent};
use crate::graph::{GraphBuilder, RegionIntersectionGraph};
use crate::region::Region;
use crate::sweep::RegionSweep;

/// A subscriber that collects a typed `Output` from a sweep run, built via
/// `prepare` and read back via `results` once the run is complete.
pub trait SweepTaskRunner: Subscriber + Sized {
    type Output;

    /// Construct a fresh runner for a `dimension`-dimensional sweep.
    fn prepare(dimension: usize) -> Self;

    /// Drive a `RegionSweep` over `regions`, subscribing `self`.
    fn run(&mut self, regions: &[Region]) {
        let mut publisher = Publisher::new();
        publisher.subscribe(self);
        RegionSweep::new(self.dimension()).run(regions, &mut publisher);
    }

    fn dimension(&self) -> usize;

    /// Consume the runner, returning its accumulated result.
    fn results(self) -> Self::Output;
}

/// Collects every confirmed pairwise overlap a sweep finds, as
/// `(region, region)` pairs -- the direct analogue of
/// `RegionSweepOverlaps(SweepTaskRunner)` in the original system.
pub struct RegionSweepOverlaps {
    dimension: usize,
    state: ObserverState,
    pairs: Vec<(Region, Region)>,
}

impl Subscriber for RegionSweepOverlaps {
    fn on_event(&mut self, event: &SweepEvent) {
        match event {
            SweepEvent::Init => self.state = ObserverState::Subscribed,
            SweepEvent::Finalize(a, b) => {
                self.state = ObserverState::Receiving;
                self.pairs.push((a.clone(), b.clone()));
            }
            SweepEvent::Done => self.state = ObserverState::Done,
            _ => {}
        }
    }

    fn state(&self) -> ObserverState {
        self.state
    }
}

impl SweepTaskRunner for RegionSweepOverlaps {
    type Output = Vec<(Region, Region)>;

    fn prepare(dimension: usize) -> Self {
        Self { dimension, state: ObserverState::Created, pairs: Vec::new() }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn results(self) -> Self::Output {
        self.pairs
    }
}

/// A `SweepTaskRunner` that builds a `RegionIntersectionGraph` from the
/// sweep's events, the task-runner-shaped counterpart to `graph::GraphBuilder`.
pub struct NxGraphSweepCtor {
    builder: GraphBuilder,
}

impl Subscriber for NxGraphSweepCtor {
    fn on_event(&mut self, event: &SweepEvent) {
        self.builder.on_event(event)
    }

    fn state(&self) -> ObserverState {
        self.builder.state()
    }
}

impl SweepTaskRunner for NxGraphSweepCtor {
    type Output = RegionIntersectionGraph;

    fn prepare(dimension: usize) -> Self {
        Self { builder: GraphBuilder::new(dimension) }
    }

    fn dimension(&self) -> usize {
        self.builder.graph.dimension()
    }

    fn results(self) -> Self::Output {
        self.builder.graph
    }
}

/// Enumerates every k-wise (k >= 2) intersection found by
/// `RegionCycleSweep`, each paired with its contributing parent regions --
/// the direct analogue of the original system's `EnumerateByRCSweep`.
pub struct EnumerateByRCSweep;

impl EnumerateByRCSweep {
    pub fn compute(dimension: usize, regions: &[Region]) -> Vec<(Region, Vec<Region>)> {
        let results = crate::cycle_sweep::RegionCycleSweep::new(dimension).run(regions);
        results
            .into_iter()
            .map(|derived| {
                let parents = derived
                    .provenance()
                    .map(|p| {
                        p.parents
                            .iter()
                            .filter_map(|id| regions.iter().find(|r| r.id() == id).cloned())
                            .collect()
                    })
                    .unwrap_or_default();
                (derived, parents)
            })
            .collect()
    }
}

/// Single-region restriction over `EnumerateByRCSweep`: keeps only the
/// k-wise intersections that `region_id` itself contributed to.
pub struct SRQEnumByRCSweep;

impl SRQEnumByRCSweep {
    pub fn compute(dimension: usize, regions: &[Region], region_id: &str) -> Vec<(Region, Vec<Region>)> {
        EnumerateByRCSweep::compute(dimension, regions)
            .into_iter()
            .filter(|(_, members)| members.iter().any(|m| m.id() == region_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;

    fn region2(id: &str, x: (f64, f64), y: (f64, f64)) -> Region {
        Region::with_id(id, vec![Interval::new(x.0, x.1), Interval::new(y.0, y.1)]).unwrap()
    }

    #[test]
    fn test_overlaps_runner() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));

        let mut runner = RegionSweepOverlaps::prepare(2);
        runner.run(&[a, b]);
        assert_eq!(runner.results().len(), 1);
    }

    #[test]
    fn test_graph_ctor_runner() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));

        let mut runner = NxGraphSweepCtor::prepare(2);
        runner.run(&[a, b]);
        let graph = runner.results();
        assert_eq!(graph.overlaps().len(), 1);
    }

    #[test]
    fn test_enumerate_by_rcsweep() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (2.0, 12.0), (2.0, 12.0));
        let c = region2("c", (4.0, 14.0), (4.0, 14.0));

        let results = EnumerateByRCSweep::compute(2, &[a, b, c]);
        assert!(results.iter().any(|(_, parents)| parents.len() == 3));
    }

    #[test]
    fn test_srq_enum_by_rcsweep() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));
        let c = region2("c", (100.0, 110.0), (100.0, 110.0));
        let d = region2("d", (102.0, 112.0), (102.0, 112.0));

        let results = SRQEnumByRCSweep::compute(2, &[a, b, c, d], "a");
        assert_eq!(results.len(), 1);
    }
}
