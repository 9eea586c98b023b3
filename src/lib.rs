// Clippy allows for the whole crate
#![allow(clippy::too_many_arguments)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::type_complexity)]

//! rigraph: k-wise region intersection detection over axis-aligned
//! hyperrectangles.
//!
//! Computes every k-wise intersection (k >= 2) among a set of d-dimensional
//! "Regions" via sweep-line event processing and all-clique enumeration
//! over an intersection graph, rather than pairwise brute force.
//!
//! # Features
//!
//! - **Sweep-line overlap detection**: a single-threaded, per-dimension
//!   active-set sweep (`sweep`) finds every pairwise overlap in
//!   `O(n log n + p * d)`.
//! - **Cyclic k-wise intersection**: `cycle_sweep` grows pairwise overlaps
//!   into k-wise intersections by fixpoint iteration.
//! - **Graph-backed enumeration**: `graph` + `enumerate` expose all-clique
//!   queries (full, single-region, multi-region) over the intersection graph.
//!
//! # Example
//!
//! ```
//! use rigraph::prelude::*;
//!
//! let a = Region::with_id("a", vec![Interval::new(0.0, 10.0), Interval::new(0.0, 10.0)]).unwrap();
//! let b = Region::with_id("b", vec![Interval::new(5.0, 15.0), Interval::new(5.0, 15.0)]).unwrap();
//!
//! let mut runner = RegionSweepOverlaps::prepare(2);
//! runner.run(&[a, b]);
//! assert_eq!(runner.results().len(), 1);
//! ```

pub mod config;
pub mod cycle_sweep;
pub mod enumerate;
pub mod error;
pub mod events;
pub mod graph;
pub mod interval;
pub mod object;
pub mod random;
pub mod region;
pub mod regionset;
pub mod runners;
pub mod sweep;
pub mod timeline;

pub use error::{GritError, Result};
pub use interval::Interval;
pub use region::{Linkage, Provenance, ProvenanceMode, Region};
pub use regionset::RegionSet;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{default_linkage, set_default_linkage, set_touching_is_overlap, touching_is_overlap};
    pub use crate::cycle_sweep::{RegionCycleSweep, RestrictedRegionCycleSweep};
    pub use crate::enumerate::{EnumerateByNxGraph, MRQEnumByNxGraph, RegionIntersect, SRQEnumByNxGraph};
    pub use crate::error::{GritError, Result};
    pub use crate::events::{ObserverState, Publisher, SweepEvent, Subscriber};
    pub use crate::graph::{EdgeState, GraphBuilder, GraphFormat, RegionIntersectionGraph};
    pub use crate::interval::Interval;
    pub use crate::object::{FromObject, ToObject};
    pub use crate::random::{RandomFn, Randoms};
    pub use crate::region::{Linkage, Provenance, ProvenanceMode, Region};
    pub use crate::regionset::RegionSet;
    pub use crate::runners::{EnumerateByRCSweep, NxGraphSweepCtor, RegionSweepOverlaps, SRQEnumByRCSweep, SweepTaskRunner};
    pub use crate::sweep::RegionSweep;
    pub use crate::timeline::{EventKind, MdTEvent, RegionTimeline};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_basic_pairwise_workflow() {
        let a = Region::with_id("a", vec![Interval::new(0.0, 10.0), Interval::new(0.0, 10.0)]).unwrap();
        let b = Region::with_id("b", vec![Interval::new(5.0, 15.0), Interval::new(5.0, 15.0)]).unwrap();
        let c = Region::with_id("c", vec![Interval::new(100.0, 110.0), Interval::new(100.0, 110.0)]).unwrap();

        let mut runner = RegionSweepOverlaps::prepare(2);
        runner.run(&[a, b, c]);
        let pairs = runner.results();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.id(), "a");
        assert_eq!(pairs[0].1.id(), "b");
    }

    #[test]
    fn test_triple_wise_workflow_via_graph_and_enumerate() {
        let a = Region::with_id("a", vec![Interval::new(0.0, 10.0), Interval::new(0.0, 10.0)]).unwrap();
        let b = Region::with_id("b", vec![Interval::new(5.0, 15.0), Interval::new(5.0, 15.0)]).unwrap();
        let c = Region::with_id("c", vec![Interval::new(2.0, 8.0), Interval::new(2.0, 8.0)]).unwrap();

        let mut runner = NxGraphSweepCtor::prepare(2);
        runner.run(&[a, b, c]);
        let graph = runner.results();

        let results = EnumerateByNxGraph::compute(&graph);
        assert!(results.iter().any(|(_, members)| members.len() == 3));
    }
}
