//! All-clique enumeration queries over a `RegionIntersectionGraph`.
//!
//! `petgraph` has no built-in all-cliques algorithm (unlike `networkx`'s
//! `enumerate_all_cliques`, which the original system calls directly), so
//! `all_cliques` hand-implements the same breadth-first growth: start from
//! every single node, then repeatedly extend each clique found so far by a
//! common neighbor whose index is greater than the clique's current
//! maximum, which both avoids re-deriving the same clique in a different
//! member order and yields cliques in increasing size order. Only `Final`
//! edges count as graph edges for this purpose; a `Tentative` edge that
//! never reached `dimension` confirmations is not a true intersection.
//!
//! Every emitted clique is independently verified by intersecting its
//! member regions (`Region::from_intersect`) before being surfaced, so a
//! clique whose members don't truly share a common point is silently
//! dropped rather than reported. This can't happen for a graph built by
//! this crate's own sweep (axis-aligned pairwise overlap on every
//! dimension forces a shared point by Helly's theorem), but it can happen
//! for a graph loaded from elsewhere whose edges have gone stale relative
//! to the regions they connect -- see `graph::RegionIntersectionGraph::from_object`.

use crate::graph::{EdgeState, RegionIntersectionGraph};
use crate::region::Region;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// `(derived intersection region, its contributing member regions)`.
pub type RegionIntersect = (Region, Vec<Region>);

fn final_adjacency(graph: &RegionIntersectionGraph) -> HashMap<NodeIndex, HashSet<NodeIndex>> {
    let inner = graph.inner();
    let mut adj: HashMap<NodeIndex, HashSet<NodeIndex>> =
        inner.node_indices().map(|n| (n, HashSet::new())).collect();
    for edge in inner.edge_references() {
        if matches!(edge.weight(), EdgeState::Final { .. }) {
            adj.get_mut(&edge.source()).unwrap().insert(edge.target());
            adj.get_mut(&edge.target()).unwrap().insert(edge.source());
        }
    }
    adj
}

/// The sorted region-id tuple used as both the dedup key across member
/// order and the client-observable tie-break among same-size cliques.
fn clique_sort_key(graph: &RegionIntersectionGraph, clique: &[NodeIndex]) -> Vec<String> {
    let mut ids: Vec<String> = clique.iter().map(|&n| graph.inner()[n].id().to_string()).collect();
    ids.sort();
    ids
}

/// Every clique of size >= 2 in the graph's `Final`-edge subgraph, ordered
/// by increasing clique size and, within a size, lexicographically by
/// sorted parent ids. `HashSet` iteration (used for the common-neighbor
/// candidates) is hash-randomized, so each level is explicitly re-sorted by
/// that key before being emitted or used to grow the next level.
fn all_cliques(graph: &RegionIntersectionGraph) -> Vec<Vec<NodeIndex>> {
    let adj = final_adjacency(graph);
    let mut current: Vec<Vec<NodeIndex>> = graph.inner().node_indices().map(|n| vec![n]).collect();
    let mut all = Vec::new();

    loop {
        let mut next = Vec::new();
        for clique in &current {
            let last = *clique.last().unwrap();
            let mut common: Option<HashSet<NodeIndex>> = None;
            for member in clique {
                let neighbors = adj.get(member).cloned().unwrap_or_default();
                common = Some(match common {
                    None => neighbors,
                    Some(c) => c.intersection(&neighbors).cloned().collect(),
                });
            }
            for candidate in common.unwrap_or_default() {
                if candidate.index() > last.index() {
                    let mut grown = clique.clone();
                    grown.push(candidate);
                    next.push(grown);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        next.sort_by(|a, b| clique_sort_key(graph, a).cmp(&clique_sort_key(graph, b)));
        all.extend(next.clone());
        current = next;
    }

    all
}

fn clique_to_intersect(graph: &RegionIntersectionGraph, clique: &[NodeIndex]) -> Option<RegionIntersect> {
    let members: Vec<&Region> = clique.iter().map(|&n| &graph.inner()[n]).collect();
    let derived = Region::from_intersect(&members, true)?;
    Some((derived, members.into_iter().cloned().collect()))
}

/// Enumerate every non-empty k-wise intersection in the graph, for k >= 2.
pub struct EnumerateByNxGraph;

impl EnumerateByNxGraph {
    pub fn compute(graph: &RegionIntersectionGraph) -> Vec<RegionIntersect> {
        all_cliques(graph)
            .iter()
            .filter_map(|clique| clique_to_intersect(graph, clique))
            .collect()
    }
}

/// Single-region query: every k-wise intersection the given region
/// participates in. Restricts clique growth to cliques already containing
/// `region_id`, rather than filtering the full enumeration after the fact.
pub struct SRQEnumByNxGraph;

impl SRQEnumByNxGraph {
    pub fn compute(graph: &RegionIntersectionGraph, region_id: &str) -> Vec<RegionIntersect> {
        let target = graph
            .inner()
            .node_indices()
            .find(|&n| graph.inner()[n].id() == region_id);
        let Some(target) = target else { return Vec::new() };

        all_cliques(graph)
            .into_iter()
            .filter(|clique| clique.contains(&target))
            .filter_map(|clique| clique_to_intersect(graph, &clique))
            .collect()
    }
}

/// Multi-region query: every k-wise intersection whose member set is drawn
/// entirely from `region_ids` (the induced subgraph restriction).
pub struct MRQEnumByNxGraph;

impl MRQEnumByNxGraph {
    pub fn compute(graph: &RegionIntersectionGraph, region_ids: &[&str]) -> Vec<RegionIntersect> {
        let wanted: HashSet<&str> = region_ids.iter().copied().collect();
        all_cliques(graph)
            .into_iter()
            .filter(|clique| clique.iter().all(|&n| wanted.contains(graph.inner()[n].id())))
            .filter_map(|clique| clique_to_intersect(graph, &clique))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Publisher;
    use crate::graph::GraphBuilder;
    use crate::interval::Interval;
    use crate::sweep::RegionSweep;

    fn region2(id: &str, x: (f64, f64), y: (f64, f64)) -> Region {
        Region::with_id(id, vec![Interval::new(x.0, x.1), Interval::new(y.0, y.1)]).unwrap()
    }

    fn build_graph(regions: &[Region]) -> RegionIntersectionGraph {
        let mut builder = GraphBuilder::new(2);
        let mut publisher = Publisher::new();
        publisher.subscribe(&mut builder);
        RegionSweep::new(2).run(regions, &mut publisher);
        drop(publisher);
        builder.graph
    }

    #[test]
    fn test_enumerate_triple_overlap() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));
        let c = region2("c", (2.0, 8.0), (2.0, 8.0));
        let graph = build_graph(&[a, b, c]);

        let results = EnumerateByNxGraph::compute(&graph);
        // 3 pairs + 1 triple
        assert_eq!(results.len(), 4);
        assert!(results.iter().any(|(_, members)| members.len() == 3));
    }

    #[test]
    fn test_inconsistent_loaded_graph_clique_is_dropped() {
        // For axis-aligned regions, pairwise overlap in every dimension
        // (which is exactly what a `Final` edge means) forces a shared
        // point per dimension -- Helly's theorem specialized to boxes --
        // so a genuine Helly violation can never arise from this crate's
        // own sweep. The verification in `clique_to_intersect` instead
        // guards a graph loaded from elsewhere (`from_object`): its edges
        // are taken as given, not recomputed from the node regions, so a
        // stale or hand-edited file can claim overlaps that no longer hold.
        use crate::graph::{GraphEdgeObject, GraphFormat, GraphObject};
        use crate::object::FromObject;

        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0)); // truly overlaps a
        let c = region2("c", (100.0, 110.0), (100.0, 110.0)); // truly disjoint from both

        let fabricated = region2("stale", (6.0, 7.0), (6.0, 7.0));
        let obj = GraphObject {
            json_graph: GraphFormat::NodeLink,
            dimension: 2,
            nodes: vec![a, b, c],
            edges: vec![
                GraphEdgeObject { source: "a".to_string(), target: "b".to_string(), intersect: fabricated.clone() },
                GraphEdgeObject { source: "b".to_string(), target: "c".to_string(), intersect: fabricated.clone() },
                GraphEdgeObject { source: "a".to_string(), target: "c".to_string(), intersect: fabricated },
            ],
        };

        let graph = RegionIntersectionGraph::from_object(obj).unwrap();
        let results = EnumerateByNxGraph::compute(&graph);

        // the claimed triangle and the two fabricated pairs don't survive
        // verification; only the genuinely overlapping a-b pair does.
        assert_eq!(results.len(), 1);
        let (_, members) = &results[0];
        let mut ids: Vec<&str> = members.iter().map(|r| r.id()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_same_size_cliques_ordered_lexicographically_by_parent_ids() {
        // four mutually-overlapping regions: 6 pairs (size 2), then 4 triples
        // (size 3), then 1 quadruple (size 4). Within each size, results must
        // come out in lexicographic order of their sorted member ids.
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (0.0, 10.0), (0.0, 10.0));
        let c = region2("c", (0.0, 10.0), (0.0, 10.0));
        let d = region2("d", (0.0, 10.0), (0.0, 10.0));
        let graph = build_graph(&[a, b, c, d]);

        let results = EnumerateByNxGraph::compute(&graph);
        let sizes: Vec<usize> = results.iter().map(|(_, members)| members.len()).collect();
        let mut sorted_sizes = sizes.clone();
        sorted_sizes.sort();
        assert_eq!(sizes, sorted_sizes, "results must be non-decreasing in clique size");

        let mut start = 0;
        while start < results.len() {
            let size = results[start].1.len();
            let mut end = start;
            while end < results.len() && results[end].1.len() == size {
                end += 1;
            }
            let keys: Vec<Vec<String>> = results[start..end]
                .iter()
                .map(|(_, members)| {
                    let mut ids: Vec<String> = members.iter().map(|r| r.id().to_string()).collect();
                    ids.sort();
                    ids
                })
                .collect();
            let mut sorted_keys = keys.clone();
            sorted_keys.sort();
            assert_eq!(keys, sorted_keys, "same-size cliques must be lexicographic by sorted parent ids");
            start = end;
        }
    }

    #[test]
    fn test_srq_restricted_to_target() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));
        let c = region2("c", (100.0, 110.0), (100.0, 110.0));
        let d = region2("d", (102.0, 112.0), (102.0, 112.0));
        let graph = build_graph(&[a, b, c, d]);

        let results = SRQEnumByNxGraph::compute(&graph, "a");
        assert_eq!(results.len(), 1);
        assert!(results[0].1.iter().any(|r| r.id() == "a"));
    }

    #[test]
    fn test_mrq_restricted_to_subset() {
        let a = region2("a", (0.0, 10.0), (0.0, 10.0));
        let b = region2("b", (5.0, 15.0), (5.0, 15.0));
        let c = region2("c", (2.0, 8.0), (2.0, 8.0));
        let graph = build_graph(&[a, b, c]);

        let results = MRQEnumByNxGraph::compute(&graph, &["a", "b"]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.len(), 2);
    }
}
