//! Region intersection graph: nodes are regions, edges carry overlap state.
//!
//! Generalizes the original system's `NxGraph` (a `networkx.Graph` wrapper
//! implementing `RIGraph`/`IOable`) onto `petgraph::graph::UnGraph`, since
//! the teacher crate has no graph dependency of its own and `petgraph` is
//! the graph crate used elsewhere across the retrieved pack. An edge starts
//! `Tentative` the first time a sweep reports an overlap along some
//! dimension and accumulates a count; `finalize_overlap` promotes it to
//! `Final` once every dimension has confirmed (or drops it, mirroring the
//! original's `finalize_overlap` removing edges that never reached
//! `dimension`).

use crate::error::{GritError, Result};
use crate::events::{ObserverState, Subscriber, SweepEvent};
use crate::object::{FromObject, ToObject};
use crate::region::{Linkage, Region};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An edge's overlap confirmation state.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeState {
    /// Confirmed overlapping on `overlaps` of the region's dimensions so far.
    Tentative { overlaps: u32 },
    /// Confirmed overlapping on every dimension; carries the intersection.
    Final { intersect: Region },
}

/// A graph of regions with intersection edges.
pub struct RegionIntersectionGraph {
    dimension: usize,
    graph: UnGraph<Region, EdgeState>,
    index_by_id: HashMap<String, NodeIndex>,
}

impl RegionIntersectionGraph {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            graph: UnGraph::new_undirected(),
            index_by_id: HashMap::new(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All region nodes.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.graph.node_weights()
    }

    /// All edges whose state is currently `Final`, as `(region, region,
    /// intersect)` triples.
    pub fn overlaps(&self) -> Vec<(&Region, &Region, &Region)> {
        self.graph
            .edge_references()
            .filter_map(|e| match e.weight() {
                EdgeState::Final { intersect } => {
                    let a = &self.graph[e.source()];
                    let b = &self.graph[e.target()];
                    Some((a, b, intersect))
                }
                EdgeState::Tentative { .. } => None,
            })
            .collect()
    }

    /// Insert a region node if not already present; returns its index.
    pub fn put_region(&mut self, region: Region) -> NodeIndex {
        if let Some(&idx) = self.index_by_id.get(region.id()) {
            return idx;
        }
        let id = region.id().to_string();
        let idx = self.graph.add_node(region);
        self.index_by_id.insert(id, idx);
        idx
    }

    fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    /// Record a tentative overlap between two already-present regions,
    /// incrementing the edge's count. Fails (`InvariantError`) if the count
    /// would exceed `dimension`.
    pub fn put_temporary_overlap(&mut self, a_id: &str, b_id: &str) -> Result<()> {
        let a = self
            .node_index(a_id)
            .ok_or_else(|| GritError::Lookup(a_id.to_string()))?;
        let b = self
            .node_index(b_id)
            .ok_or_else(|| GritError::Lookup(b_id.to_string()))?;

        match self.graph.find_edge(a, b) {
            Some(edge) => {
                let weight = &mut self.graph[edge];
                match weight {
                    EdgeState::Tentative { overlaps } => {
                        if *overlaps + 1 > self.dimension as u32 {
                            return Err(GritError::Invariant(format!(
                                "overlap count exceeded dimension for edge {a_id}-{b_id}"
                            )));
                        }
                        *overlaps += 1;
                    }
                    EdgeState::Final { .. } => {}
                }
            }
            None => {
                self.graph.add_edge(a, b, EdgeState::Tentative { overlaps: 1 });
            }
        }
        Ok(())
    }

    /// Promote a tentative edge to `Final` if its count equals `dimension`,
    /// otherwise remove it. No-op if the edge doesn't exist or is already
    /// `Final`.
    pub fn finalize_overlap(&mut self, a_id: &str, b_id: &str) -> Result<()> {
        let a = self
            .node_index(a_id)
            .ok_or_else(|| GritError::Lookup(a_id.to_string()))?;
        let b = self
            .node_index(b_id)
            .ok_or_else(|| GritError::Lookup(b_id.to_string()))?;

        let Some(edge) = self.graph.find_edge(a, b) else {
            return Ok(());
        };

        let overlaps = match &self.graph[edge] {
            EdgeState::Tentative { overlaps } => *overlaps,
            EdgeState::Final { .. } => return Ok(()),
        };

        if overlaps as usize == self.dimension {
            let ra = self.graph[a].clone();
            let rb = self.graph[b].clone();
            let intersect = ra
                .intersect(&rb, Linkage::Reference)
                .ok_or_else(|| GritError::Invariant(format!("edge {a_id}-{b_id} has no true intersection")))?;
            self.graph[edge] = EdgeState::Final { intersect };
        } else {
            self.graph.remove_edge(edge);
        }
        Ok(())
    }

    /// Borrow the underlying `petgraph` graph, e.g. for enumeration.
    pub fn inner(&self) -> &UnGraph<Region, EdgeState> {
        &self.graph
    }

    /// Serialize to the §6 JSON object shape in the given schema.
    pub fn to_object_as(&self, mode: GraphFormat) -> GraphObject {
        let nodes: Vec<Region> = self.graph.node_weights().cloned().collect();
        let edges: Vec<GraphEdgeObject> = self
            .graph
            .edge_references()
            .filter_map(|e| match e.weight() {
                EdgeState::Final { intersect } => Some(GraphEdgeObject {
                    source: self.graph[e.source()].id().to_string(),
                    target: self.graph[e.target()].id().to_string(),
                    intersect: intersect.clone(),
                }),
                EdgeState::Tentative { .. } => None,
            })
            .collect();

        GraphObject {
            json_graph: mode,
            dimension: self.dimension,
            nodes,
            edges,
        }
    }
}

impl ToObject for RegionIntersectionGraph {
    type Object = GraphObject;

    fn to_object(&self) -> GraphObject {
        self.to_object_as(GraphFormat::NodeLink)
    }
}

impl FromObject for RegionIntersectionGraph {
    type Object = GraphObject;

    fn from_object(obj: GraphObject) -> Result<Self> {
        let mut g = Self::new(obj.dimension);
        for region in obj.nodes {
            g.put_region(region);
        }
        for edge in obj.edges {
            let a = g
                .node_index(&edge.source)
                .ok_or_else(|| GritError::Format(format!("unknown node id '{}'", edge.source)))?;
            let b = g
                .node_index(&edge.target)
                .ok_or_else(|| GritError::Format(format!("unknown node id '{}'", edge.target)))?;
            g.graph.add_edge(a, b, EdgeState::Final { intersect: edge.intersect });
        }
        Ok(g)
    }
}

/// Which JSON schema `to_object`/`from_object` use, mirroring the original
/// system's `json_graph: node_link | adjacency` choice. Only `NodeLink` is
/// currently serialized; `Adjacency` is accepted for forward compatibility
/// with graphs produced elsewhere in the pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphFormat {
    NodeLink,
    Adjacency,
}

#[derive(Serialize, Deserialize)]
pub struct GraphEdgeObject {
    pub source: String,
    pub target: String,
    pub intersect: Region,
}

#[derive(Serialize, Deserialize)]
pub struct GraphObject {
    pub json_graph: GraphFormat,
    pub dimension: usize,
    pub nodes: Vec<Region>,
    pub edges: Vec<GraphEdgeObject>,
}

/// A `Subscriber` that builds a `RegionIntersectionGraph` from a sweep's
/// broadcast events.
pub struct GraphBuilder {
    pub graph: RegionIntersectionGraph,
    state: ObserverState,
}

impl GraphBuilder {
    pub fn new(dimension: usize) -> Self {
        Self {
            graph: RegionIntersectionGraph::new(dimension),
            state: ObserverState::Created,
        }
    }
}

impl Subscriber for GraphBuilder {
    fn on_event(&mut self, event: &SweepEvent) {
        match event {
            SweepEvent::Init => self.state = ObserverState::Subscribed,
            SweepEvent::Begin(region) => {
                self.state = ObserverState::Receiving;
                self.graph.put_region(region.clone());
            }
            SweepEvent::End(_) => {}
            SweepEvent::Intersect(a, b) => {
                self.graph.put_region(a.clone());
                self.graph.put_region(b.clone());
                self.graph
                    .put_temporary_overlap(a.id(), b.id())
                    .expect("sweep never reports more overlaps than dimensions");
            }
            SweepEvent::Finalize(a, b) => {
                self.graph
                    .finalize_overlap(a.id(), b.id())
                    .expect("finalize targets an existing tentative edge");
            }
            SweepEvent::Done => self.state = ObserverState::Done,
        }
    }

    fn state(&self) -> ObserverState {
        self.state
    }
}
