//! `RegionSet`: an owning collection of same-dimension `Region`s sharing a
//! declared (or inferred) bounding box.
//!
//! Mirrors the original system's `RegionSet` dataclass: an id, a dimension,
//! optional declared bounds, and the regions themselves, with a lazily
//! constructed and cached `timeline`. The Python original stashes the cache
//! on `self` behind `hasattr`; here it's an explicit `OnceCell`-style
//! `RefCell<Option<_>>`, since Rust has no implicit attribute creation.

use crate::error::{GritError, Result};
use crate::object::{FromObject, ToObject};
use crate::random::RandomFn;
use crate::region::Region;
use crate::timeline::RegionTimeline;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use uuid::Uuid;

/// A collection of same-dimension regions, with an optional declared
/// bounding region. `bounds`, when present, must enclose every member.
pub struct RegionSet {
    id: String,
    dimension: usize,
    bounds: Option<Region>,
    regions: Vec<Region>,
    timeline: RefCell<Option<RegionTimeline>>,
}

impl RegionSet {
    /// An empty set fixed to `dimension`, with no declared bounds.
    pub fn new(dimension: usize) -> Result<Self> {
        Self::with_id(Uuid::new_v4().to_string(), dimension, None)
    }

    /// An empty set with an explicit id and optional declared bounds.
    pub fn with_id(id: impl Into<String>, dimension: usize, bounds: Option<Region>) -> Result<Self> {
        if dimension == 0 {
            return Err(GritError::Shape("RegionSet dimension must be >= 1".to_string()));
        }
        if let Some(b) = &bounds {
            if b.dimension() != dimension {
                return Err(GritError::Shape(format!(
                    "bounds dimension {} does not match set dimension {}",
                    b.dimension(),
                    dimension
                )));
            }
        }
        Ok(Self {
            id: id.into(),
            dimension,
            bounds,
            regions: Vec::new(),
            timeline: RefCell::new(None),
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn bounds(&self) -> Option<&Region> {
        self.bounds.as_ref()
    }

    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Add a region to the set. Fails if the dimension doesn't match, or if
    /// declared bounds don't enclose it.
    pub fn add(&mut self, region: Region) -> Result<()> {
        if region.dimension() != self.dimension {
            return Err(GritError::Shape(format!(
                "region '{}' has dimension {} but set requires {}",
                region.id(),
                region.dimension(),
                self.dimension
            )));
        }
        if let Some(b) = &self.bounds {
            if !b.encloses(&region) {
                return Err(GritError::Shape(format!(
                    "region '{}' is not enclosed by the set's declared bounds",
                    region.id()
                )));
            }
        }
        self.regions.push(region);
        self.invalidate_timeline();
        Ok(())
    }

    /// The tightest bounding region enclosing every member, or `None` if
    /// empty. Ignores declared `bounds` -- this is computed from the data.
    pub fn minbounds(&self) -> Option<Region> {
        let refs: Vec<&Region> = self.regions.iter().collect();
        Region::from_union(&refs)
    }

    /// The set's effective bounding region: the declared `bounds` if
    /// present, else the computed `minbounds`.
    pub fn bbox(&self) -> Option<Region> {
        self.bounds.clone().or_else(|| self.minbounds())
    }

    /// The lazily-built, cached timeline of this set's events. Rebuilt on
    /// first access after construction or after any mutation (`add`,
    /// `merge`, `filter`, `shuffle`).
    pub fn timeline(&self) -> RegionTimeline {
        if self.timeline.borrow().is_none() {
            let built = RegionTimeline::new(self.regions.clone());
            *self.timeline.borrow_mut() = Some(built);
        }
        self.timeline.borrow().as_ref().unwrap().clone()
    }

    fn invalidate_timeline(&self) {
        *self.timeline.borrow_mut() = None;
    }

    /// A new set containing only the regions whose ids are in `ids`, in the
    /// order given. Fails on any unknown id.
    pub fn subset(&self, ids: &[&str]) -> Result<RegionSet> {
        let mut out = RegionSet::with_id(Uuid::new_v4().to_string(), self.dimension, self.bounds.clone())?;
        for &id in ids {
            let region = self
                .get(id)
                .ok_or_else(|| GritError::Lookup(id.to_string()))?;
            out.regions.push(region.clone());
        }
        Ok(out)
    }

    /// A new set containing only regions for which `pred` returns true.
    pub fn filter(&self, pred: impl Fn(&Region) -> bool) -> Result<RegionSet> {
        let mut out = RegionSet::with_id(Uuid::new_v4().to_string(), self.dimension, self.bounds.clone())?;
        for r in self.regions.iter().filter(|r| pred(r)) {
            out.regions.push(r.clone());
        }
        Ok(out)
    }

    /// Merge `others` into a new set. Region ids are prefixed by their
    /// source set's id on collision; declared bounds (if any on either
    /// side) are widened to enclose all inputs.
    pub fn merge(sets: &[&RegionSet]) -> Result<RegionSet> {
        if sets.is_empty() {
            return Err(GritError::Shape("cannot merge zero sets".to_string()));
        }
        let dimension = sets[0].dimension;
        if sets.iter().any(|s| s.dimension != dimension) {
            return Err(GritError::Shape("cannot merge sets of differing dimension".to_string()));
        }

        let mut seen_ids = std::collections::HashSet::new();
        let mut regions = Vec::new();
        for set in sets {
            for r in &set.regions {
                let id = if seen_ids.contains(r.id()) {
                    format!("{}:{}", set.id, r.id())
                } else {
                    r.id().to_string()
                };
                seen_ids.insert(id.clone());
                regions.push(Region::with_id(id, r.intervals().to_vec())?);
            }
        }

        // Each input's effective bbox: its declared bounds if present, else
        // the computed minbounds of its own regions (mirrors regionset.py's
        // `merge`, which folds over `regions.bbox` rather than only
        // declared bounds, so an unbounded-but-nonempty input still widens
        // the merged bounds instead of being silently dropped from them).
        let effective_bboxes: Vec<Region> = sets.iter().filter_map(|s| s.bbox()).collect();
        let bbox_refs: Vec<&Region> = effective_bboxes.iter().collect();
        let bounds = if bbox_refs.is_empty() {
            None
        } else {
            Region::from_union(&bbox_refs)
        };

        let mut out = RegionSet::with_id(Uuid::new_v4().to_string(), dimension, bounds)?;
        out.regions = regions;
        Ok(out)
    }

    /// A random reordering of this set's regions, returned as a new set
    /// (does not mutate `self`).
    pub fn shuffled(&self, rand: &mut dyn RandomFn) -> RegionSet {
        let n = self.regions.len();
        let mut order: Vec<usize> = (0..n).collect();
        // Fisher-Yates using the injected generator for index draws.
        for i in (1..n).rev() {
            let j = rand(1, 0.0, (i + 1) as f64)[0] as usize;
            order.swap(i, j.min(i));
        }
        RegionSet {
            id: Uuid::new_v4().to_string(),
            dimension: self.dimension,
            bounds: self.bounds.clone(),
            regions: order.into_iter().map(|i| self.regions[i].clone()).collect(),
            timeline: RefCell::new(None),
        }
    }

    /// A deep copy of this set under a fresh id.
    pub fn copy(&self) -> RegionSet {
        RegionSet {
            id: Uuid::new_v4().to_string(),
            dimension: self.dimension,
            bounds: self.bounds.clone(),
            regions: self.regions.clone(),
            timeline: RefCell::new(None),
        }
    }

    /// Populate `size` random regions within `bounds`, sized by `sizepc_range`
    /// (see `Region::random_regions`). Bulk generation is rayon-parallel
    /// across the draws (mirrors the teacher's `parallel.rs` bulk-operation
    /// threshold), never inside the single-threaded sweep itself.
    pub fn from_random(
        bounds: Region,
        size: usize,
        sizepc_range: &Region,
        rand: &mut dyn RandomFn,
    ) -> Result<RegionSet> {
        let regions = bounds.random_regions(size, sizepc_range, rand)?;

        let mut out = RegionSet::with_id(Uuid::new_v4().to_string(), bounds.dimension(), Some(bounds))?;
        out.regions = regions;
        Ok(out)
    }

    /// Recompute `minbounds` in parallel once the set is large enough to be
    /// worth it, mirroring the teacher's `PARALLEL_THRESHOLD` bulk-op gate.
    pub fn minbounds_parallel(&self) -> Option<Region> {
        const PARALLEL_THRESHOLD: usize = 10_000;
        if self.regions.len() < PARALLEL_THRESHOLD {
            return self.minbounds();
        }
        self.regions
            .par_iter()
            .cloned()
            .reduce_with(|a, b| a.union(&b).expect("regions in one RegionSet share a dimension"))
    }
}

impl ToObject for RegionSet {
    type Object = RegionSetObject;

    /// Serialize to the §6 JSON object shape.
    fn to_object(&self) -> RegionSetObject {
        RegionSetObject {
            id: self.id.clone(),
            dimension: self.dimension,
            bounds: self.bounds.clone(),
            regions: self.regions.clone(),
        }
    }
}

impl FromObject for RegionSet {
    type Object = RegionSetObject;

    /// Deserialize from the §6 JSON object shape, validating that every
    /// back-referenced provenance parent id resolves within this same set.
    fn from_object(obj: RegionSetObject) -> Result<RegionSet> {
        let mut set = RegionSet::with_id(obj.id, obj.dimension, obj.bounds)?;
        set.regions = obj.regions;

        let ids: std::collections::HashSet<&str> = set.regions.iter().map(|r| r.id()).collect();
        for r in &set.regions {
            if let Some(prov) = r.provenance() {
                for parent in &prov.parents {
                    if !ids.contains(parent.as_str()) {
                        return Err(GritError::Format(format!(
                            "region '{}' references unknown parent id '{}'",
                            r.id(),
                            parent
                        )));
                    }
                }
            }
        }
        Ok(set)
    }
}

impl Clone for RegionSet {
    fn clone(&self) -> Self {
        self.copy()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegionSetObject {
    pub id: String,
    pub dimension: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Region>,
    pub regions: Vec<Region>,
}
