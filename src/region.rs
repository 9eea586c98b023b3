//! d-dimensional axis-aligned hyperrectangle ("Region") algebra.
//!
//! Generalizes `Interval` to a fixed-dimension tuple of intervals, carrying
//! a string id (UUIDv4 unless supplied) and optional provenance recording
//! which source regions a derived region's `intersect`/`union` came from.
//! Provenance stores parent ids only -- not owned references -- so the
//! parent graph stays an acyclic, cheaply-serializable id DAG (see
//! SPEC_FULL.md §9 design notes).

use crate::config;
use crate::error::{GritError, Result};
use crate::interval::Interval;
use crate::object::{FromObject, ToObject};
use crate::random::RandomFn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// How an `intersect`/`union` result should record its parent provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Do not record provenance.
    None,
    /// Record the direct two (or more) parents.
    Reference,
    /// Record the union of the parents' own parent sets (flattened,
    /// deduplicated), for chaining derived regions without unbounded growth
    /// of indirection.
    Aggregate,
}

/// Which operation produced a derived region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvenanceMode {
    Intersect,
    Union,
}

/// Back-reference record for a derived region: which parents, and by what
/// operation, produced it. Parents are represented as ids, not owned
/// references (see module docs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub mode: ProvenanceMode,
    pub parents: Vec<String>,
}

/// An axis-aligned d-dimensional hyperrectangle.
#[derive(Debug, Clone)]
pub struct Region {
    id: String,
    intervals: Vec<Interval>,
    provenance: Option<Provenance>,
}

impl Region {
    /// Construct a new Region from its per-dimension intervals, generating
    /// a UUIDv4 id. Fails if `intervals` is empty (`dimension >= 1`).
    pub fn new(intervals: Vec<Interval>) -> Result<Self> {
        Self::with_id(Uuid::new_v4().to_string(), intervals)
    }

    /// Construct a new Region with an explicit id.
    pub fn with_id(id: impl Into<String>, intervals: Vec<Interval>) -> Result<Self> {
        if intervals.is_empty() {
            return Err(GritError::Shape(
                "region must have dimension >= 1".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            intervals,
            provenance: None,
        })
    }

    /// Construct a Region from parallel `lower`/`upper` slices.
    pub fn from_bounds(lower: &[f64], upper: &[f64]) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(GritError::Shape(
                "lower and upper must have the same dimension".to_string(),
            ));
        }
        let intervals = lower
            .iter()
            .zip(upper.iter())
            .map(|(&l, &u)| Interval::try_new(l, u))
            .collect::<Result<Vec<_>>>()?;
        Self::new(intervals)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    #[inline]
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// The interval along dimension `k`.
    #[inline]
    pub fn interval(&self, k: usize) -> &Interval {
        &self.intervals[k]
    }

    #[inline]
    pub fn lower(&self, k: usize) -> f64 {
        self.intervals[k].lower
    }

    #[inline]
    pub fn upper(&self, k: usize) -> f64 {
        self.intervals[k].upper
    }

    /// Whether the point `p` (one coordinate per dimension) lies within
    /// this region.
    pub fn contains(&self, p: &[f64], inc_lower: bool, inc_upper: bool) -> bool {
        p.len() == self.dimension()
            && self
                .intervals
                .iter()
                .zip(p.iter())
                .all(|(iv, &v)| iv.contains(v, inc_lower, inc_upper))
    }

    /// Whether this region fully encloses `other` (same dimension required).
    pub fn encloses(&self, other: &Region) -> bool {
        self.dimension() == other.dimension()
            && self
                .intervals
                .iter()
                .zip(other.intervals.iter())
                .all(|(a, b)| a.encloses(b))
    }

    /// Whether this region overlaps `other`: conjunction of per-dimension
    /// `Interval::overlaps` across every dimension.
    pub fn overlaps(&self, other: &Region) -> bool {
        self.dimension() == other.dimension()
            && self
                .intervals
                .iter()
                .zip(other.intervals.iter())
                .all(|(a, b)| a.overlaps(b))
    }

    /// The intersection of this region and `other`, or `None` if any
    /// dimension is disjoint. `linkage` controls the resulting provenance.
    pub fn intersect(&self, other: &Region, linkage: Linkage) -> Option<Region> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let intervals: Option<Vec<Interval>> = self
            .intervals
            .iter()
            .zip(other.intervals.iter())
            .map(|(a, b)| a.intersect(b))
            .collect();
        let intervals = intervals?;

        let provenance = match linkage {
            Linkage::None => None,
            Linkage::Reference => Some(Provenance {
                mode: ProvenanceMode::Intersect,
                parents: vec![self.id.clone(), other.id.clone()],
            }),
            Linkage::Aggregate => {
                let mut parents: Vec<String> = Vec::new();
                let mut seen = HashSet::new();
                for r in [self, other] {
                    let ids: Vec<&String> = match &r.provenance {
                        Some(p) => p.parents.iter().collect(),
                        None => vec![&r.id],
                    };
                    for id in ids {
                        if seen.insert(id.clone()) {
                            parents.push(id.clone());
                        }
                    }
                }
                Some(Provenance {
                    mode: ProvenanceMode::Intersect,
                    parents,
                })
            }
        };

        Some(Region {
            id: Uuid::new_v4().to_string(),
            intervals,
            provenance,
        })
    }

    /// The intersection of this region and `other` using the process-global
    /// default linkage (`config::default_linkage`).
    pub fn intersect_default(&self, other: &Region) -> Option<Region> {
        let linkage = if config::default_linkage() {
            Linkage::Reference
        } else {
            Linkage::None
        };
        self.intersect(other, linkage)
    }

    /// The bounding union of this region and `other` (smallest enclosing
    /// region, regardless of overlap). Always dimension-checked.
    pub fn union(&self, other: &Region) -> Option<Region> {
        if self.dimension() != other.dimension() {
            return None;
        }
        let intervals = self
            .intervals
            .iter()
            .zip(other.intervals.iter())
            .map(|(a, b)| a.union(b))
            .collect();

        Some(Region {
            id: Uuid::new_v4().to_string(),
            intervals,
            provenance: Some(Provenance {
                mode: ProvenanceMode::Union,
                parents: vec![self.id.clone(), other.id.clone()],
            }),
        })
    }

    /// n-ary fold of `intersect` over `regions`. Returns `None` if the set
    /// is empty or any pair along the fold is disjoint. With `linked`,
    /// provenance parents are the ids of the *full* input list (not just
    /// the final folding pair).
    pub fn from_intersect(regions: &[&Region], linked: bool) -> Option<Region> {
        if regions.is_empty() {
            return None;
        }
        if regions.len() == 1 {
            return Some(regions[0].clone());
        }

        let mut acc = regions[0].intersect(regions[1], Linkage::None)?;
        for r in &regions[2..] {
            acc = acc.intersect(r, Linkage::None)?;
        }

        if linked {
            acc.provenance = Some(Provenance {
                mode: ProvenanceMode::Intersect,
                parents: regions.iter().map(|r| r.id.clone()).collect(),
            });
        }

        Some(acc)
    }

    /// The bounding union over `regions`. Returns `None` if empty.
    pub fn from_union(regions: &[&Region]) -> Option<Region> {
        if regions.is_empty() {
            return None;
        }
        if regions.len() == 1 {
            return Some(regions[0].clone());
        }

        let mut lower = regions[0].intervals.iter().map(|iv| iv.lower).collect::<Vec<_>>();
        let mut upper = regions[0].intervals.iter().map(|iv| iv.upper).collect::<Vec<_>>();

        for r in &regions[1..] {
            if r.dimension() != lower.len() {
                return None;
            }
            for (k, iv) in r.intervals.iter().enumerate() {
                lower[k] = lower[k].min(iv.lower);
                upper[k] = upper[k].max(iv.upper);
            }
        }

        let intervals = lower
            .into_iter()
            .zip(upper)
            .map(|(l, u)| Interval { lower: l, upper: u })
            .collect();

        Some(Region {
            id: Uuid::new_v4().to_string(),
            intervals,
            provenance: Some(Provenance {
                mode: ProvenanceMode::Union,
                parents: regions.iter().map(|r| r.id.clone()).collect(),
            }),
        })
    }

    /// Overwrite this region's provenance to `Intersect` with the given
    /// parent id list, used by `RegionCycleSweep` to canonicalize a derived
    /// region's parent set after growing it by one more member.
    pub(crate) fn set_provenance_parents(&mut self, parents: Vec<String>) {
        self.provenance = Some(Provenance {
            mode: ProvenanceMode::Intersect,
            parents,
        });
    }

    /// Project this region onto a subset of dimensions, preserving order.
    pub fn project(&self, dims: &[usize]) -> Result<Region> {
        let intervals: Result<Vec<Interval>> = dims
            .iter()
            .map(|&k| {
                self.intervals.get(k).copied().ok_or_else(|| {
                    GritError::Shape(format!("dimension {k} out of range for projection"))
                })
            })
            .collect();
        Region::new(intervals?)
    }

    /// Draw `size` random points within this region.
    pub fn random_points(&self, size: usize, rand: &mut dyn RandomFn) -> Vec<Vec<f64>> {
        let per_dim: Vec<Vec<f64>> = self
            .intervals
            .iter()
            .map(|iv| iv.random_values(size, rand))
            .collect();

        (0..size)
            .map(|i| per_dim.iter().map(|dim| dim[i]).collect())
            .collect()
    }

    /// Draw `size` random sub-regions within this region, each dimension's
    /// extent scaled by a fraction drawn from `sizepc_range` (a Region whose
    /// dimension matches `self`, expressing a `[min_pct, max_pct]` per
    /// dimension, mirroring the original system's `bounds.random_regions`
    /// sizing contract).
    pub fn random_regions(
        &self,
        size: usize,
        sizepc_range: &Region,
        rand: &mut dyn RandomFn,
    ) -> Result<Vec<Region>> {
        if sizepc_range.dimension() != self.dimension() {
            return Err(GritError::Shape(
                "sizepc_range dimension must match region dimension".to_string(),
            ));
        }

        let mut out = Vec::with_capacity(size);
        for _ in 0..size {
            let mut intervals = Vec::with_capacity(self.dimension());
            for (iv, pct) in self.intervals.iter().zip(sizepc_range.intervals.iter()) {
                let frac = rand(1, pct.lower, pct.upper)[0];
                let span = iv.length() * frac;
                let max_start = (iv.length() - span).max(0.0);
                let start = iv.lower + rand(1, 0.0, max_start.max(f64::EPSILON))[0].min(max_start);
                intervals.push(Interval::try_new(start, start + span)?);
            }
            out.push(Region::new(intervals)?);
        }
        Ok(out)
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Region {}

impl std::hash::Hash for Region {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Region({}, [", self.id)?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{iv}")?;
        }
        write!(f, "])")
    }
}

// --- JSON object surface (§6) -----------------------------------------

#[derive(Serialize, Deserialize)]
pub struct RegionObject {
    pub id: String,
    pub dimension: usize,
    pub intervals: Vec<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intersect: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union: Option<Vec<String>>,
}

impl ToObject for Region {
    type Object = RegionObject;

    fn to_object(&self) -> RegionObject {
        let (intersect, union) = match &self.provenance {
            Some(Provenance {
                mode: ProvenanceMode::Intersect,
                parents,
            }) => (Some(parents.clone()), None),
            Some(Provenance {
                mode: ProvenanceMode::Union,
                parents,
            }) => (None, Some(parents.clone())),
            None => (None, None),
        };
        RegionObject {
            id: self.id.clone(),
            dimension: self.dimension(),
            intervals: self.intervals.clone(),
            intersect,
            union,
        }
    }
}

impl FromObject for Region {
    type Object = RegionObject;

    fn from_object(obj: RegionObject) -> Result<Self> {
        if obj.intervals.len() != obj.dimension {
            return Err(GritError::Format(format!(
                "region '{}' declares dimension {} but has {} intervals",
                obj.id,
                obj.dimension,
                obj.intervals.len()
            )));
        }
        let provenance = match (obj.intersect, obj.union) {
            (Some(parents), None) => Some(Provenance {
                mode: ProvenanceMode::Intersect,
                parents,
            }),
            (None, Some(parents)) => Some(Provenance {
                mode: ProvenanceMode::Union,
                parents,
            }),
            (None, None) => None,
            (Some(_), Some(_)) => {
                return Err(GritError::Format("region cannot carry both intersect and union provenance".to_string()))
            }
        };
        Ok(Region {
            id: obj.id,
            intervals: obj.intervals,
            provenance,
        })
    }
}

impl Serialize for Region {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_object().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let obj = RegionObject::deserialize(deserializer)?;
        Region::from_object(obj).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(lower: &[f64], upper: &[f64]) -> Region {
        Region::from_bounds(lower, upper).unwrap()
    }

    #[test]
    fn test_region_overlap_2d() {
        let a = region(&[0.0, 0.0], &[10.0, 10.0]);
        let b = region(&[5.0, 5.0], &[15.0, 15.0]);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_region_disjoint_2d() {
        let a = region(&[0.0, 0.0], &[1.0, 1.0]);
        let b = region(&[2.0, 2.0], &[3.0, 3.0]);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_region_intersect() {
        let a = region(&[0.0, 0.0], &[10.0, 10.0]);
        let b = region(&[5.0, 5.0], &[15.0, 15.0]);
        let ab = a.intersect(&b, Linkage::Reference).unwrap();
        assert_eq!(ab.interval(0), &Interval::new(5.0, 10.0));
        assert_eq!(ab.interval(1), &Interval::new(5.0, 10.0));
        let prov = ab.provenance().unwrap();
        assert_eq!(prov.mode, ProvenanceMode::Intersect);
        assert_eq!(prov.parents.len(), 2);
    }

    #[test]
    fn test_region_from_intersect_mutual() {
        let a = region(&[0.0, 0.0], &[4.0, 4.0]);
        let b = region(&[2.0, 2.0], &[6.0, 6.0]);
        let c = region(&[3.0, 3.0], &[5.0, 5.0]);

        let triple = Region::from_intersect(&[&a, &b, &c], true).unwrap();
        assert_eq!(triple.interval(0), &Interval::new(3.0, 4.0));
        assert_eq!(triple.provenance().unwrap().parents.len(), 3);
    }

    #[test]
    fn test_region_from_intersect_disjoint_fails() {
        let a = region(&[0.0, 0.0], &[1.0, 1.0]);
        let b = region(&[5.0, 5.0], &[6.0, 6.0]);
        assert!(Region::from_intersect(&[&a, &b], true).is_none());
    }

    #[test]
    fn test_region_encloses() {
        let outer = region(&[0.0, 0.0], &[100.0, 100.0]);
        let inner = region(&[10.0, 10.0], &[20.0, 20.0]);
        assert!(outer.encloses(&inner));
    }

    #[test]
    fn test_region_json_roundtrip() {
        let a = region(&[0.0, 0.0], &[10.0, 10.0]);
        let b = region(&[5.0, 5.0], &[15.0, 15.0]);
        let ab = a.intersect(&b, Linkage::Reference).unwrap();

        let json = serde_json::to_string(&ab).unwrap();
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), ab.id());
        assert_eq!(back.provenance().unwrap().parents, vec![a.id().to_string(), b.id().to_string()]);
    }

    #[test]
    fn test_region_project() {
        let a = region(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        let p = a.project(&[2, 0]).unwrap();
        assert_eq!(p.dimension(), 2);
        assert_eq!(p.interval(0), &Interval::new(3.0, 6.0));
        assert_eq!(p.interval(1), &Interval::new(1.0, 4.0));
    }

    #[test]
    fn test_region_dimension_zero_rejected() {
        assert!(Region::new(vec![]).is_err());
    }
}
