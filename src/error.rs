//! Error types for the region intersection toolkit.
//!
//! Generalizes the teacher crate's `BedError` (`thiserror`-derived, one
//! variant per failure family) to the four error kinds named by the
//! specification: `ShapeError`, `LookupError`, `FormatError` and
//! `InvariantError`. `EmptyIntersect` is deliberately not a variant here --
//! the spec treats it as an absence, not an error (see `Region::intersect`
//! and `Region::from_intersect`, which return `Option`).

use thiserror::Error;

/// Errors produced by the region intersection toolkit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GritError {
    /// Dimension mismatch, `lower > upper`, or a region not enclosed by
    /// declared bounds. Fatal at construction.
    #[error("shape error: {0}")]
    Shape(String),

    /// Unknown region id in `subset`, `SRQ`, or `MRQ`. Fatal to the query.
    #[error("lookup error: unknown region id '{0}'")]
    Lookup(String),

    /// JSON missing required fields, unsupported `json_graph` mode, or an
    /// unresolved back-reference. Fatal to the load.
    #[error("format error: {0}")]
    Format(String),

    /// Internal assertion failure (e.g. sweep's `overlaps > d`, active-set
    /// underflow). Indicates a bug rather than bad input.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, GritError>;
