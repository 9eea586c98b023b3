//! Global configuration for sweep and overlap semantics.
//!
//! Follows the teacher crate's `config.rs` pattern exactly: process-global
//! `AtomicBool` toggles read with `Ordering::Acquire` in hot paths and set
//! once at startup (or between test cases) with `Ordering::Release`. The
//! atomic load costs nothing next to the sweep work it gates, the same
//! tradeoff the teacher makes for its zero-length-interval toggle.

use std::sync::atomic::{AtomicBool, Ordering};

/// Whether touching endpoints count as an overlap.
///
/// Default `false`: `Interval::overlaps` and the sweep's equal-`when`
/// tie-break both treat touching intervals as non-overlapping (End fires
/// before Begin at the same position). See SPEC_FULL.md's resolution of the
/// "touching" open question.
static TOUCHING_IS_OVERLAP: AtomicBool = AtomicBool::new(false);

/// Whether `Region::intersect` without an explicit `Linkage` records
/// `Linkage::Reference` provenance by default.
static DEFAULT_LINKAGE_ON: AtomicBool = AtomicBool::new(true);

/// Enable or disable touching-as-overlap semantics globally.
#[inline]
pub fn set_touching_is_overlap(enabled: bool) {
    TOUCHING_IS_OVERLAP.store(enabled, Ordering::Release);
}

/// Whether touching endpoints currently count as an overlap.
#[inline]
pub fn touching_is_overlap() -> bool {
    TOUCHING_IS_OVERLAP.load(Ordering::Acquire)
}

/// Enable or disable default reference-linkage on `intersect`/`union`.
#[inline]
pub fn set_default_linkage(enabled: bool) {
    DEFAULT_LINKAGE_ON.store(enabled, Ordering::Release);
}

/// Whether `intersect`/`union` record reference-linkage provenance by default.
#[inline]
pub fn default_linkage() -> bool {
    DEFAULT_LINKAGE_ON.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial(touching_config)]
    fn test_default_strict_touching() {
        set_touching_is_overlap(false);
        assert!(!touching_is_overlap());
    }

    #[test]
    #[serial_test::serial(touching_config)]
    fn test_toggle_touching() {
        set_touching_is_overlap(true);
        assert!(touching_is_overlap());
        set_touching_is_overlap(false); // reset for other tests
    }

    #[test]
    fn test_default_linkage_on() {
        set_default_linkage(true);
        assert!(default_linkage());
    }
}
