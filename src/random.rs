//! Injected randomness for random Region/Interval sampling.
//!
//! The spec requires that the core "never import a concrete RNG": random
//! sampling takes an injected function-object of signature
//! `(size, lower, upper) -> Vec<f64>`. The teacher crate reaches for `rand`
//! directly in its `generate` command; here that same dependency backs a
//! small factory of closures (`Randoms`) instead, so callers who want a
//! default generator don't need to depend on `rand` themselves, while
//! callers with their own source of randomness can supply any `RandomFn`.

use rand::distributions::{Distribution, Uniform};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// A function-object that draws `size` samples from `[lower, upper)`.
///
/// Mirrors the original system's `RandomFn = Callable[[size, lower, upper],
/// NDArray]`. Boxed so `Region`/`RegionSet` random-sampling methods can take
/// `&mut dyn RandomFn` without a generic parameter threading through every
/// call site.
pub trait RandomFn: FnMut(usize, f64, f64) -> Vec<f64> {}
impl<F: FnMut(usize, f64, f64) -> Vec<f64>> RandomFn for F {}

/// Factory for the stock random-number generators.
///
/// Parallels the teacher's direct use of `rand` in generation commands, and
/// the original system's `Randoms` factory class (`uniform`, `triangular`).
pub struct Randoms;

impl Randoms {
    /// A generator drawing uniformly from `[lower, upper)`, seeded from
    /// the thread-local entropy source.
    pub fn uniform() -> impl FnMut(usize, f64, f64) -> Vec<f64> {
        let mut rng = SmallRng::from_entropy();
        move |size, lower, upper| {
            let dist = Uniform::new(lower, upper);
            (0..size).map(|_| dist.sample(&mut rng)).collect()
        }
    }

    /// A generator reproducible across runs, seeded explicitly.
    pub fn uniform_seeded(seed: u64) -> impl FnMut(usize, f64, f64) -> Vec<f64> {
        let mut rng = SmallRng::seed_from_u64(seed);
        move |size, lower, upper| {
            let dist = Uniform::new(lower, upper);
            (0..size).map(|_| dist.sample(&mut rng)).collect()
        }
    }

    /// A generator drawing from the triangular distribution over
    /// `[lower, upper]`, peaking at `lower + (upper - lower) * mode`.
    pub fn triangular(mode: f64) -> impl FnMut(usize, f64, f64) -> Vec<f64> {
        let mut rng = SmallRng::from_entropy();
        move |size, lower, upper| {
            let peak = lower + (upper - lower) * mode;
            (0..size)
                .map(|_| sample_triangular(&mut rng, lower, peak, upper))
                .collect()
        }
    }
}

fn sample_triangular(rng: &mut SmallRng, left: f64, peak: f64, right: f64) -> f64 {
    use rand::Rng;
    let u: f64 = rng.gen();
    let fc = if (peak - left).abs() < f64::EPSILON {
        0.0
    } else {
        (peak - left) / (right - left)
    };
    if u < fc {
        left + (u * (right - left) * (peak - left)).sqrt()
    } else {
        right - ((1.0 - u) * (right - left) * (right - peak)).sqrt()
    }
}
