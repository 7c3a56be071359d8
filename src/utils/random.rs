use rand::seq::index;
use rand::Rng;

/// Tolerance used for boundary ties and quality comparisons
pub const EPSILON: f64 = 1e-6;

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Uniform real in [low, high)
pub fn rand_real_in_range<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    rng.gen_range(low..high)
}

/// Uniform unsigned in [0, high], inclusive
pub fn rand_unsigned_in_range<R: Rng + ?Sized>(rng: &mut R, high: usize) -> usize {
    rng.gen_range(0..=high)
}

/// Random angle in radians drawn uniformly over [0, max_degrees)
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R, max_degrees: f64) -> f64 {
    degrees_to_radians(rand_real_in_range(rng, 0.0, max_degrees))
}

pub fn really_close(first: f64, second: f64) -> bool {
    (first - second).abs() < EPSILON
}

/// Draw `min(count, len)` distinct indices from `0..len` in random order
///
/// Backed by `rand::seq::index::sample` (Floyd's algorithm or a partial
/// shuffle), so the number of draws is bounded by `count`.
pub fn sample_distinct<R: Rng + ?Sized>(rng: &mut R, len: usize, count: usize) -> Vec<usize> {
    let amount = count.min(len);
    index::sample(rng, len, amount).into_vec()
}
