use rand::Rng;

/// A base value and the symmetric half-width of the noise drawn around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub base: f64,
    pub variance: f64,
}

impl Spread {
    pub const fn new(base: f64, variance: f64) -> Self {
        Self { base, variance }
    }
}

/// `round(base + U)` with `U ~ Uniform[-variance, +variance]`.
pub fn jitter_int<R: Rng>(rng: &mut R, base: f64, variance: f64) -> i64 {
    (base + offset(rng, variance)).round() as i64
}

/// Same draw as [`jitter_int`], clamped at zero for values that count things.
pub fn jitter_count<R: Rng>(rng: &mut R, base: f64, variance: f64) -> u64 {
    jitter_int(rng, base, variance).max(0) as u64
}

pub fn jitter_float<R: Rng>(rng: &mut R, base: f64, variance: f64, decimals: u32) -> f64 {
    round_to(base + offset(rng, variance), decimals)
}

pub fn sample_count<R: Rng>(rng: &mut R, spread: Spread) -> u64 {
    jitter_count(rng, spread.base, spread.variance)
}

pub fn sample_float<R: Rng>(rng: &mut R, spread: Spread, decimals: u32) -> f64 {
    jitter_float(rng, spread.base, spread.variance, decimals)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `numerator / denominator`, or 0 when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Base for a count derived as a fraction of a parent count.
pub fn share_of(parent: u64, fraction: f64) -> f64 {
    (parent as f64 * fraction).floor()
}

fn offset<R: Rng>(rng: &mut R, variance: f64) -> f64 {
    if variance <= 0.0 {
        return 0.0;
    }
    rng.random_range(-variance..=variance)
}
