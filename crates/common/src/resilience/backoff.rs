//! Backoff strategies for calculating retry delays

use std::time::Duration;

use rand::Rng;

/// Doublings are capped so the multiplier never overflows.
const MAX_DOUBLINGS: u32 = 10;

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Always zero
    None,
    /// Exponential backoff: `min(base * 2^(attempt-1), max)`, optionally
    /// spread uniformly by `±jitter` (a fraction in `[0, 1]`)
    Exponential { base: Duration, max: Duration, jitter: f64 },
}

impl BackoffStrategy {
    pub const fn none() -> Self {
        Self::None
    }

    /// Exponential backoff. `jitter` is clamped to `[0, 1]`; NaN is treated
    /// as zero.
    pub fn exponential(base: Duration, max: Duration, jitter: f64) -> Self {
        let jitter = if jitter.is_nan() { 0.0 } else { jitter.clamp(0.0, 1.0) };
        Self::Exponential { base, max, jitter }
    }

    /// Delay before the retry following failed attempt `attempt` (1-based;
    /// 0 is treated as 1).
    pub fn next_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Exponential { base, max, jitter } => {
                let delay = capped_exponential(*base, *max, attempt);
                if *jitter > 0.0 {
                    apply_jitter(delay, *jitter)
                } else {
                    delay
                }
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::None
    }
}

fn capped_exponential(base: Duration, max: Duration, attempt: u32) -> Duration {
    let exponent = attempt.max(1).saturating_sub(1).min(MAX_DOUBLINGS);
    base.saturating_mul(1_u32 << exponent).min(max)
}

fn apply_jitter(delay: Duration, jitter: f64) -> Duration {
    let secs = delay.as_secs_f64();
    let low = (secs * (1.0 - jitter)).max(0.0);
    let high = secs * (1.0 + jitter);
    if high <= low {
        return delay;
    }
    let drawn = rand::thread_rng().gen_range(low..=high);
    Duration::try_from_secs_f64(drawn.max(0.0)).unwrap_or(delay)
}
