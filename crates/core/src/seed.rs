//! Runtime seed derivation for unseeded environments and tools.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static RUNTIME_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Entropy-derived seed for callers that did not supply one. Reseeding via
/// `reset(seed = ...)` remains the only reproducibility path; this exists so
/// unseeded instances diverge from each other.
pub fn runtime_seed() -> u64 {
    let now_nanos =
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0_u128, |duration| duration.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = RUNTIME_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(17)
        ^ counter.rotate_left(7);

    mix_seed(entropy)
}

pub fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
