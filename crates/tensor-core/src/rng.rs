// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Process-wide random source for tensor initialization.
//!
//! The generator is global but access-controlled: it is seeded exactly once,
//! lazily from OS entropy on first use, unless a caller fixes the seed first
//! with [`seed_global_rng`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, OnceLock, PoisonError};

static GLOBAL_RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

/// Seeds the global RNG with `seed`.
///
/// Returns `false` without touching the generator if it was already
/// initialized, either by a previous call or by a randomized allocation.
pub fn seed_global_rng(seed: u64) -> bool {
    let mut installed = false;
    GLOBAL_RNG.get_or_init(|| {
        installed = true;
        tracing::debug!(seed, "global tensor RNG seeded explicitly");
        Mutex::new(StdRng::seed_from_u64(seed))
    });
    installed
}

/// Returns `true` once the global RNG has been seeded.
pub fn global_rng_initialized() -> bool {
    GLOBAL_RNG.get().is_some()
}

/// Runs `f` with exclusive access to the global RNG, seeding it on first use.
pub(crate) fn with_global_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    let rng = GLOBAL_RNG.get_or_init(|| {
        tracing::debug!("global tensor RNG seeded from entropy");
        Mutex::new(StdRng::from_entropy())
    });
    // A panic while holding the lock cannot leave the RNG in a bad state.
    let mut guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}
