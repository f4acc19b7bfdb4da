//! Per-instance id allocation. The original design drew label ids and
//! progenitor-tag nonces from a process-wide RNG singleton; each
//! [`crate::categorical::Categorical`] here owns its own seeded generator
//! instead, so there is no hidden global state (see SPEC_FULL.md §9).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// `0` is reserved to mean "no label"; `1` is reserved internally and never
/// handed out as a label id.
const RESERVED_NONE: u32 = 0;
const RESERVED_INTERNAL: u32 = 1;

/// Two random, nonzero, distinct 32-bit nonces identifying a shared id-space
/// lineage. Two [`crate::categorical::Categorical`] instances with equal
/// tags are guaranteed to use the same id for the same label, which allows
/// `append`/`assign`/set-op fast paths to skip label reconciliation
/// entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProgenitorTag {
    pub a: u32,
    pub b: u32,
}

/// Owns the RNG a single `Categorical` uses to mint fresh label ids and
/// progenitor nonces. Seeded from OS entropy at construction.
pub struct IdAllocator {
    rng: StdRng,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Draws a fresh 32-bit id in `[2, u32::MAX]` that is not a member of
    /// any of `excluded`.
    pub fn fresh_id(&mut self, excluded: &[&HashSet<u32>]) -> u32 {
        loop {
            let candidate: u32 = self.rng.random_range(2..=u32::MAX);
            if candidate == RESERVED_NONE || candidate == RESERVED_INTERNAL {
                continue;
            }
            if excluded.iter().any(|set| set.contains(&candidate)) {
                continue;
            }
            return candidate;
        }
    }

    /// Draws a fresh progenitor tag: two nonzero, distinct nonces.
    pub fn fresh_tag(&mut self) -> ProgenitorTag {
        let a: u32 = self.rng.random_range(1..=u32::MAX);
        loop {
            let b: u32 = self.rng.random_range(1..=u32::MAX);
            if b != a {
                return ProgenitorTag { a, b };
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdAllocator").finish_non_exhaustive()
    }
}

impl Clone for IdAllocator {
    /// A clone gets its own freshly-seeded generator, never a forked stream
    /// of the same one, so ids minted afterwards in either instance cannot
    /// correlate unless explicitly reconciled.
    fn clone(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresh_id_avoids_exclusions() {
        let mut alloc = IdAllocator::new();
        let mut used: HashSet<u32> = HashSet::new();
        for _ in 0..1000 {
            let id = alloc.fresh_id(&[&used]);
            assert_ne!(id, 0);
            assert_ne!(id, 1);
            assert!(!used.contains(&id));
            used.insert(id);
        }
    }

    #[test]
    fn fresh_tag_is_nonzero_and_distinct() {
        let mut alloc = IdAllocator::new();
        for _ in 0..1000 {
            let tag = alloc.fresh_tag();
            assert_ne!(tag.a, 0);
            assert_ne!(tag.b, 0);
            assert_ne!(tag.a, tag.b);
        }
    }
}
