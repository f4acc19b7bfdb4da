//! A fixed-arity compound-key hash table: keys are rows of `K` 32-bit ids,
//! concatenated into `K*4` raw bytes. Used to deduplicate rows of ids during
//! grouping ([`crate::categorical::Categorical::find_all`]), `unique`, and
//! the set operations in [`crate::set_ops`].
//!
//! Keys are compared with a plain byte-slice equality (`memcmp`), never a
//! per-field hook, so the bucket layout stays trivially byte-comparable.

const MAX_LOAD: f32 = 0.75;
const FNV_INIT: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

#[inline]
fn fnv_hash(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_INIT, |h, b| (h ^ (*b as u64)).wrapping_mul(FNV_PRIME))
}

/// Double-hashed probe sequence: a quadratic step combined with a linear
/// step, matching the probing strategy of the teacher crate's on-disk map.
#[inline]
fn probe(hash: u64, pos: u64, capacity: u64) -> u64 {
    let c1 = 65537 % capacity;
    let c2 = 16411 % capacity;
    let quad = (hash + ((c1 * (1 % capacity)) % capacity) + ((c2 * (1 % capacity)) % capacity))
        % capacity;
    let lin = (hash % capacity + pos % capacity) % capacity;
    (quad + lin) % capacity
}

#[inline]
fn smallest_pow2_at_least(n: usize) -> usize {
    let mut cap = 8usize;
    while cap < n {
        cap *= 2;
    }
    cap
}

/// A hash table whose keys are fixed-width rows of raw bytes (`arity * 4`
/// bytes each, i.e. `arity` 32-bit ids) and whose values are `u32` payloads
/// (typically a combination/group id).
pub struct RowHashMap {
    arity: usize,
    capacity: usize,
    keys: Vec<u8>,
    payload: Vec<u32>,
    occupied: Vec<bool>,
    len: usize,
}

impl RowHashMap {
    pub fn new(arity: usize) -> Self {
        Self::with_capacity(arity, 8)
    }

    pub fn with_capacity(arity: usize, capacity: usize) -> Self {
        let arity = arity.max(1);
        let capacity = smallest_pow2_at_least(capacity.max(1));
        Self {
            arity,
            capacity,
            keys: vec![0u8; capacity * arity * 4],
            payload: vec![0u32; capacity],
            occupied: vec![false; capacity],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn key_width(&self) -> usize {
        self.arity * 4
    }

    fn slot_key(&self, slot: usize) -> &[u8] {
        let w = self.key_width();
        &self.keys[slot * w..slot * w + w]
    }

    /// Finds the slot index holding `key`, if present.
    fn find_slot(&self, key: &[u8]) -> Option<usize> {
        debug_assert_eq!(key.len(), self.key_width());
        let hash = fnv_hash(key);
        let cap = self.capacity as u64;
        for i in 0..self.capacity as u64 {
            let slot = probe(hash, i, cap) as usize;
            if !self.occupied[slot] {
                return None;
            }
            if self.slot_key(slot) == key {
                return Some(slot);
            }
        }
        None
    }

    pub fn get(&self, key: &[u8]) -> Option<u32> {
        self.find_slot(key).map(|s| self.payload[s])
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find_slot(key).is_some()
    }

    /// Returns the existing payload for `key`, or inserts `value_if_new` and
    /// returns `(value_if_new, true)`.
    pub fn get_or_insert(&mut self, key: &[u8], value_if_new: u32) -> (u32, bool) {
        if self.needs_grow() {
            self.grow();
        }
        if let Some(slot) = self.find_slot(key) {
            return (self.payload[slot], false);
        }
        let slot = self.insert_new(key, value_if_new);
        self.len += 1;
        (self.payload[slot], true)
    }

    fn insert_new(&mut self, key: &[u8], value: u32) -> usize {
        let hash = fnv_hash(key);
        let cap = self.capacity as u64;
        for i in 0..self.capacity as u64 {
            let slot = probe(hash, i, cap) as usize;
            if !self.occupied[slot] {
                let w = self.key_width();
                self.keys[slot * w..slot * w + w].copy_from_slice(key);
                self.payload[slot] = value;
                self.occupied[slot] = true;
                return slot;
            }
        }
        unreachable!("probe sequence must find a free slot below the load factor");
    }

    fn needs_grow(&self) -> bool {
        (self.len + 1) as f32 / self.capacity as f32 > MAX_LOAD
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let old = std::mem::replace(self, Self::with_capacity(self.arity, new_capacity));
        let w = old.key_width();
        for slot in 0..old.capacity {
            if old.occupied[slot] {
                let key = &old.keys[slot * w..slot * w + w];
                let slot2 = self.insert_new(key, old.payload[slot]);
                let _ = slot2;
                self.len += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        let arity = self.arity;
        *self = Self::with_capacity(arity, 8);
    }
}

/// Packs a row of 32-bit ids into its byte-key representation.
pub fn pack_row(ids: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(ids.len() * 4);
    for id in ids {
        out.extend_from_slice(&id.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_find() {
        let mut map = RowHashMap::new(2);
        let k1 = pack_row(&[1, 2]);
        let k2 = pack_row(&[1, 3]);

        let (id1, new1) = map.get_or_insert(&k1, 0);
        assert!(new1);
        assert_eq!(id1, 0);

        let (id1_again, new_again) = map.get_or_insert(&k1, 99);
        assert!(!new_again);
        assert_eq!(id1_again, 0);

        let (id2, new2) = map.get_or_insert(&k2, 1);
        assert!(new2);
        assert_eq!(id2, 1);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&k1), Some(0));
        assert_eq!(map.get(&k2), Some(1));
    }

    #[test]
    fn grows_past_load_factor() {
        let mut map = RowHashMap::new(1);
        for i in 0..500u32 {
            let key = pack_row(&[i]);
            let (id, is_new) = map.get_or_insert(&key, i);
            assert!(is_new);
            assert_eq!(id, i);
        }
        assert_eq!(map.len(), 500);
        for i in 0..500u32 {
            let key = pack_row(&[i]);
            assert_eq!(map.get(&key), Some(i));
        }
    }

    #[test]
    fn distinct_rows_never_collide_as_equal() {
        let mut map = RowHashMap::new(3);
        let rows: Vec<Vec<u32>> = (0..100).map(|i| vec![i, i * 7, i % 3]).collect();
        for (idx, row) in rows.iter().enumerate() {
            let key = pack_row(row);
            let (id, is_new) = map.get_or_insert(&key, idx as u32);
            assert!(is_new);
            assert_eq!(id, idx as u32);
        }
    }
}
