use std::fmt;

const DEFAULT_CAPACITY: usize = 53;
const HASH_PREFIX_LEN: usize = 100;
const HASH_BASE: i64 = 31;

/// Chained-bucket hash map over string keys.
///
/// The bucket array is fixed at construction and never rehashed: lookups stay
/// O(1 + chain length) and degrade toward O(n) once the entry count exceeds a
/// small multiple of the capacity. That bound is acceptable for the key
/// counts this engine handles (tens to low hundreds of questions or quizzes).
pub struct KeyedTable<V> {
    buckets: Vec<Vec<(String, V)>>,
    len: usize,
}

impl<V> KeyedTable<V> {
    /// Creates a table with the default capacity of 53 buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table with a fixed number of buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "bucket capacity must be non-zero");
        Self {
            buckets: (0..capacity).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    /// Number of entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets; fixed for the lifetime of the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Polynomial rolling hash over at most the first 100 characters,
    /// reduced modulo the capacity at each step.
    fn bucket_index(&self, key: &str) -> usize {
        let capacity = self.buckets.len() as i64;
        let mut total: i64 = 0;
        for c in key.chars().take(HASH_PREFIX_LEN) {
            let value = c as i64 - 96;
            total = (total * HASH_BASE + value) % capacity;
        }
        // total is in (-capacity, capacity), so the absolute value is in range
        total.unsigned_abs() as usize
    }

    /// Inserts or overwrites the value for `key`.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let index = self.bucket_index(&key);
        let bucket = &mut self.buckets[index];
        if let Some(entry) = bucket.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            bucket.push((key, value));
            self.len += 1;
        }
    }

    /// Returns the value for `key`, or `None` if absent. Never fails.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` if present; returns whether an entry was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        if let Some(position) = bucket.iter().position(|(k, _)| k == key) {
            bucket.remove(position);
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Removes every entry; the bucket capacity is kept.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Keys in bucket-then-insertion order (not globally sorted).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, _)| k.as_str()))
    }

    /// Values in bucket-then-insertion order (not globally sorted).
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(_, v)| v))
    }
}

impl<V> Default for KeyedTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for KeyedTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedTable")
            .field("len", &self.len)
            .field("capacity", &self.buckets.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
