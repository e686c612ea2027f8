//! Hash table keyed by strings
//!
//! Open addressing with linear probing. Deleted entries leave a tombstone so
//! that lookup chains stay intact; tombstones are dropped when the table is
//! rebuilt.
use crate::error::RuntimeError;
use crate::obj::{value_equals, Obj, Value};
use rustc_hash::FxHasher;
use std::hash::Hasher;

const MIN_CAPACITY: usize = 16;
/// Requested capacities are hints. Larger tables are reached by growing.
const MAX_INITIAL_CAPACITY: usize = 1 << 20;

#[derive(Debug, Clone)]
enum Bucket {
    Empty,
    Tombstone,
    Full(Entry),
}

#[derive(Debug, Clone)]
struct Entry {
    key: Obj,
    value: Value,
    hash: u64,
}

#[derive(Debug, Clone)]
pub struct Hash {
    buckets: Vec<Bucket>,
    size: usize,
    tombstones: usize,
    /// Bumped on every modification
    generation: u64,
}

impl Default for Hash {
    fn default() -> Self {
        Hash::new()
    }
}

fn key_hash(key: &str) -> u64 {
    let mut state = FxHasher::default();
    state.write(key.as_bytes());
    state.finish()
}

/// Smallest capacity which holds `n` entries without a rebuild, up to
/// `MAX_INITIAL_CAPACITY`
fn capacity_for(n: usize) -> usize {
    let needed = n.checked_mul(3).map_or(usize::MAX, |x| x / 2 + x % 2);
    let mut capacity = MIN_CAPACITY;
    while needed > capacity && capacity < MAX_INITIAL_CAPACITY {
        capacity *= 2;
    }
    capacity
}

impl Hash {
    pub fn new() -> Hash {
        Hash::with_capacity(0)
    }

    pub fn with_capacity(n: usize) -> Hash {
        Hash {
            buckets: vec![Bucket::Empty; capacity_for(n)],
            size: 0,
            tombstones: 0,
            generation: 0,
        }
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of allocated buckets
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store `value` for `key`. Returns the previous value if the key
    /// existed. Only strings are keys.
    pub fn store(&mut self, key: Obj, value: Value) -> Result<Option<Value>, RuntimeError> {
        let Some(k) = key.as_str() else {
            return Err(RuntimeError::Conversion(format!(
                "{} to a hash key (keys must be strings)",
                key.kind()
            )));
        };
        let hash = key_hash(k);
        self.generation += 1;
        if let Some(i) = self.find_index(k, hash) {
            if let Bucket::Full(entry) = &mut self.buckets[i] {
                return Ok(Some(std::mem::replace(&mut entry.value, value)));
            }
        }
        if (self.size + self.tombstones + 1) * 3 > self.capacity() * 2 {
            let capacity = if (self.size + 1) * 3 > self.capacity() * 2 {
                self.capacity() * 2
            } else {
                self.capacity()
            };
            self.rebuild(capacity);
        }
        self.insert_new(Entry { key, value, hash });
        Ok(None)
    }

    /// Insert an entry whose key is known to be absent
    fn insert_new(&mut self, entry: Entry) {
        let mask = self.capacity() - 1;
        let mut i = entry.hash as usize & mask;
        loop {
            match &self.buckets[i] {
                Bucket::Full(_) => i = (i + 1) & mask,
                Bucket::Tombstone => {
                    self.tombstones -= 1;
                    break;
                }
                Bucket::Empty => break,
            }
        }
        self.buckets[i] = Bucket::Full(entry);
        self.size += 1;
    }

    fn rebuild(&mut self, capacity: usize) {
        log::trace!("rebuilding hash: {} -> {}", self.capacity(), capacity);
        let old = std::mem::replace(&mut self.buckets, vec![Bucket::Empty; capacity]);
        self.size = 0;
        self.tombstones = 0;
        for bucket in old {
            if let Bucket::Full(entry) = bucket {
                self.insert_new(entry);
            }
        }
    }

    fn find_index(&self, key: &str, hash: u64) -> Option<usize> {
        let mask = self.capacity() - 1;
        let mut i = hash as usize & mask;
        loop {
            match &self.buckets[i] {
                Bucket::Empty => return None,
                Bucket::Full(entry) if entry.hash == hash && entry.key.as_str() == Some(key) => {
                    return Some(i)
                }
                _ => i = (i + 1) & mask,
            }
        }
    }

    /// Other kinds of keys are never found
    fn find_entry(&self, key: &Obj) -> Option<&Entry> {
        let key = key.as_str()?;
        let i = self.find_index(key, key_hash(key))?;
        match &self.buckets[i] {
            Bucket::Full(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns the value for `key`. `Some(None)` is the sentinel.
    pub fn fetch(&self, key: &Obj) -> Option<&Value> {
        self.find_entry(key).map(|e| &e.value)
    }

    pub fn has_key(&self, key: &Obj) -> bool {
        self.find_entry(key).is_some()
    }

    /// Remove the entry and hand its value to the caller
    pub fn delete(&mut self, key: &Obj) -> Option<Value> {
        let key = key.as_str()?;
        let i = self.find_index(key, key_hash(key))?;
        self.generation += 1;
        match std::mem::replace(&mut self.buckets[i], Bucket::Tombstone) {
            Bucket::Full(entry) => {
                self.size -= 1;
                self.tombstones += 1;
                Some(entry.value)
            }
            _ => panic!("[BUG] found bucket is not full"),
        }
    }

    /// Remove all the entries. The capacity is kept.
    pub fn clear(&mut self) {
        self.generation += 1;
        for bucket in self.buckets.iter_mut() {
            *bucket = Bucket::Empty;
        }
        self.size = 0;
        self.tombstones = 0;
    }

    pub fn keys(&self) -> Vec<Obj> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Entries in bucket order
    pub fn iter(&self) -> impl Iterator<Item = (&Obj, &Value)> {
        self.buckets.iter().filter_map(|b| match b {
            Bucket::Full(entry) => Some((&entry.key, &entry.value)),
            _ => None,
        })
    }

    /// Returns the entry at or after bucket `from`, with its bucket index
    pub(crate) fn entry_from(&self, from: usize) -> Option<(usize, &Obj, &Value)> {
        self.buckets
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(i, b)| match b {
                Bucket::Full(entry) => Some((i, &entry.key, &entry.value)),
                _ => None,
            })
    }

    /// Same keys with equal values
    pub fn equals(&self, other: &Hash) -> bool {
        self.size == other.size
            && self.iter().all(|(k, v)| match other.fetch(k) {
                Some(ov) => value_equals(v, ov),
                None => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> Obj {
        Obj::string(x)
    }

    fn n(i: i64) -> Obj {
        Obj::string(i.to_string())
    }

    #[test]
    fn test_store_fetch() {
        let mut h = Hash::new();
        h.store(s("foo"), Some(s("bar"))).unwrap();
        h.store(s("foo"), Some(s("bar"))).unwrap();
        assert_eq!(h.size(), 1);
        assert_eq!(h.fetch(&s("foo")).unwrap().as_ref().unwrap().as_str(), Some("bar"));
        assert!(h.fetch(&s("nope")).is_none());
    }

    #[test]
    fn test_sentinel() {
        let mut h = Hash::new();
        h.store(s("nada"), None).unwrap();
        assert!(h.has_key(&s("nada")));
        assert!(matches!(h.fetch(&s("nada")), Some(None)));
        assert_eq!(h.size(), 1);
    }

    #[test]
    fn test_overwrite_releases_old_value() {
        let mut h = Hash::new();
        let old = s("old");
        h.store(s("k"), Some(old.clone())).unwrap();
        assert_eq!(old.refcount(), 2);
        let replaced = h.store(s("k"), Some(s("new"))).unwrap();
        drop(replaced);
        assert_eq!(old.refcount(), 1);
    }

    #[test]
    fn test_delete() {
        let mut h = Hash::new();
        h.store(s("foo"), Some(s("bar"))).unwrap();
        let got = h.delete(&s("foo")).unwrap().unwrap();
        assert_eq!(got.as_str(), Some("bar"));
        assert_eq!(h.size(), 0);
        assert!(h.delete(&s("foo")).is_none());
        assert_eq!(h.size(), 0);
    }

    #[test]
    fn test_store_after_tombstone_does_not_duplicate() {
        let mut h = Hash::new();
        for i in 0..8 {
            h.store(n(i), Some(Obj::integer(i))).unwrap();
        }
        h.delete(&n(3));
        for i in 0..8 {
            h.store(n(i), Some(Obj::integer(i * 10))).unwrap();
        }
        assert_eq!(h.size(), 8);
        assert_eq!(h.keys().len(), 8);
    }

    #[test]
    fn test_grow() {
        let mut h = Hash::new();
        assert_eq!(h.capacity(), 16);
        for i in 0..100 {
            h.store(n(i), None).unwrap();
        }
        assert_eq!(h.size(), 100);
        assert!(h.capacity().is_power_of_two());
        assert!(h.size() * 3 <= h.capacity() * 2);
        for i in 0..100 {
            assert!(h.has_key(&n(i)));
        }
    }

    #[test]
    fn test_with_capacity() {
        assert_eq!(Hash::with_capacity(1).capacity(), 16);
        assert_eq!(Hash::with_capacity(11).capacity(), 32);
        let h = Hash::with_capacity(100);
        assert!(h.capacity() * 2 >= 300);
    }

    #[test]
    fn test_churn_keeps_table_usable() {
        let mut h = Hash::new();
        for i in 0..1000 {
            h.store(n(i), None).unwrap();
            h.delete(&n(i));
        }
        assert!(h.is_empty());
        assert_eq!(h.capacity(), 16);
    }

    #[test]
    fn test_keys_must_be_strings() {
        let mut h = Hash::new();
        let err = h.store(Obj::integer(1), Some(s("one"))).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::Conversion("Integer to a hash key (keys must be strings)".to_string())
        );
        assert!(h.is_empty());
        assert_eq!(h.generation(), 0);
        assert!(!h.has_key(&Obj::integer(1)));
        assert!(h.delete(&Obj::integer(1)).is_none());
    }

    #[test]
    fn test_hash_as_its_own_key() {
        let obj = Obj::hash(Hash::new());
        let cell = obj.as_hash().unwrap();
        assert!(cell.borrow_mut().store(obj.clone(), None).is_err());
        assert!(cell.borrow_mut().delete(&obj).is_none());
        assert!(!cell.borrow().has_key(&obj));
        assert_eq!(obj.refcount(), 1);
    }

    #[test]
    fn test_huge_capacity_is_clamped() {
        assert_eq!(capacity_for(usize::MAX), MAX_INITIAL_CAPACITY);
        assert_eq!(capacity_for(usize::MAX / 2), MAX_INITIAL_CAPACITY);
        let mut h = Hash::with_capacity(usize::MAX);
        assert_eq!(h.capacity(), MAX_INITIAL_CAPACITY);
        h.store(s("a"), None).unwrap();
        assert!(h.has_key(&s("a")));
    }
}
