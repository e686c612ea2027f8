use crate::obj::{value_equals, Value};

/// Growable array of values
#[derive(Debug, Clone, Default)]
pub struct Vector {
    elems: Vec<Value>,
}

impl Vector {
    pub fn new() -> Vector {
        Vector::default()
    }

    pub fn with_capacity(n: usize) -> Vector {
        Vector {
            elems: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn push(&mut self, value: Value) {
        self.elems.push(value);
    }

    /// Returns the element at `tick`. `Some(None)` is the sentinel.
    pub fn fetch(&self, tick: usize) -> Option<&Value> {
        self.elems.get(tick)
    }

    /// Replace the element at `tick`, filling the gap with sentinels if the
    /// vector is shorter
    pub fn store(&mut self, tick: usize, value: Value) {
        if tick >= self.elems.len() {
            self.elems.resize(tick + 1, None);
        }
        self.elems[tick] = value;
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.elems.pop()
    }

    /// Take the element at `tick`, leaving a sentinel in its place
    pub fn delete(&mut self, tick: usize) -> Option<Value> {
        self.elems.get_mut(tick).map(|slot| slot.take())
    }

    /// Insert at `tick`, shifting the following elements
    pub fn insert(&mut self, tick: usize, value: Value) {
        if tick > self.elems.len() {
            self.elems.resize(tick, None);
        }
        self.elems.insert(tick, value);
    }

    pub fn clear(&mut self) {
        self.elems.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elems.iter()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.elems.clone()
    }

    pub fn equals(&self, other: &Vector) -> bool {
        self.len() == other.len()
            && self
                .elems
                .iter()
                .zip(other.elems.iter())
                .all(|(a, b)| value_equals(a, b))
    }
}

impl From<Vec<Value>> for Vector {
    fn from(elems: Vec<Value>) -> Self {
        Vector { elems }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::Obj;

    fn int(i: i64) -> Value {
        Some(Obj::integer(i))
    }

    #[test]
    fn test_store_grows_with_sentinels() {
        let mut v = Vector::new();
        v.store(2, int(3));
        assert_eq!(v.len(), 3);
        assert!(matches!(v.fetch(0), Some(None)));
        assert!(v.fetch(3).is_none());
    }

    #[test]
    fn test_delete_leaves_sentinel() {
        let mut v = Vector::from(vec![int(1), int(2)]);
        let got = v.delete(0).unwrap();
        assert!(value_equals(&got, &int(1)));
        assert_eq!(v.len(), 2);
        assert!(matches!(v.fetch(0), Some(None)));
        assert!(v.delete(5).is_none());
    }

    #[test]
    fn test_insert_and_pop() {
        let mut v = Vector::from(vec![int(1), int(3)]);
        v.insert(1, int(2));
        v.insert(5, int(9));
        assert_eq!(v.len(), 6);
        assert!(value_equals(&v.pop().unwrap(), &int(9)));
        let expected = Vector::from(vec![int(1), int(2), int(3), None, None]);
        assert!(v.equals(&expected));
    }

    #[test]
    fn test_equals() {
        let a = Vector::from(vec![int(1), Some(Obj::string("x")), None]);
        let mut b = a.clone();
        assert!(a.equals(&b));
        b.push(None);
        assert!(!a.equals(&b));
        b.clear();
        assert!(b.is_empty());
    }
}
