//! Sparse integer-coordinate index
//!
//! Maps `[i32; N]` keys to values. Absent entries read as "nothing stored".
//! Bounds grow on insert and are never shrunk on removal, so they are only
//! good for sizing sweeps, not for containment tests.

use std::collections::HashMap;

/// Sparse N-dimensional matrix keyed by integer coordinates
#[derive(Clone, Debug)]
pub struct SparseMatrix<const N: usize, T> {
    data: HashMap<[i32; N], T>,
    bounds: Option<([i32; N], [i32; N])>,
}

/// Region grid: (x, z)
pub type SparseMatrix2D<T> = SparseMatrix<2, T>;
/// Cell index inside a region: (x, y, z)
pub type SparseMatrix3D<T> = SparseMatrix<3, T>;

impl<const N: usize, T> SparseMatrix<N, T> {
    /// Create an empty matrix
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            bounds: None,
        }
    }

    /// Value stored at `key`
    pub fn get(&self, key: [i32; N]) -> Option<&T> {
        self.data.get(&key)
    }

    /// Mutable value stored at `key`
    pub fn get_mut(&mut self, key: [i32; N]) -> Option<&mut T> {
        self.data.get_mut(&key)
    }

    /// Whether anything is stored at `key`
    pub fn contains(&self, key: [i32; N]) -> bool {
        self.data.contains_key(&key)
    }

    /// Store `value` at `key`, returning the previous value
    pub fn insert(&mut self, key: [i32; N], value: T) -> Option<T> {
        self.grow_bounds(key);
        self.data.insert(key, value)
    }

    /// Remove and return the value at `key`
    pub fn remove(&mut self, key: [i32; N]) -> Option<T> {
        self.data.remove(&key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Per-axis minimum over every key ever inserted
    pub fn min(&self) -> Option<[i32; N]> {
        self.bounds.map(|(min, _)| min)
    }

    /// Per-axis maximum over every key ever inserted
    pub fn max(&self) -> Option<[i32; N]> {
        self.bounds.map(|(_, max)| max)
    }

    /// Stored values, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.values()
    }

    /// Stored keys sorted ascending, for callers that need a stable sweep order
    pub fn sorted_keys(&self) -> Vec<[i32; N]> {
        let mut keys: Vec<_> = self.data.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    fn grow_bounds(&mut self, key: [i32; N]) {
        match &mut self.bounds {
            Some((min, max)) => {
                for axis in 0..N {
                    min[axis] = min[axis].min(key[axis]);
                    max[axis] = max[axis].max(key[axis]);
                }
            }
            None => self.bounds = Some((key, key)),
        }
    }
}

impl<const N: usize, T: Default + Clone> SparseMatrix<N, T> {
    /// Value at `key`, or the default value when nothing is stored
    pub fn get_or_default(&self, key: [i32; N]) -> T {
        self.data.get(&key).cloned().unwrap_or_default()
    }
}

impl<const N: usize, T: Default + PartialEq> SparseMatrix<N, T> {
    /// Store `value` at `key`; storing the default value clears the entry
    pub fn set(&mut self, key: [i32; N], value: T) {
        if value == T::default() {
            self.data.remove(&key);
        } else {
            self.insert(key, value);
        }
    }
}

impl<const N: usize, T> Default for SparseMatrix<N, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent() {
        let m: SparseMatrix2D<u32> = SparseMatrix::new();
        assert!(m.get([3, 4]).is_none());
        assert_eq!(m.get_or_default([3, 4]), 0);
        assert!(m.is_empty());
        assert!(m.min().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let mut m: SparseMatrix3D<u32> = SparseMatrix::new();
        m.set([1, 2, 3], 7);
        assert_eq!(m.get([1, 2, 3]), Some(&7));
        assert_eq!(m.get_or_default([1, 2, 3]), 7);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_set_default_removes() {
        let mut m: SparseMatrix2D<u32> = SparseMatrix::new();
        m.set([0, 0], 5);
        m.set([0, 0], 0);
        assert!(!m.contains([0, 0]));
        assert!(m.is_empty());

        // Setting default on an empty slot stores nothing
        m.set([9, 9], 0);
        assert!(m.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut m: SparseMatrix2D<&str> = SparseMatrix::new();
        m.insert([2, -1], "a");
        assert_eq!(m.remove([2, -1]), Some("a"));
        assert_eq!(m.remove([2, -1]), None);
    }

    #[test]
    fn test_bounds_grow_but_never_shrink() {
        let mut m: SparseMatrix3D<u8> = SparseMatrix::new();
        m.insert([1, 5, 2], 1);
        m.insert([-3, 7, 0], 1);
        m.insert([4, 0, 9], 1);
        assert_eq!(m.min(), Some([-3, 0, 0]));
        assert_eq!(m.max(), Some([4, 7, 9]));

        m.remove([-3, 7, 0]);
        assert_eq!(m.min(), Some([-3, 0, 0]));
        assert_eq!(m.max(), Some([4, 7, 9]));
    }

    #[test]
    fn test_values_cover_all_entries() {
        let mut m: SparseMatrix2D<i32> = SparseMatrix::new();
        for x in 0..4 {
            for z in 0..3 {
                m.insert([x, z], x * 10 + z);
            }
        }
        let mut values: Vec<_> = m.values().copied().collect();
        values.sort();
        assert_eq!(values.len(), 12);
        assert_eq!(values[0], 0);
        assert_eq!(values[11], 32);
    }

    #[test]
    fn test_sorted_keys() {
        let mut m: SparseMatrix2D<u8> = SparseMatrix::new();
        m.insert([1, 0], 1);
        m.insert([0, 1], 1);
        m.insert([0, 0], 1);
        assert_eq!(m.sorted_keys(), vec![[0, 0], [0, 1], [1, 0]]);
    }
}
