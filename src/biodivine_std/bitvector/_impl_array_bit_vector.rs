use crate::biodivine_std::bitvector::{write_digits, ArrayBitVector, BitVector};
use std::fmt::{Debug, Display, Formatter};

/* bitvector::BitVector does not implement Eq, but equality of the values is total. */
impl Eq for ArrayBitVector {}

impl ArrayBitVector {
    fn check_access(&self, index: usize) {
        if index >= self.len {
            panic!(
                "Accessing element {} in a BitVector of length {}.",
                index, self.len
            );
        }
    }

    /// Number of indices which are set in both vectors.
    pub fn intersection_size(&self, other: &ArrayBitVector) -> usize {
        self.values.intersection(&other.values).len()
    }

    /// Number of indices which are set in at least one of the vectors.
    pub fn union_size(&self, other: &ArrayBitVector) -> usize {
        self.values.union(&other.values).len()
    }
}

impl BitVector for ArrayBitVector {
    fn empty(len: usize) -> Self {
        ArrayBitVector {
            len,
            values: bitvector::BitVector::new(len),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> bool {
        self.check_access(index);
        self.values.contains(index)
    }

    fn set(&mut self, index: usize, value: bool) {
        self.check_access(index);
        if value {
            self.values.insert(index);
        } else {
            self.values.remove(index);
        }
    }

    fn ones(&self) -> Vec<usize> {
        self.values.iter().collect()
    }

    fn hamming_distance(&self, other: &Self) -> usize {
        self.union_size(other) - self.intersection_size(other)
    }
}

impl Display for ArrayBitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_digits(self, f)
    }
}

impl Debug for ArrayBitVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArrayBitVector({:?})", self.ones())
    }
}

impl From<Vec<bool>> for ArrayBitVector {
    fn from(values: Vec<bool>) -> Self {
        let mut result = ArrayBitVector::empty(values.len());
        for i in values.iter().enumerate().filter(|(_, v)| **v).map(|(i, _)| i) {
            result.set(i, true);
        }
        result
    }
}
