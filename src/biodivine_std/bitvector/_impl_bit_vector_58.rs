use crate::biodivine_std::bitvector::{write_digits, BitVector, BitVector58};
use std::fmt::{Debug, Display, Formatter};

const LENGTH_SHIFT: u64 = 58;
const VALUE_MASK: u64 = (1 << LENGTH_SHIFT) - 1;

impl BitVector58 {
    fn check_access(&self, index: usize) {
        if index >= self.len() {
            panic!(
                "Accessing value {} of a state with {} variables.",
                index,
                self.len()
            );
        }
    }

    /// Build a vector of length `len` whose `i`-th value is the `i`-th bit of `mask`.
    ///
    /// Bits of `mask` above `len` are ignored.
    pub fn from_mask(len: usize, mask: u64) -> BitVector58 {
        let mut result = BitVector58::empty(len);
        let len_mask = if len == 0 { 0 } else { u64::MAX >> (64 - len) };
        result.0 |= mask & len_mask & VALUE_MASK;
        result
    }

    /// The values of this vector as an integer mask (value `i` is bit `i`).
    pub fn mask(&self) -> u64 {
        self.0 & VALUE_MASK
    }
}

impl BitVector for BitVector58 {
    fn max_length() -> usize {
        58
    }

    fn empty(len: usize) -> Self {
        if len > 58 {
            panic!("States support only up-to 58 variables, {} requested.", len);
        }
        BitVector58((len as u64) << LENGTH_SHIFT)
    }

    fn len(&self) -> usize {
        (self.0 >> LENGTH_SHIFT) as usize
    }

    fn get(&self, index: usize) -> bool {
        self.check_access(index);
        self.0 & (1u64 << index) != 0
    }

    fn set(&mut self, index: usize, value: bool) {
        self.check_access(index);
        if value {
            self.0 |= 1u64 << index;
        } else {
            self.0 &= !(1u64 << index);
        }
    }

    fn ones(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| (self.0 >> i) & 1 == 1).collect()
    }

    fn hamming_distance(&self, other: &Self) -> usize {
        (self.mask() ^ other.mask()).count_ones() as usize
    }
}

impl Display for BitVector58 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_digits(self, f)
    }
}

impl Debug for BitVector58 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "State({})", self)
    }
}

impl From<Vec<bool>> for BitVector58 {
    fn from(values: Vec<bool>) -> Self {
        let mask = values
            .iter()
            .enumerate()
            .filter(|(_, value)| **value)
            .fold(0u64, |mask, (i, _)| mask | (1u64 << i));
        let mut result = BitVector58::empty(values.len());
        result.0 |= mask;
        result
    }
}
