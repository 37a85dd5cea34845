//! Fixed-length sequences of Boolean values. In this crate, they represent network states
//! (`BitVector58`, small and `Copy`) and rows of parent-adjacency matrices (`ArrayBitVector`,
//! without a length limit).
//!
//! ```rust
//! use bn_datagen::biodivine_std::bitvector::{BitVector58, BitVector};
//! let mut state = BitVector58::empty(4);
//! state.set(1, true);
//! assert_eq!(vec![false, true, false, false], state.values());
//! assert_eq!(vec![1], state.ones());
//! assert_eq!(state, BitVector58::from(vec![false, true, false, false]));
//! // Values are displayed as digits, first variable first.
//! assert_eq!("0100", state.to_string());
//! ```

use std::fmt::{Display, Formatter};

mod _impl_array_bit_vector;
mod _impl_bit_vector_58;

/// `BitVector` is a collection of boolean values of a fixed length.
pub trait BitVector: Clone + Eq + Display + From<Vec<bool>> {
    /// The largest length this implementation can represent.
    fn max_length() -> usize {
        usize::MAX
    }

    /// Create a new `BitVector` of the given length with all values unset. Panics if the
    /// length exceeds `max_length`.
    fn empty(len: usize) -> Self;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> bool;

    fn set(&mut self, index: usize, value: bool);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values, in index order.
    fn values(&self) -> Vec<bool> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }

    /// Indices of the values which are set.
    fn ones(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| self.get(*i)).collect()
    }

    /// The number of indices where this vector and `other` differ.
    ///
    /// Both vectors must have the same length.
    fn hamming_distance(&self, other: &Self) -> usize {
        (0..self.len())
            .filter(|i| self.get(*i) != other.get(*i))
            .count()
    }
}

/// **(internal)** Shared `Display` of all `BitVector`s: one `0`/`1` digit per value.
fn write_digits<B: BitVector>(bits: &B, f: &mut Formatter<'_>) -> std::fmt::Result {
    for value in bits.values() {
        write!(f, "{}", u8::from(value))?;
    }
    Ok(())
}

/// A `BitVector` backed by the `bitvector` crate, used for rows of adjacency matrices.
#[derive(Clone, PartialEq)]
pub struct ArrayBitVector {
    len: usize,
    values: bitvector::BitVector,
}

/// A `BitVector` implementation that uses `u64` as the underlying representation and
/// can therefore hold only up-to 58 values (remaining 6 bits store the vector length).
///
/// `BitVector58` is also `Copy` and `Hash`, which makes it the representation of network
/// states: they are copied on every simulation step and stored in visited-state maps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitVector58(u64);
