use crate::TruthTable;
use std::fmt::{Display, Formatter};

/// Largest supported function arity. Tables of larger functions would not fit in memory
/// comfortably and no network in the experiment comes close.
pub const MAX_ARITY: usize = 20;

impl TruthTable {
    /// Create a new table from explicit `outputs`, one per row.
    ///
    /// Fails unless there are exactly `2^arity` outputs.
    pub fn new(arity: usize, outputs: Vec<bool>) -> Result<TruthTable, String> {
        if arity > MAX_ARITY {
            return Err(format!(
                "Function arity {} exceeds the supported maximum of {}.",
                arity, MAX_ARITY
            ));
        }
        if outputs.len() != 1 << arity {
            return Err(format!(
                "Truth table of arity {} needs {} rows, but {} were given.",
                arity,
                1usize << arity,
                outputs.len()
            ));
        }
        Ok(TruthTable { arity, outputs })
    }

    /// Tabulate a function given as a closure over the input values.
    pub fn from_fn<F>(arity: usize, function: F) -> Result<TruthTable, String>
    where
        F: Fn(&[bool]) -> bool,
    {
        if arity > MAX_ARITY {
            return Err(format!(
                "Function arity {} exceeds the supported maximum of {}.",
                arity, MAX_ARITY
            ));
        }
        let mut inputs = vec![false; arity];
        let outputs = (0..(1usize << arity))
            .map(|row| {
                for (i, input) in inputs.iter_mut().enumerate() {
                    *input = (row >> i) & 1 == 1;
                }
                function(&inputs)
            })
            .collect();
        TruthTable::new(arity, outputs)
    }

    /// A table of arity one that copies its input.
    pub fn identity() -> TruthTable {
        TruthTable {
            arity: 1,
            outputs: vec![false, true],
        }
    }

    /// A table of arity one that negates its input.
    pub fn negation() -> TruthTable {
        TruthTable {
            arity: 1,
            outputs: vec![true, false],
        }
    }

    /// A table of arity one which ignores its input and always returns `value`.
    pub fn constant(value: bool) -> TruthTable {
        TruthTable {
            arity: 1,
            outputs: vec![value, value],
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The number of rows, i.e. `2^arity`.
    pub fn num_rows(&self) -> usize {
        self.outputs.len()
    }

    /// Output of the given row.
    pub fn row(&self, row: usize) -> bool {
        self.outputs[row]
    }

    /// All outputs ordered by row index.
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// Compute the row index of the given input values.
    pub fn row_index(inputs: &[bool]) -> usize {
        inputs
            .iter()
            .enumerate()
            .fold(0, |acc, (i, value)| acc | (usize::from(*value) << i))
    }

    /// Input values of the given row.
    pub fn row_inputs(&self, row: usize) -> Vec<bool> {
        (0..self.arity).map(|i| (row >> i) & 1 == 1).collect()
    }

    /// Evaluate the function for the given input values.
    pub fn evaluate(&self, inputs: &[bool]) -> bool {
        debug_assert_eq!(inputs.len(), self.arity);
        self.outputs[Self::row_index(inputs)]
    }

    /// True if the output does not depend on any input.
    pub fn is_constant(&self) -> bool {
        self.outputs.iter().all(|it| *it == self.outputs[0])
    }

    /// True if flipping input `input` changes the output in at least one row.
    pub fn is_essential(&self, input: usize) -> bool {
        let bit = 1 << input;
        (0..self.num_rows())
            .filter(|row| row & bit == 0)
            .any(|row| self.outputs[row] != self.outputs[row | bit])
    }
}

impl Display for TruthTable {
    /// Compact form: outputs in row order, e.g. `0110` for a two-input xor.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for value in &self.outputs {
            write!(f, "{}", u8::from(*value))?;
        }
        Ok(())
    }
}
