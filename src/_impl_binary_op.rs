use crate::BinaryOp;
use crate::BinaryOp::*;
use std::fmt::{Display, Error, Formatter};

impl BinaryOp {
    /// Apply this operator to two Boolean values.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            And => left && right,
            Or => left || right,
            Xor => left != right,
            Iff => left == right,
            Imp => !left || right,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let symbol = match self {
            And => "&",
            Or => "|",
            Xor => "^",
            Imp => "=>",
            Iff => "<=>",
        };
        write!(f, "{}", symbol)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::BinaryOp;

    #[test]
    fn binary_op_truth_values() {
        let rows = [(false, false), (false, true), (true, false), (true, true)];
        let imp: Vec<bool> = rows.iter().map(|(l, r)| BinaryOp::Imp.apply(*l, *r)).collect();
        assert_eq!(vec![true, true, false, true], imp);
        let iff: Vec<bool> = rows.iter().map(|(l, r)| BinaryOp::Iff.apply(*l, *r)).collect();
        assert_eq!(vec![true, false, false, true], iff);
        assert_eq!("<=>", BinaryOp::Iff.to_string());
    }
}
