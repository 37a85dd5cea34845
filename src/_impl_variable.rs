use crate::Variable;
use std::fmt::{Display, Error, Formatter};

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.name)
    }
}

impl Variable {
    /// Human-readable name of this variable.
    pub fn get_name(&self) -> &String {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use crate::{RegulatoryGraph, VariableId};

    #[test]
    fn basic_variable_test() {
        let rg = RegulatoryGraph::new(vec!["X0".to_string(), "X1".to_string()]);
        let x1 = rg.find_variable("X1").unwrap();
        assert_eq!(VariableId::from(1), x1);
        assert_eq!(1, x1.to_index());
        let x1 = rg.get_variable(x1);
        assert_eq!("X1", x1.to_string().as_str());
        assert_eq!("X1", x1.get_name());
    }
}
