use crate::biodivine_std::bitvector::BitVector;
use crate::{Error, NetworkBounds, State};

impl Default for NetworkBounds {
    /// Bounds of the random network experiment: 5 to 16 variables with at most 3 parents.
    fn default() -> Self {
        NetworkBounds {
            min_vars: 5,
            max_vars: 16,
            max_parents: 3,
        }
    }
}

impl NetworkBounds {
    /// Create new bounds, failing with `Error::Configuration` if they are inconsistent or
    /// exceed what a `State` can represent.
    pub fn new(min_vars: usize, max_vars: usize, max_parents: usize) -> Result<NetworkBounds, Error> {
        if max_parents < 1 {
            return Err(Error::Configuration(format!(
                "Maximal number of parents must be at least 1, got {}.",
                max_parents
            )));
        }
        if min_vars < 1 || min_vars > max_vars {
            return Err(Error::Configuration(format!(
                "Invalid network size range {}..={}.",
                min_vars, max_vars
            )));
        }
        if max_vars > State::max_length() {
            return Err(Error::Configuration(format!(
                "Networks with {} variables are not supported (at most {}).",
                max_vars,
                State::max_length()
            )));
        }
        Ok(NetworkBounds {
            min_vars,
            max_vars,
            max_parents,
        })
    }

    pub fn min_vars(&self) -> usize {
        self.min_vars
    }

    pub fn max_vars(&self) -> usize {
        self.max_vars
    }

    pub fn max_parents(&self) -> usize {
        self.max_parents
    }

    /// True if a network of `num_vars` variables fits these bounds.
    pub fn admits_size(&self, num_vars: usize) -> bool {
        (self.min_vars..=self.max_vars).contains(&num_vars)
    }
}
