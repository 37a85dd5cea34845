//! Basic structures which are shared by the rest of the crate, but are not specific
//! to Boolean networks.

pub mod bitvector;
pub mod structs;
