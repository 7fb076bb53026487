//! # saffron-core
//!
//! Typed netlist model for the Saffron SPICE front end.
//!
//! The model is the value tree produced by `saffron-parser`: a [`Netlist`]
//! holding an ordered sequence of [`Statement`]s, each carrying a
//! [`ParameterCollection`]. The whole tree is plain owned data: cloning a
//! netlist yields a deep, independent copy that downstream consumers may
//! specialize freely.

pub mod netlist;
pub mod parameter;
pub mod units;

pub use netlist::{Netlist, Statement};
pub use parameter::{Parameter, ParameterCollection};
pub use units::parse_value;
