//! Specification validation.
//!
//! Specifications are checked once, when created or edited, before they are
//! handed to the calculator. The calculator does not re-validate.

pub mod spec;

pub use spec::{MAX_COUNT, MAX_INTERVAL, validate};
