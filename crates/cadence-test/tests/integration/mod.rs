//! Engine-level integration tests.
//!
//! ```sh
//! cargo test -p cadence-test --test engine_integration
//! ```

mod cli;
mod helpers;
mod occurrence_cases;
mod properties;
