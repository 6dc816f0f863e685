//! Cadence recurrence engine - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `cadence_test::component::` paths.

pub mod component {
    pub use cadence_recur::error;
    pub use cadence_recur::recur;

    pub mod config {
        pub use cadence_core::config::*;
    }

    pub mod cli {
        pub use cadence_app::cli::*;
        pub use cadence_app::error::AppError;
    }
}
