//! Utilities
//!
//! Small types used throughout the crate.

mod policy;

pub use policy::OverflowPolicy;
