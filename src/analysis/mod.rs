//! Analysis modules.
//!
//! The transform stage of the pipeline lives here.

pub mod aggregator;

pub use aggregator::*;
