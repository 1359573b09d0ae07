//! Terminal front end for the declarative executor

pub mod differ;
pub mod executor;

pub use executor::{ApplyOptions, apply};
