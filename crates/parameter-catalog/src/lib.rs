//! Generator Parameter Catalog
//!
//! Static registry of monitored generator parameters and the band
//! classification that turns a raw reading into a severity.

mod catalog;
mod spec;

pub use catalog::ParameterCatalog;
pub use spec::{Band, Category, Classification, Deviation, ParameterSpec, Status};
