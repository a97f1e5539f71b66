pub mod diagnose;
pub mod parameters;
