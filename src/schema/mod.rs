//! Schema module - Configuration and scenario input types.

mod config;
mod pattern;
mod scenario;

pub use config::*;
pub use pattern::*;
pub use scenario::*;
