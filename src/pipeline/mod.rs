pub mod analyzer;
pub mod normalizer;

pub use analyzer::Analyzer;
pub use normalizer::{normalize, Normalized};
