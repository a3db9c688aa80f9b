//! Invocation handlers. Both are stateless; all state lives in the table.

pub mod delta;
pub mod fetch;

pub use delta::DeltaCalculator;
pub use fetch::RateFetcher;
