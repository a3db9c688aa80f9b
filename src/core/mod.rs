//! Core business logic abstractions

pub mod config;
pub mod feed;
pub mod log;
pub mod rates;
pub mod record;
pub mod response;
pub mod source;
pub mod table;

// Re-export main types for cleaner imports
pub use rates::{DeltaReport, MissingPrevious, RateMapping};
pub use record::ExchangeRateRecord;
pub use response::HandlerResponse;
pub use source::FeedSource;
pub use table::{BatchWriter, KeyCondition, RateTable};
