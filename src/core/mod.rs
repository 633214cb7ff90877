//! Conversion board state and the pieces it is built from

pub mod board;
pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod rates;
pub mod reorder;
pub mod scheduler;
pub mod selection;

// Re-export main types for cleaner imports
pub use board::{Board, BoardRow, ConversionState};
pub use currency::Currency;
pub use rates::{ExchangeRateTable, GroundingSource, RateSnapshot, RateSource, RateState};
pub use scheduler::RefreshScheduler;
