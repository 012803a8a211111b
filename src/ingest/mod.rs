mod aggregator;
mod csv_source;
mod error;

pub use aggregator::Aggregator;
pub use csv_source::{load_samples, read_samples};
