pub mod devices;
pub mod error;
