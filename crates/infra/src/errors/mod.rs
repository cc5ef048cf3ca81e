//! Error conversions at the infrastructure edge

pub mod conversions;

pub use conversions::InfraError;
