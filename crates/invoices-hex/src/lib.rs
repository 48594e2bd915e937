//! invoices-hex: hexagonal Invoice API library (core + inbound HTTP)

pub mod config;
pub mod errors;

pub mod application;

pub use invoices_types::{domain, ports};

pub mod inbound; // HTTP adapter (server + handlers)
