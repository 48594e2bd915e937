pub mod connection;
pub mod invoice_repository;
