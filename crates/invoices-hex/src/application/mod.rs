pub mod invoice_service;
