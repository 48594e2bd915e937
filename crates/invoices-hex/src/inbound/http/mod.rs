mod envelope;
mod server;

pub use envelope::{
    AllInvoicesEnvelope, ClientInvoicesEnvelope, CreatedInvoiceEnvelope, InvoiceDetailsEnvelope,
};
pub use server::{ApiDoc, HttpServer, HttpServerConfig, GREETING};
