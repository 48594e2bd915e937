use async_trait::async_trait;

use crate::domain::invoice::{InvalidInvoiceId, Invoice, ValidatedInvoice};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error(transparent)]
    InvalidId(#[from] InvalidInvoiceId),

    #[error("db error: {0}")]
    DbError(String),
}

/// Storage port. Identifiers arrive as raw path text; each adapter parses
/// them with `InvoiceId::from_str` so malformed ids fail the same way everywhere.
#[async_trait]
pub trait InvoiceRepository: Send + Sync + 'static {
    async fn create(&self, invoice: ValidatedInvoice) -> Result<Invoice, RepoError>;
    async fn get(&self, id: &str) -> Result<Option<Invoice>, RepoError>;
    async fn list(&self) -> Result<Vec<Invoice>, RepoError>;
    async fn find_by_client_name(&self, client_name: &str) -> Result<Vec<Invoice>, RepoError>;
}
