use async_trait::async_trait;
use dashmap::DashMap;
use invoices_types::domain::invoice::{Invoice, InvoiceId, ValidatedInvoice};
use invoices_types::ports::invoice_repository::{InvoiceRepository, RepoError};
use std::sync::Arc;

/// Process-local store with the same id scheme as the MongoDB adapter.
/// Iteration order is unspecified, as with an unsorted collection scan.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub map: Arc<DashMap<InvoiceId, Invoice>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryRepo {
    async fn create(&self, invoice: ValidatedInvoice) -> Result<Invoice, RepoError> {
        let id = InvoiceId::generate();
        let stored = Invoice::from_parts(id, invoice);
        self.map.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<Option<Invoice>, RepoError> {
        let id: InvoiceId = id.parse()?;
        Ok(self.map.get(&id).map(|r| r.clone()))
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepoError> {
        Ok(self.map.iter().map(|kv| kv.value().clone()).collect())
    }

    async fn find_by_client_name(&self, client_name: &str) -> Result<Vec<Invoice>, RepoError> {
        Ok(self
            .map
            .iter()
            .filter(|kv| kv.value().client_name == client_name)
            .map(|kv| kv.value().clone())
            .collect())
    }
}
