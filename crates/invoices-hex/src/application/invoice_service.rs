use crate::errors::AppError;
use invoices_types::domain::invoice::{Invoice, NewInvoice};
use invoices_types::ports::invoice_repository::InvoiceRepository;

pub struct InvoiceService<R: InvoiceRepository> {
    repo: R,
}

impl<R: InvoiceRepository> InvoiceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn create_invoice(&self, input: NewInvoice) -> Result<Invoice, AppError> {
        let invoice = input.validated()?;
        let created = self.repo.create(invoice).await?;
        tracing::info!(invoice_id = %created.id, "invoice created");
        Ok(created)
    }

    /// `Ok(None)` for a well-formed id with no record; malformed ids are errors.
    pub async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self.repo.get(id).await?)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.repo.list().await?)
    }

    pub async fn invoices_for_client(&self, client_name: &str) -> Result<Vec<Invoice>, AppError> {
        Ok(self.repo.find_by_client_name(client_name).await?)
    }
}
