#[cfg(not(any(feature = "memory", feature = "mongodb")))]
compile_error!("Enable a repo feature: `memory` or `mongodb`.");

use std::sync::Arc;

use invoices_types::domain::invoice::{Invoice, ValidatedInvoice};
use invoices_types::ports::connection::ConnectionObserver;
use invoices_types::ports::invoice_repository::{InvoiceRepository, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod monitor;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "invoices";

/// Where the document store lives and which collection holds invoices.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub url: String,
    /// Overrides the database named in `url`.
    pub database: Option<String>,
    pub collection: String,
    pub app_name: Option<String>,
}

impl StoreSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: None,
            collection: DEFAULT_COLLECTION.to_string(),
            app_name: None,
        }
    }
}

/// The repository selected at compile time. With `mongodb` enabled the
/// document store is used, otherwise invoices live in process memory.
pub struct Repo {
    #[cfg(not(feature = "mongodb"))]
    memory: memory::InMemoryRepo,
    #[cfg(feature = "mongodb")]
    mongo: mongo::MongoRepo,
}

pub async fn build_repo(
    settings: &StoreSettings,
    observer: Arc<dyn ConnectionObserver>,
) -> anyhow::Result<Repo> {
    Repo::build_repo(settings, observer).await
}

impl Repo {
    #[cfg(not(feature = "mongodb"))]
    pub async fn build_repo(
        _: &StoreSettings,
        _: Arc<dyn ConnectionObserver>,
    ) -> anyhow::Result<Self> {
        tracing::warn!("built without `mongodb`; invoices are kept in memory");
        Ok(Self {
            memory: memory::InMemoryRepo::new(),
        })
    }

    #[cfg(feature = "mongodb")]
    pub async fn build_repo(
        settings: &StoreSettings,
        observer: Arc<dyn ConnectionObserver>,
    ) -> anyhow::Result<Self> {
        let mongo = mongo::MongoRepo::connect(settings, observer).await?;
        Ok(Self { mongo })
    }

    #[cfg(not(feature = "mongodb"))]
    fn inner(&self) -> &impl InvoiceRepository {
        &self.memory
    }

    #[cfg(feature = "mongodb")]
    fn inner(&self) -> &impl InvoiceRepository {
        &self.mongo
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for Repo {
    async fn create(&self, invoice: ValidatedInvoice) -> Result<Invoice, RepoError> {
        self.inner().create(invoice).await
    }

    async fn get(&self, id: &str) -> Result<Option<Invoice>, RepoError> {
        self.inner().get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, RepoError> {
        self.inner().list().await
    }

    async fn find_by_client_name(&self, client_name: &str) -> Result<Vec<Invoice>, RepoError> {
        self.inner().find_by_client_name(client_name).await
    }
}
