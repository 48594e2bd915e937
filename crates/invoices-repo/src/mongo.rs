use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use invoices_types::domain::invoice::{Invoice, InvoiceId, ValidatedInvoice};
use invoices_types::ports::connection::ConnectionObserver;
use invoices_types::ports::invoice_repository::{InvoiceRepository, RepoError};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::event::sdam::SdamEvent;
use mongodb::event::EventHandler;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::monitor::{LinkMonitor, LinkSignal};
use crate::StoreSettings;

/// Database used when neither the settings nor the URL name one.
pub const FALLBACK_DATABASE: &str = "test";

/// MongoDB-backed repository. Cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct MongoRepo {
    client: Client,
    collection: Collection<InvoiceDocument>,
    monitor: Arc<LinkMonitor>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    invoice_number: String,
    invoice_date: String,
    due_date: String,
    client_name: String,
    invoice_description: String,
    invoice_amount: String,
    payment_link: String,
    payment_status: String,
}

impl InvoiceDocument {
    fn new(id: ObjectId, invoice: ValidatedInvoice) -> Self {
        let n = invoice.into_inner();
        Self {
            id,
            invoice_number: n.invoice_number,
            invoice_date: n.invoice_date,
            due_date: n.due_date,
            client_name: n.client_name,
            invoice_description: n.invoice_description,
            invoice_amount: n.invoice_amount,
            payment_link: n.payment_link,
            payment_status: n.payment_status,
        }
    }

    fn into_invoice(self) -> Invoice {
        Invoice {
            id: InvoiceId::from(self.id).to_string(),
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            client_name: self.client_name,
            invoice_description: self.invoice_description,
            invoice_amount: self.invoice_amount,
            payment_link: self.payment_link,
            payment_status: self.payment_status,
        }
    }
}

fn db_err(e: mongodb::error::Error) -> RepoError {
    RepoError::DbError(e.to_string())
}

fn link_signal(event: &SdamEvent) -> Option<LinkSignal> {
    match event {
        SdamEvent::ServerHeartbeatSucceeded(ev) => Some(LinkSignal::HeartbeatSucceeded {
            server: ev.server_address.to_string(),
        }),
        SdamEvent::ServerHeartbeatFailed(ev) => Some(LinkSignal::HeartbeatFailed {
            server: ev.server_address.to_string(),
            message: ev.failure.to_string(),
        }),
        SdamEvent::ServerClosed(ev) => Some(LinkSignal::ServerClosed {
            server: ev.address.to_string(),
        }),
        SdamEvent::TopologyClosed(_) => Some(LinkSignal::TopologyClosed),
        _ => None,
    }
}

impl MongoRepo {
    /// Connects and verifies the link with a `ping`. Any failure here is the
    /// caller's cue to stop; later link trouble only reaches `observer`.
    pub async fn connect(
        settings: &StoreSettings,
        observer: Arc<dyn ConnectionObserver>,
    ) -> anyhow::Result<Self> {
        let mut options = ClientOptions::parse(&settings.url)
            .await
            .context("invalid MongoDB connection string")?;

        if let Some(app_name) = &settings.app_name {
            options.app_name = Some(app_name.clone());
        }

        let monitor = Arc::new(LinkMonitor::new(observer));
        let sdam_monitor = monitor.clone();
        options.sdam_event_handler = Some(EventHandler::callback(move |event: SdamEvent| {
            if let Some(signal) = link_signal(&event) {
                sdam_monitor.signal(signal);
            }
        }));

        let database = settings
            .database
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| FALLBACK_DATABASE.to_string());

        let client = Client::with_options(options).context("failed to build MongoDB client")?;
        let db = client.database(&database);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("initial MongoDB ping failed")?;

        tracing::info!(
            database = %database,
            collection = %settings.collection,
            "connected to MongoDB"
        );

        Ok(Self {
            collection: db.collection(&settings.collection),
            client,
            monitor,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.monitor.is_connected()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl InvoiceRepository for MongoRepo {
    #[instrument(skip(self, invoice), fields(client_name = %invoice.get().client_name))]
    async fn create(&self, invoice: ValidatedInvoice) -> Result<Invoice, RepoError> {
        let document = InvoiceDocument::new(ObjectId::new(), invoice);
        self.collection
            .insert_one(&document)
            .await
            .map_err(db_err)?;
        tracing::debug!(invoice_id = %document.id, "invoice inserted");
        Ok(document.into_invoice())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<Invoice>, RepoError> {
        let id: InvoiceId = id.parse()?;
        let found = self
            .collection
            .find_one(doc! { "_id": id.object_id() })
            .await
            .map_err(db_err)?;
        Ok(found.map(InvoiceDocument::into_invoice))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Invoice>, RepoError> {
        let cursor = self.collection.find(doc! {}).await.map_err(db_err)?;
        let docs: Vec<InvoiceDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(InvoiceDocument::into_invoice).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_client_name(&self, client_name: &str) -> Result<Vec<Invoice>, RepoError> {
        let cursor = self
            .collection
            .find(doc! { "clientName": client_name })
            .await
            .map_err(db_err)?;
        let docs: Vec<InvoiceDocument> = cursor.try_collect().await.map_err(db_err)?;
        Ok(docs.into_iter().map(InvoiceDocument::into_invoice).collect())
    }
}
