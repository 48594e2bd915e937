use std::time::Duration;

use anyhow::Context;
use invoices_types::domain::invoice::{Invoice, NewInvoice};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct InvoicesClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct InvoicesClient {
    base: Url,
    client: reqwest::Client,
}

/// Failure body returned by every invoice route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub message: String,
    pub error: ErrorDetail,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(thiserror::Error, Debug)]
#[error("{status}: {} ({})", .envelope.message, .envelope.error.message)]
pub struct ServiceError {
    pub status: reqwest::StatusCode,
    pub envelope: ErrorEnvelope,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CreatedEnvelope {
    new_invoice: Invoice,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct AllEnvelope {
    all_invoices: Vec<Invoice>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct DetailsEnvelope {
    invoice_details: Option<Invoice>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct ByClientEnvelope {
    invoice_details_by_client_name: Vec<Invoice>,
}

impl InvoicesClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<InvoicesClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(InvoicesClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    /// Joins `segments` onto the base url, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read<T: DeserializeOwned>(res: reqwest::Response) -> anyhow::Result<T> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }
        match res.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(ServiceError { status, envelope }.into()),
            Err(_) => anyhow::bail!("unexpected response status {status}"),
        }
    }

    pub async fn greeting(&self) -> anyhow::Result<String> {
        let res = self
            .client
            .get(self.base.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(res.text().await?)
    }

    pub async fn create_invoice(&self, invoice: &NewInvoice) -> anyhow::Result<Invoice> {
        let res = self
            .client
            .post(self.url(&["api", "create-invoice"])?)
            .json(invoice)
            .send()
            .await?;
        let body: CreatedEnvelope = Self::read(res).await?;
        Ok(body.new_invoice)
    }

    pub async fn list_invoices(&self) -> anyhow::Result<Vec<Invoice>> {
        let res = self
            .client
            .get(self.url(&["api", "get-all-invoices"])?)
            .send()
            .await?;
        let body: AllEnvelope = Self::read(res).await?;
        Ok(body.all_invoices)
    }

    pub async fn get_invoice(&self, id: &str) -> anyhow::Result<Option<Invoice>> {
        let res = self
            .client
            .get(self.url(&["api", "get-invoice-by-id", id])?)
            .send()
            .await?;
        let body: DetailsEnvelope = Self::read(res).await?;
        Ok(body.invoice_details)
    }

    pub async fn invoices_for_client(&self, client_name: &str) -> anyhow::Result<Vec<Invoice>> {
        let res = self
            .client
            .get(self.url(&["api", "get-invoice-by-clientName", client_name])?)
            .send()
            .await?;
        let body: ByClientEnvelope = Self::read(res).await?;
        Ok(body.invoice_details_by_client_name)
    }
}

impl InvoicesClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<InvoicesClient> {
        if let Some(client) = self.client {
            return Ok(InvoicesClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(InvoicesClient {
            base: self.base,
            client,
        })
    }
}
