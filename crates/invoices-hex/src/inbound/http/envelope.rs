use invoices_types::domain::invoice::Invoice;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvoiceEnvelope {
    #[schema(example = "Invoice created successfully")]
    pub message: String,
    pub new_invoice: Invoice,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllInvoicesEnvelope {
    #[schema(example = "All invoices fetched successfully")]
    pub message: String,
    pub all_invoices: Vec<Invoice>,
}

/// `invoiceDetails` is `null` when no invoice has the requested id.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsEnvelope {
    #[schema(example = "Invoice details fetched successfully")]
    pub message: String,
    pub invoice_details: Option<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientInvoicesEnvelope {
    #[schema(example = "Invoice details fetched successfully")]
    pub message: String,
    pub invoice_details_by_client_name: Vec<Invoice>,
}
