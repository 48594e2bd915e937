use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    routing::{get, post},
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use super::envelope::{
    AllInvoicesEnvelope, ClientInvoicesEnvelope, CreatedInvoiceEnvelope, InvoiceDetailsEnvelope,
};
use crate::application::invoice_service::InvoiceService;
use crate::errors::{AppError, ErrorDetail, ErrorEnvelope, ErrorKind, Failure};
use invoices_types::domain::invoice::{Invoice, NewInvoice};
use invoices_types::ports::invoice_repository::InvoiceRepository;

pub const GREETING: &str = "Hello this is the Invoice API backend";

/// Same ceiling as the usual JSON body parser default.
const JSON_BODY_LIMIT: usize = 100 * 1024;

const CREATED: &str = "Invoice created successfully";
const CREATE_FAILED: &str = "Error in creating invoice";
const LISTED: &str = "All invoices fetched successfully";
const LIST_FAILED: &str = "Error in fetching all invoices";
const DETAILS: &str = "Invoice details fetched successfully";
const BY_ID_FAILED: &str = "Error in fetching invoice details by id";
const BY_CLIENT_FAILED: &str = "Error in fetching invoice details by client name";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invoice API",
        version = "1.0.0",
        description = "API for creating and fetching invoices"
    ),
    paths(
        root,
        create_invoice,
        get_all_invoices,
        get_invoice_by_id,
        get_invoice_by_client_name,
    ),
    components(schemas(
        Invoice,
        NewInvoice,
        CreatedInvoiceEnvelope,
        AllInvoicesEnvelope,
        InvoiceDetailsEnvelope,
        ClientInvoicesEnvelope,
        ErrorEnvelope,
        ErrorDetail,
        ErrorKind,
    )),
    tags((name = "Invoices", description = "Invoice creation and lookup"))
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: InvoiceRepository,
{
    pub service: Arc<InvoiceService<R>>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    pub async fn new(service: InvoiceService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    /// Routes, docs, CORS, body limit and request tracing, without a listener.
    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let svc = self.service.clone();
        Router::new()
            .route("/", get(root))
            .route("/api/create-invoice", post(create_invoice::<R>))
            .route("/api/get-all-invoices", get(get_all_invoices::<R>))
            .route("/api/get-invoice-by-id/{id}", get(get_invoice_by_id::<R>))
            .route(
                "/api/get-invoice-by-clientName/{clientName}",
                get(get_invoice_by_client_name::<R>),
            )
            .with_state(svc)
            .merge(SwaggerUi::new("/api-docs").url("/openapi.json", ApiDoc::openapi()))
            .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
            .layer(CorsLayer::permissive())
            .layer(trace_layer)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server is running on port {}", self.config.port);
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// Liveness greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "Invoices",
    responses((status = 200, description = "Returns a welcome message", body = String, content_type = "text/plain"))
)]
async fn root() -> &'static str {
    GREETING
}

/// Create a new invoice
#[utoipa::path(
    post,
    path = "/api/create-invoice",
    tag = "Invoices",
    request_body = NewInvoice,
    responses(
        (status = 200, description = "Invoice created successfully", body = CreatedInvoiceEnvelope),
        (status = 500, description = "Error creating invoice", body = ErrorEnvelope)
    )
)]
async fn create_invoice<R>(
    State(service): State<Arc<InvoiceService<R>>>,
    payload: Result<Json<NewInvoice>, JsonRejection>,
) -> Result<Json<CreatedInvoiceEnvelope>, Failure>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let Json(input) =
        payload.map_err(|e| Failure::new(CREATE_FAILED, AppError::InvalidBody(e.body_text())))?;
    let new_invoice = service
        .create_invoice(input)
        .await
        .map_err(|e| Failure::new(CREATE_FAILED, e))?;
    Ok(Json(CreatedInvoiceEnvelope {
        message: CREATED.into(),
        new_invoice,
    }))
}

/// Get all invoices
#[utoipa::path(
    get,
    path = "/api/get-all-invoices",
    tag = "Invoices",
    responses(
        (status = 200, description = "Returns all invoices", body = AllInvoicesEnvelope),
        (status = 500, description = "Error fetching invoices", body = ErrorEnvelope)
    )
)]
async fn get_all_invoices<R>(
    State(service): State<Arc<InvoiceService<R>>>,
) -> Result<Json<AllInvoicesEnvelope>, Failure>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let all_invoices = service
        .list_invoices()
        .await
        .map_err(|e| Failure::new(LIST_FAILED, e))?;
    Ok(Json(AllInvoicesEnvelope {
        message: LISTED.into(),
        all_invoices,
    }))
}

/// Get invoice by ID
#[utoipa::path(
    get,
    path = "/api/get-invoice-by-id/{id}",
    tag = "Invoices",
    params(("id" = String, Path, description = "The invoice ID")),
    responses(
        (status = 200, description = "Returns invoice details, null when absent", body = InvoiceDetailsEnvelope),
        (status = 500, description = "Error fetching invoice, including malformed ids", body = ErrorEnvelope)
    )
)]
async fn get_invoice_by_id<R>(
    State(service): State<Arc<InvoiceService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<InvoiceDetailsEnvelope>, Failure>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let invoice_details = service
        .get_invoice(&id)
        .await
        .map_err(|e| Failure::new(BY_ID_FAILED, e))?;
    Ok(Json(InvoiceDetailsEnvelope {
        message: DETAILS.into(),
        invoice_details,
    }))
}

/// Get invoices by client name
#[utoipa::path(
    get,
    path = "/api/get-invoice-by-clientName/{clientName}",
    tag = "Invoices",
    params(("clientName" = String, Path, description = "Name of the client")),
    responses(
        (status = 200, description = "Returns invoice details for a client", body = ClientInvoicesEnvelope),
        (status = 500, description = "Error fetching invoice", body = ErrorEnvelope)
    )
)]
async fn get_invoice_by_client_name<R>(
    State(service): State<Arc<InvoiceService<R>>>,
    Path(client_name): Path<String>,
) -> Result<Json<ClientInvoicesEnvelope>, Failure>
where
    R: InvoiceRepository + Send + Sync + 'static,
{
    let invoice_details_by_client_name = service
        .invoices_for_client(&client_name)
        .await
        .map_err(|e| Failure::new(BY_CLIENT_FAILED, e))?;
    Ok(Json(ClientInvoicesEnvelope {
        message: DETAILS.into(),
        invoice_details_by_client_name,
    }))
}
