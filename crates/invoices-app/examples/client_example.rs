///  To run :
///  cargo r --example client_example
use invoices_client::InvoicesClient;
use invoices_hex::application::invoice_service::InvoiceService;
use invoices_hex::inbound::http::{HttpServer, HttpServerConfig};
use invoices_repo::memory::InMemoryRepo;
use invoices_types::domain::invoice::NewInvoice;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on ephemeral port with in-memory repo.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let service = InvoiceService::new(InMemoryRepo::new());
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Use client against the running server.
    let client = InvoicesClient::new(&addr)?;
    println!("{}", client.greeting().await?);

    let created = client
        .create_invoice(&NewInvoice {
            invoice_number: "INV-1".into(),
            invoice_date: "2024-01-01".into(),
            due_date: "2024-02-01".into(),
            client_name: "Acme".into(),
            invoice_description: "Consulting".into(),
            invoice_amount: "100".into(),
            payment_link: "http://pay/1".into(),
            payment_status: "unpaid".into(),
        })
        .await?;
    println!("Created invoice id={}", created.id);

    let fetched = client.get_invoice(&created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));
    println!("Fetched invoice {:?}", fetched.map(|i| i.invoice_number));

    let for_acme = client.invoices_for_client("Acme").await?;
    println!("Acme has {} invoice(s)", for_acme.len());

    // An incomplete invoice comes back as the failure envelope.
    match client.create_invoice(&NewInvoice::default()).await {
        Ok(_) => anyhow::bail!("incomplete invoice was accepted"),
        Err(err) => println!("Rejected incomplete invoice: {err}"),
    }

    let all = client.list_invoices().await?;
    println!("Store holds {} invoice(s)", all.len());

    handle.abort();
    Ok(())
}
