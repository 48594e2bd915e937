#![cfg(feature = "memory")]

use invoices_repo::memory::InMemoryRepo;
use invoices_types::domain::invoice::NewInvoice;
use invoices_types::ports::invoice_repository::{InvoiceRepository, RepoError};

fn invoice(number: &str, client: &str) -> NewInvoice {
    NewInvoice {
        invoice_number: number.into(),
        invoice_date: "2024-01-01".into(),
        due_date: "2024-02-01".into(),
        client_name: client.into(),
        invoice_description: "Consulting".into(),
        invoice_amount: "100".into(),
        payment_link: "http://pay/1".into(),
        payment_status: "unpaid".into(),
    }
}

#[tokio::test]
async fn memory_repo_create_get_list_flow() {
    let repo = InMemoryRepo::new();
    let created = repo
        .create(invoice("INV-1", "Acme").validated().unwrap())
        .await
        .unwrap();
    assert_eq!(created.id.len(), 24);

    let fetched = repo.get(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    repo.create(invoice("INV-2", "Initech").validated().unwrap())
        .await
        .unwrap();
    let listed = repo.list().await.unwrap();
    assert_eq!(listed.len(), 2);

    let acme = repo.find_by_client_name("Acme").await.unwrap();
    assert_eq!(acme.len(), 1);
    assert_eq!(acme[0].invoice_number, "INV-1");
}

#[tokio::test]
async fn memory_repo_client_name_is_exact_match() {
    let repo = InMemoryRepo::new();
    repo.create(invoice("INV-1", "Acme").validated().unwrap())
        .await
        .unwrap();

    assert!(repo.find_by_client_name("acme").await.unwrap().is_empty());
    assert!(repo.find_by_client_name("Acme ").await.unwrap().is_empty());
    assert!(repo.find_by_client_name("Nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_repo_handles_missing_and_malformed_ids() {
    let repo = InMemoryRepo::new();
    let missing = repo.get("65a1b2c3d4e5f60718293a4b").await.unwrap();
    assert!(missing.is_none());

    let malformed = repo.get("12345").await;
    assert!(matches!(malformed, Err(RepoError::InvalidId(_))));
}
