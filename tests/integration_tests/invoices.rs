use crate::{common::test_context::TestContext, integration_tests::helpers::new_customer};
use twikey_rust::{
    apis::invoices::{CreateInvoiceRequestBuilder, FeedOptions, InvoiceInclude, LineItemBuilder},
    error::ApiError,
    Error,
};
use uuid::Uuid;

fn new_invoice_number() -> String {
    format!("INV-{}", Uuid::new_v4())
}

#[tokio::test]
async fn create_and_get_invoice() {
    let ctx = TestContext::start().await;
    let number = new_invoice_number();

    let invoice = ctx
        .client
        .invoices
        .create(
            &CreateInvoiceRequestBuilder::default()
                .number(number.clone())
                .title("Integration test invoice")
                .amount(42.5)
                .date("2024-02-01")
                .duedate("2024-03-01")
                .ct(ctx.ct)
                .customer(new_customer())
                .lines(vec![LineItemBuilder::default()
                    .code("SUB-01")
                    .description("Monthly subscription")
                    .quantity(1u32)
                    .unitprice(42.5)
                    .build()
                    .unwrap()])
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(invoice.number.as_deref(), Some(number.as_str()));
    assert_eq!(invoice.amount, Some(42.5));

    let details = ctx
        .client
        .invoices
        .details(&invoice.id, &[InvoiceInclude::Customer])
        .await
        .unwrap();
    assert_eq!(details.id, invoice.id);
    assert_eq!(details.state, invoice.state);
    assert!(details.customer.is_some());
}

#[tokio::test]
async fn get_unknown_invoice() {
    let ctx = TestContext::start().await;

    let err = ctx
        .client
        .invoices
        .details(&Uuid::new_v4().to_string(), &[])
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::ApiError(ApiError { status, .. }) if status >= 400));
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn feed_delivers_new_invoices() {
    let ctx = TestContext::start().await;

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let number = new_invoice_number();
        ctx.client
            .invoices
            .create(
                &CreateInvoiceRequestBuilder::default()
                    .number(number.clone())
                    .amount(10.0)
                    .date("2024-02-01")
                    .duedate("2024-03-01")
                    .customer(new_customer())
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();
        numbers.push(number);
    }

    let mut delivered = Vec::new();
    ctx.client
        .invoices
        .feed(&FeedOptions::new(), |invoice| {
            delivered.push(invoice.number.unwrap_or_default())
        })
        .await
        .unwrap();

    assert_eq!(delivered, numbers);
}
