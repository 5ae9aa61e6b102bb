use crate::{
    common::test_context::TestContext,
    integration_tests::helpers::{MOCK_BIC, MOCK_IBAN},
};
use twikey_rust::{
    apis::refunds::{AddBeneficiaryRequestBuilder, FeedOptions, NewCreditTransferRequestBuilder},
    error::ApiError,
    Error,
};
use uuid::Uuid;

#[tokio::test]
async fn refund_to_beneficiary() {
    let ctx = TestContext::start().await;
    let customer_number = format!("customer-{}", Uuid::new_v4());

    let beneficiary = ctx
        .client
        .refunds
        .add_beneficiary(
            &AddBeneficiaryRequestBuilder::default()
                .iban(MOCK_IBAN)
                .bic(MOCK_BIC)
                .customer_number(customer_number.clone())
                .name("Twikey Support")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(beneficiary.iban, MOCK_IBAN);
    assert!(beneficiary.available);

    let refund = ctx
        .client
        .refunds
        .create(
            &NewCreditTransferRequestBuilder::default()
                .customer_number(customer_number)
                .message("Refund order 42")
                .amount(12.0)
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(refund.iban.as_deref(), Some(MOCK_IBAN));
    assert_eq!(refund.amount, 12.0);
}

#[tokio::test]
async fn refund_without_beneficiary() {
    let ctx = TestContext::start().await;

    let err = ctx
        .client
        .refunds
        .create(
            &NewCreditTransferRequestBuilder::default()
                .customer_number(format!("customer-{}", Uuid::new_v4()))
                .message("Refund")
                .amount(1.0)
                .build()
                .unwrap(),
        )
        .await
        .expect_err("Expected error");

    assert!(matches!(err, Error::ApiError(ApiError { status, .. }) if status >= 400));
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn feed_delivers_new_refunds() {
    let ctx = TestContext::start().await;

    ctx.client
        .refunds
        .add_beneficiary(
            &AddBeneficiaryRequestBuilder::default()
                .iban(MOCK_IBAN)
                .customer_number("customer-1")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();
    let refund = ctx
        .client
        .refunds
        .create(
            &NewCreditTransferRequestBuilder::default()
                .customer_number("customer-1")
                .message("Refund")
                .amount(3.0)
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let mut refunds = Vec::new();
    ctx.client
        .refunds
        .feed(&FeedOptions::new(), |refund| refunds.push(refund))
        .await
        .unwrap();

    assert_eq!(refunds, vec![refund]);
}
