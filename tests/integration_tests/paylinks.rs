use crate::{common::test_context::TestContext, integration_tests::helpers::new_customer};
use twikey_rust::apis::paylinks::{FeedOptions, PaylinkRequestBuilder};
use uuid::Uuid;

#[tokio::test]
async fn create_and_get_status() {
    let ctx = TestContext::start().await;
    let reference = Uuid::new_v4().to_string();

    let link = ctx
        .client
        .paylinks
        .create(
            &PaylinkRequestBuilder::default()
                .ct(ctx.ct)
                .amount(55.5)
                .message("Concert tickets")
                .reference(reference.clone())
                .customer(new_customer())
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(!link.url.is_empty());
    assert_eq!(link.amount, 55.5);

    let by_id = ctx.client.paylinks.status(Some(link.id), None).await.unwrap();
    assert_eq!(by_id.id, link.id);

    let by_reference = ctx
        .client
        .paylinks
        .status(None, Some(&reference))
        .await
        .unwrap();
    assert_eq!(by_reference.id, link.id);
}

#[cfg(not(feature = "acceptance-tests"))]
#[tokio::test]
async fn feed_delivers_new_links() {
    let ctx = TestContext::start().await;

    let link = ctx
        .client
        .paylinks
        .create(
            &PaylinkRequestBuilder::default()
                .ct(ctx.ct)
                .amount(5.0)
                .message("Parking")
                .build()
                .unwrap(),
        )
        .await
        .unwrap();

    let mut ids = Vec::new();
    ctx.client
        .paylinks
        .feed(&FeedOptions::new(), |link| ids.push(link.id))
        .await
        .unwrap();

    assert_eq!(ids, vec![link.id]);
}
