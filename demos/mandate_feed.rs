use anyhow::Context;
use twikey_rust::{
    apis::{documents::DocumentEvent, invoices::InvoiceInclude},
    client::Environment,
    feed::FeedOptions,
    TwikeyClient,
};

struct Config {
    api_key: String,
    private_key: Option<String>,
}

impl Config {
    fn read() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: std::env::var("TWIKEY_API_KEY")
                .context("TWIKEY_API_KEY must be set to a Twikey API key")?,
            private_key: std::env::var("TWIKEY_PRIVATE_KEY").ok(),
        })
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::read()?;

    // Setup Twikey client against the beta environment
    let mut builder = TwikeyClient::builder(config.api_key).with_environment(Environment::test());
    if let Some(private_key) = config.private_key {
        builder = builder.with_private_key(private_key);
    }
    let twikey = builder.build();

    // Drain the mandate feed
    let mandates = twikey
        .documents
        .feed(&FeedOptions::new(), |event| match event {
            DocumentEvent::New { document, .. } => tracing::info!(
                "New mandate {} signed by {}",
                document.mandate_number,
                document.debtor_name.as_deref().unwrap_or("<unknown>")
            ),
            DocumentEvent::Updated {
                document,
                original_mandate_number,
                reason,
                ..
            } => tracing::info!(
                "Mandate {} updated to {} ({})",
                original_mandate_number,
                document.mandate_number,
                reason.as_deref().unwrap_or("no reason given")
            ),
            DocumentEvent::Cancelled {
                mandate_number,
                reason,
                ..
            } => tracing::info!(
                "Mandate {} cancelled ({})",
                mandate_number,
                reason.as_deref().unwrap_or("no reason given")
            ),
        })
        .await?;
    tracing::info!("Processed {} mandate updates", mandates);

    // Drain the invoice feed, sideloading the last payment
    let invoices = twikey
        .invoices
        .feed(
            &FeedOptions::new().include(InvoiceInclude::LastPayment.as_str()),
            |invoice| {
                tracing::info!(
                    "Invoice {} is now {}",
                    invoice.number.as_deref().unwrap_or(&invoice.id),
                    invoice.state.as_deref().unwrap_or("<unknown>")
                )
            },
        )
        .await?;
    tracing::info!("Processed {} invoice updates", invoices);

    Ok(())
}

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Setting default subscriber failed");

    if let Err(e) = run().await {
        tracing::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}
