use crate::common::mock_server::TwikeyMockServer;
use twikey_rust::{client::Environment, TwikeyClient};
use uuid::Uuid;

pub struct TestContext {
    pub client: TwikeyClient,
    /// Template configured on the mock server.
    pub ct: u64,
    mock_server: TwikeyMockServer,
}

impl TestContext {
    pub async fn start() -> Self {
        // Generate a new random API key for this specific test
        let api_key = Uuid::new_v4().to_string();
        let ct = 1420;

        // Setup a new mock server
        let mock_server = TwikeyMockServer::start(&api_key, ct).await;

        // Configure a new TwikeyClient to point to the mock server
        let client = TwikeyClient::builder(api_key)
            .with_environment(Environment::from_base_url(mock_server.url().clone()))
            .build();

        Self {
            client,
            ct,
            mock_server,
        }
    }

    pub fn environment(&self) -> Environment {
        Environment::from_base_url(self.mock_server.url().clone())
    }

    /// Number of logins served so far by the mock server.
    pub fn logins(&self) -> usize {
        self.mock_server.logins()
    }

    /// Signs a mandate on behalf of the debtor.
    pub async fn sign_mandate(&self, mandate_number: &str) -> Result<(), anyhow::Error> {
        if self.mock_server.sign_mandate(mandate_number) {
            Ok(())
        } else {
            Err(anyhow::anyhow!("Mandate {} not found", mandate_number))
        }
    }
}
