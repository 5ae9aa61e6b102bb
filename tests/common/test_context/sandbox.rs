use twikey_rust::{client::Environment, TwikeyClient};

pub struct TestContext {
    pub client: TwikeyClient,
    pub ct: u64,
}

impl TestContext {
    pub async fn start() -> Self {
        // Take the required credentials from the env
        let api_key = std::env::var("ACCEPTANCE_TESTS_API_KEY").unwrap();
        let private_key = std::env::var("ACCEPTANCE_TESTS_PRIVATE_KEY").ok();
        let ct = std::env::var("ACCEPTANCE_TESTS_CT")
            .unwrap()
            .parse()
            .unwrap();

        // Configure a new TwikeyClient to point to the beta environment
        let mut builder = TwikeyClient::builder(api_key).with_environment(Environment::test());
        if let Some(private_key) = private_key {
            builder = builder.with_private_key(private_key);
        }

        Self {
            client: builder.build(),
            ct,
        }
    }

    pub fn environment(&self) -> Environment {
        Environment::test()
    }

    pub async fn sign_mandate(&self, _mandate_number: &str) -> Result<(), anyhow::Error> {
        // Signing requires a debtor on the hosted signing page
        Err(anyhow::anyhow!("Mandates cannot be signed in acceptance tests"))
    }
}
