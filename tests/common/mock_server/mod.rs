mod routes;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse},
    http::header::{AUTHORIZATION, USER_AGENT},
    web, App, HttpResponse, HttpServer,
};
use futures::future::{ready, Either, FutureExt};
use reqwest::Url;
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
};
use tokio::sync::oneshot;

static API_ERROR_HEADER: &str = "ApiError";

#[derive(Clone)]
struct MockServerConfiguration {
    api_key: String,
    ct: u64,
}

/// Server side cursor over the changes of a resource.
#[derive(Default)]
struct MockFeed {
    history: Vec<Value>,
    cursor: usize,
}

impl MockFeed {
    fn push(&mut self, entry: Value) {
        self.history.push(entry);
    }

    /// Returns every change since the previous call. A reset replays the whole history.
    fn next_page(&mut self, reset: bool) -> Vec<Value> {
        if reset {
            self.cursor = 0;
        }

        let page = self.history[self.cursor..].to_vec();
        self.cursor = self.history.len();
        page
    }
}

#[derive(Default)]
struct MockServerStorageInner {
    session_tokens: HashSet<String>,
    logins: usize,
    next_id: u64,
    /// Raw `Mndt` objects and their state, by mandate number.
    mandates: HashMap<String, (Value, String)>,
    invoices: HashMap<String, Value>,
    transactions: Vec<Value>,
    paylinks: Vec<Value>,
    /// Beneficiary accounts, by customer number.
    beneficiaries: HashMap<String, Vec<Value>>,
    mandate_feed: MockFeed,
    invoice_feed: MockFeed,
    transaction_feed: MockFeed,
    paylink_feed: MockFeed,
    refund_feed: MockFeed,
}

impl MockServerStorageInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory storage for everything created on the mock server.
type MockServerStorage = Arc<RwLock<MockServerStorageInner>>;

/// Simple mock server for Twikey APIs used in local integration tests.
pub struct TwikeyMockServer {
    url: Url,
    shutdown: Option<oneshot::Sender<()>>,
    storage: MockServerStorage,
}

impl TwikeyMockServer {
    pub async fn start(api_key: &str, ct: u64) -> Self {
        let configuration = MockServerConfiguration {
            api_key: api_key.to_string(),
            ct,
        };

        // Setup the in-memory storage
        let storage = MockServerStorage::default();
        let storage_clone = storage.clone();

        // Setup the mock HTTP server and bind it to a random port
        let http_server_factory = HttpServer::new(move || {
            let validation_storage = storage.clone();

            App::new()
                .app_data(web::Data::new(configuration.clone()))
                .app_data(web::Data::new(storage.clone()))
                // User agent and session token must be validated for each request
                .wrap_fn(move |req, srv| match validate_request(&req, &validation_storage) {
                    None => Either::Left(
                        srv.call(req)
                            .map(|res| res.map(ServiceResponse::map_into_left_body)),
                    ),
                    Some(rejection) => Either::Right(ready(Ok(req
                        .into_response(rejection)
                        .map_into_right_body()))),
                })
                // Mock routes
                .service(web::resource("/").route(web::post().to(routes::login)))
                .service(web::resource("/invite").route(web::post().to(routes::invite)))
                .service(
                    web::resource("/mandate")
                        .route(web::get().to(routes::mandate_feed))
                        .route(web::delete().to(routes::cancel_mandate)),
                )
                .service(
                    web::resource("/mandate/detail").route(web::get().to(routes::mandate_details)),
                )
                .service(
                    web::resource("/invoice")
                        .route(web::post().to(routes::create_invoice))
                        .route(web::get().to(routes::invoice_feed)),
                )
                .service(web::resource("/invoice/{id}").route(web::get().to(routes::get_invoice)))
                .service(
                    web::resource("/transaction")
                        .route(web::post().to(routes::create_transaction))
                        .route(web::get().to(routes::transaction_feed)),
                )
                .service(
                    web::resource("/transaction/detail")
                        .route(web::get().to(routes::transaction_status)),
                )
                .service(
                    web::resource("/payment/link")
                        .route(web::post().to(routes::create_paylink))
                        .route(web::get().to(routes::paylink_status)),
                )
                .service(
                    web::resource("/payment/link/feed").route(web::get().to(routes::paylink_feed)),
                )
                .service(
                    web::resource("/transfers/beneficiaries")
                        .route(web::post().to(routes::add_beneficiary)),
                )
                .service(
                    web::resource("/transfer")
                        .route(web::post().to(routes::create_refund))
                        .route(web::get().to(routes::refund_feed)),
                )
        })
        .workers(1)
        .bind("127.0.0.1:0")
        .unwrap();

        // Retrieve the address and port the server was bound to
        let addr = http_server_factory.addrs().first().cloned().unwrap();

        // Prepare a oneshot channel to kill the HTTP server when this struct is dropped
        let (shutdown_sender, shutdown_recv) = oneshot::channel();

        // Start the server in another task
        let http_server = http_server_factory.run();
        tokio::spawn(async move {
            tokio::select! {
                _ = http_server => panic!("HTTP server crashed"),
                _ = shutdown_recv => { /* Intentional shutdown */ }
            }
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            shutdown: Some(shutdown_sender),
            storage: storage_clone,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of successful logins served so far.
    pub fn logins(&self) -> usize {
        self.storage.read().unwrap().logins
    }

    /// Marks a mandate as signed, as the debtor would do on the signing page.
    pub fn sign_mandate(&self, mandate_number: &str) -> bool {
        let mut storage = self.storage.write().unwrap();
        match storage.mandates.get_mut(mandate_number) {
            Some((mndt, state)) => {
                *state = "SIGNED".to_string();
                let event = serde_json::json!({
                    "Mndt": mndt.clone(),
                    "EvtTime": chrono::Utc::now().to_rfc3339(),
                });
                storage.mandate_feed.push(event);
                true
            }
            None => false,
        }
    }
}

impl Drop for TwikeyMockServer {
    fn drop(&mut self) {
        // Send a shutdown signal to the actix server on drop
        let _ = self.shutdown.take().unwrap().send(());
    }
}

/// Returns the response to send back when the request must not reach the routes.
fn validate_request(req: &ServiceRequest, storage: &MockServerStorage) -> Option<HttpResponse> {
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !user_agent.starts_with("twikey-rust/") {
        return Some(
            HttpResponse::BadRequest()
                .insert_header((API_ERROR_HEADER, "err_invalid_user_agent"))
                .finish(),
        );
    }

    // The login call is the only one allowed without a session
    if req.path() == "/" {
        return None;
    }

    let authorized = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |token| {
            storage.read().unwrap().session_tokens.contains(token)
        });
    if !authorized {
        return Some(
            HttpResponse::Unauthorized()
                .insert_header((API_ERROR_HEADER, "err_no_login"))
                .finish(),
        );
    }

    None
}
