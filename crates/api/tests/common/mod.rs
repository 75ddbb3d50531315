//! Shared test harness: mock collaborators and request helpers.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use arcana_api::config::ServerConfig;
use arcana_api::router::build_app_router;
use arcana_api::session::SESSION_HEADER;
use arcana_api::state::AppState;
use arcana_api::store::SessionStore;
use arcana_astro::{
    AstroError, ChartEngine, Ephemeris, EphemerisSource, FixedOffsetResolver, GeoPoint, Geocoder,
};
use arcana_core::prompt::GenerationPrompt;
use arcana_oracle::{OracleError, TextGenerator};
use arcana_payments::{
    CheckoutGateway, CheckoutHandle, CheckoutRequest, GatewayError, PaymentRecord,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        stripe_secret_key: "sk_test_dummy".to_string(),
        price_tarot: "price_tarot_test".to_string(),
        price_astro: "price_astro_test".to_string(),
        price_dream: "price_dream_test".to_string(),
        oracle_base_url: "http://oracle.invalid".to_string(),
        oracle_api_key: "test-key".to_string(),
        oracle_model: "test-model".to_string(),
        geocoder_base_url: "http://geocoder.invalid".to_string(),
        geocoder_user_agent: "arcana-test".to_string(),
        timezone_base_url: None,
        ephemeris_base_url: "http://ephemeris.invalid".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Mock payment gateway
// ---------------------------------------------------------------------------

/// In-memory gateway: records every created checkout and serves lookups
/// from a map the test controls.
pub struct MockGateway {
    pub created: Mutex<Vec<CheckoutRequest>>,
    pub records: Mutex<HashMap<String, PaymentRecord>>,
    counter: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            records: Mutex::new(HashMap::new()),
            counter: AtomicUsize::new(0),
        }
    }

    /// The metadata snapshot of the most recently created checkout.
    pub fn last_metadata(&self) -> BTreeMap<String, String> {
        self.created
            .lock()
            .unwrap()
            .last()
            .expect("no checkout was created")
            .metadata
            .clone()
    }

    /// Mark the most recently created checkout with a payment status and
    /// return its id, as if the user completed (or abandoned) the page.
    pub fn complete_last(&self, payment_status: &str) -> String {
        let created = self.created.lock().unwrap();
        let request = created.last().expect("no checkout was created");
        let id = format!("cs_test_{}", created.len());
        self.records.lock().unwrap().insert(
            id.clone(),
            PaymentRecord {
                payment_status: payment_status.to_string(),
                metadata: request.metadata.clone(),
                client_reference_id: Some(request.reference_id.clone()),
            },
        );
        id
    }

    /// Insert a record directly, for tampering tests.
    pub fn insert_record(&self, id: &str, record: PaymentRecord) {
        self.records.lock().unwrap().insert(id.to_string(), record);
    }
}

#[async_trait]
impl CheckoutGateway for MockGateway {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutHandle, GatewayError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().unwrap().push(request.clone());
        Ok(CheckoutHandle {
            id: format!("cs_test_{n}"),
            url: format!("https://checkout.test/pay/cs_test_{n}"),
        })
    }

    async fn fetch_checkout(&self, session_id: &str) -> Result<PaymentRecord, GatewayError> {
        self.records
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or(GatewayError::ApiError {
                status: 404,
                body: "No such checkout session".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Mock generation service
// ---------------------------------------------------------------------------

/// Counts calls and returns a canned reading, or fails when told to.
pub struct MockOracle {
    pub calls: AtomicUsize,
    pub fail: Mutex<bool>,
    pub prompts: Mutex<Vec<GenerationPrompt>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: Mutex::new(false),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl TextGenerator for MockOracle {
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        if *self.fail.lock().unwrap() {
            return Err(OracleError::ApiError {
                status: 500,
                body: "oracle down".to_string(),
            });
        }
        Ok("### A Revelação\n\nO caminho se abre diante de você.".to_string())
    }
}

// ---------------------------------------------------------------------------
// Mock chart collaborators
// ---------------------------------------------------------------------------

/// Knows Lisboa and São Paulo; everything else is not found.
pub struct MockGeocoder;

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, city: &str) -> Result<GeoPoint, AstroError> {
        match city {
            "Lisboa" => Ok(GeoPoint {
                latitude: 38.7,
                longitude: -9.1,
                display_name: "Lisboa, Portugal".to_string(),
            }),
            "São Paulo" => Ok(GeoPoint {
                latitude: -23.55,
                longitude: -46.63,
                display_name: "São Paulo, Brasil".to_string(),
            }),
            other => Err(AstroError::CityNotFound(other.to_string())),
        }
    }
}

/// Fixed longitudes: Sol in Gêmeos, Lua in Libra, ascendant in Sagitário.
pub struct MockEphemeris;

#[async_trait]
impl EphemerisSource for MockEphemeris {
    async fn compute(
        &self,
        _utc: chrono::NaiveDateTime,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Ephemeris, AstroError> {
        let mut points = BTreeMap::new();
        points.insert("Sol".to_string(), 84.0);
        points.insert("Lua".to_string(), 201.0);
        points.insert("Vênus".to_string(), 45.0);
        points.insert("Mercúrio".to_string(), 100.0);
        points.insert("Marte".to_string(), 355.0);
        Ok(Ephemeris {
            points,
            house_cusps: [
                250.0, 280.0, 310.0, 340.0, 10.0, 40.0, 70.0, 100.0, 130.0, 160.0, 190.0, 220.0,
            ],
            ascendant: 250.0,
        })
    }
}

// ---------------------------------------------------------------------------
// App assembly
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub app: Router,
    pub gateway: Arc<MockGateway>,
    pub oracle: Arc<MockOracle>,
}

/// Build the full application router with all middleware layers, backed by
/// mock collaborators. Mirrors the construction in `main.rs` so tests
/// exercise the same stack production uses.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let gateway = Arc::new(MockGateway::new());
    let oracle = Arc::new(MockOracle::new());
    let charts = Arc::new(ChartEngine::new(
        Arc::new(MockGeocoder),
        Arc::new(FixedOffsetResolver(0)),
        Arc::new(MockEphemeris),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        store: SessionStore::new(),
        gateway: gateway.clone(),
        oracle: oracle.clone(),
        charts,
    };

    TestApp {
        app: build_app_router(state, &config),
        gateway,
        oracle,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str, session: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    session: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Empty-body POST (back, checkout, reset).
pub async fn post(app: &Router, uri: &str, session: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// The session id the server issued or echoed on a response.
pub fn session_of(response: &Response<Body>) -> String {
    response
        .headers()
        .get(SESSION_HEADER)
        .expect("response carries no session header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Run the welcome + configure steps of the tarot flow, returning the
/// caller's session id parked on the payment step.
pub async fn tarot_to_payment(app: &Router) -> String {
    let response = post_json(
        app,
        "/api/v1/readings/tarot/welcome",
        None,
        serde_json::json!({ "user_name": "Luna" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = session_of(&response);

    let response = post_json(
        app,
        "/api/v1/readings/tarot/configure",
        Some(&session),
        serde_json::json!({
            "spread_choice": "Passado, Presente e Futuro",
            "reading_style": "Mística e Inspiradora",
            "question": "Devo mudar de cidade?",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session
}

/// Drive the tarot flow through checkout and a paid return; returns the
/// session id sitting on the result step.
pub async fn tarot_paid(harness: &TestApp) -> String {
    let session = tarot_to_payment(&harness.app).await;

    let response = post(
        &harness.app,
        "/api/v1/readings/tarot/checkout",
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let checkout_id = harness.gateway.complete_last("paid");
    let response = get(
        &harness.app,
        &format!("/api/v1/readings/tarot/return?session_id={checkout_id}"),
        Some(&session),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session
}
