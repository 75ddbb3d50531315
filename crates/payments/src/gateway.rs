//! Checkout gateway trait and the Stripe implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

/// Wall-clock limit for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the payment-provider layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Payment provider error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but was missing a required field.
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Everything needed to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Provider price identifier for the flow's product.
    pub price_id: String,
    /// Return URL; may contain the provider's session-id placeholder.
    pub success_url: String,
    /// URL the provider sends the user to on abandon.
    pub cancel_url: String,
    /// Our session identifier, echoed back by the provider.
    pub reference_id: String,
    /// The configuration snapshot that must survive the redirect.
    pub metadata: BTreeMap<String, String>,
}

/// A created checkout session: where to send the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutHandle {
    /// Provider-assigned checkout session id.
    pub id: String,
    /// Hosted payment page URL.
    pub url: String,
}

/// A looked-up checkout session after the user returns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentRecord {
    /// Provider payment status, e.g. `paid` or `unpaid`.
    pub payment_status: String,
    /// The metadata snapshot attached at checkout creation.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Our session identifier echoed back, if the provider kept it.
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// A payment provider that can open checkouts and report on them.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_checkout(&self, request: &CheckoutRequest)
        -> Result<CheckoutHandle, GatewayError>;

    async fn fetch_checkout(&self, session_id: &str) -> Result<PaymentRecord, GatewayError>;
}

// ---------------------------------------------------------------------------
// Stripe
// ---------------------------------------------------------------------------

/// Stripe Checkout over its form-encoded REST API.
pub struct StripeGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Result<Self, GatewayError> {
        Self::with_base_url("https://api.stripe.com".to_string(), secret_key)
    }

    /// Point the gateway at a different base URL (stripe-mock, tests).
    pub fn with_base_url(base_url: String, secret_key: String) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }

    /// Flatten a checkout request into Stripe's form-encoded parameters.
    fn create_params(request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("line_items[0][price]".to_string(), request.price_id.clone()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "client_reference_id".to_string(),
                request.reference_id.clone(),
            ),
        ];
        for (key, value) in &request.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }
        params
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutHandle, GatewayError> {
        tracing::debug!(
            reference_id = %request.reference_id,
            price_id = %request.price_id,
            "creating checkout session"
        );

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&Self::create_params(request))
            .send()
            .await?;

        let handle: CheckoutHandle = Self::ensure_success(response).await?.json().await?;
        if handle.url.is_empty() {
            return Err(GatewayError::Malformed(
                "checkout session carried no redirect URL".to_string(),
            ));
        }
        Ok(handle)
    }

    async fn fetch_checkout(&self, session_id: &str) -> Result<PaymentRecord, GatewayError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{session_id}",
                self.base_url
            ))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        Ok(Self::ensure_success(response).await?.json().await?)
    }
}
