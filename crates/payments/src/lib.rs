//! Payment checkout gateway and return reconciliation.
//!
//! Checkout is a redirect to a hosted payment page; the only state that
//! survives the round trip is the metadata attached to the checkout
//! session. [`gateway`] speaks to the provider; [`reconcile`] turns the
//! looked-up payment record back into wizard state.

pub mod gateway;
pub mod reconcile;

pub use gateway::{
    CheckoutGateway, CheckoutHandle, CheckoutRequest, GatewayError, PaymentRecord, StripeGateway,
};
pub use reconcile::{reconcile, ReconcileOutcome};
