//! Pure reconciliation of a payment-return lookup.
//!
//! The return handler fetches the checkout session and hands the result
//! here. Every possible shape maps to exactly one outcome; the caller only
//! has to apply it to the wizard state.

use arcana_core::session::{ReadingKind, ReadingSession};
use arcana_core::snapshot;

use crate::gateway::{GatewayError, PaymentRecord};

/// What the payment return means for the wizard.
#[derive(Debug)]
pub enum ReconcileOutcome {
    /// Payment confirmed; the session rebuilt from the metadata snapshot
    /// is ready to advance to the result step.
    Paid(ReadingSession),
    /// The checkout exists but was not paid; stay on the payment step.
    NotPaid,
    /// Lookup or snapshot restore failed; fall back to the welcome step
    /// with this user-safe message.
    Error(String),
}

/// Message shown when the provider lookup or restore fails.
pub const VERIFY_FAILED_MESSAGE: &str =
    "Não foi possível verificar seu pagamento. Por favor, tente novamente.";

/// Map a checkout lookup to its wizard outcome.
pub fn reconcile(
    expected: ReadingKind,
    lookup: Result<PaymentRecord, GatewayError>,
) -> ReconcileOutcome {
    let record = match lookup {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!(flow = expected.as_str(), error = %err, "payment lookup failed");
            return ReconcileOutcome::Error(VERIFY_FAILED_MESSAGE.to_string());
        }
    };

    if !record.is_paid() {
        return ReconcileOutcome::NotPaid;
    }

    match snapshot::restore(expected, &record.metadata) {
        Ok(session) => ReconcileOutcome::Paid(session),
        Err(err) => {
            tracing::warn!(flow = expected.as_str(), error = %err, "snapshot restore failed");
            ReconcileOutcome::Error(VERIFY_FAILED_MESSAGE.to_string())
        }
    }
}
