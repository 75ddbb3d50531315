//! Wizard step state machine.
//!
//! Every reading flow walks the same four steps: welcome → configure →
//! payment → result, with the external payment redirect sitting between
//! `payment` and `result`. Transitions are driven by explicit events so
//! adding a step cannot silently fall through a string comparison.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The four wizard positions of a reading flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Welcome,
    Configure,
    Payment,
    Result,
}

impl WizardStep {
    /// Convert to the wire/session string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Configure => "configure",
            Self::Payment => "payment",
            Self::Result => "result",
        }
    }

    /// Parse a step string, falling back to `Welcome` for anything
    /// unrecognized. Out-of-band values must never strand a session on a
    /// nonexistent page.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "configure" => Self::Configure,
            "payment" => Self::Payment,
            "result" => Self::Result,
            _ => Self::Welcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Events and transitions
// ---------------------------------------------------------------------------

/// Events that move a session between wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Welcome-stage input validated and captured.
    InputAccepted,
    /// Configuration confirmed; proceed to the payment portal.
    Confirm,
    /// One step backwards (configure → welcome, payment → configure).
    Back,
    /// Return from the payment provider with a paid record.
    ReturnPaid,
    /// Return from the payment provider with an unpaid record.
    ReturnNotPaid,
    /// The payment-record lookup itself failed; restart from scratch.
    ReturnLookupFailed,
    /// Explicit user reset.
    Reset,
}

/// Apply an event to the current step, returning the next step.
///
/// Invalid combinations (e.g. confirming from the welcome page) are
/// validation errors: the session stays where it is.
pub fn apply(step: WizardStep, event: StepEvent) -> Result<WizardStep, CoreError> {
    use StepEvent::*;
    use WizardStep::*;

    match (step, event) {
        (Welcome, InputAccepted) => Ok(Configure),
        (Configure, Confirm) => Ok(Payment),
        (Configure, Back) => Ok(Welcome),
        (Payment, Back) => Ok(Configure),
        (Payment, ReturnPaid) => Ok(Result),
        (Payment, ReturnNotPaid) => Ok(Payment),
        (_, ReturnLookupFailed) => Ok(Welcome),
        (_, Reset) => Ok(Welcome),
        (current, _) => Err(CoreError::Validation(format!(
            "Cannot apply {event:?} while on the '{}' step",
            current.as_str()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
