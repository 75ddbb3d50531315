//! Session records for the three reading flows.
//!
//! Each flow gets its own typed record instead of a loose key-value bag, so
//! a missing or renamed field is a compile error rather than a blank page.
//! [`ReadingSession`] sums the three and exposes the shared lifecycle:
//! step, display name, payment verification, the once-only result.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::deck::DrawnCard;
use crate::error::CoreError;
use crate::step::WizardStep;

// ---------------------------------------------------------------------------
// Reading kinds
// ---------------------------------------------------------------------------

/// The three reading flows. Doubles as the session-store namespace, so
/// flows sharing a process never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingKind {
    Tarot,
    Astro,
    Dream,
}

impl ReadingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tarot => "tarot",
            Self::Astro => "astro",
            Self::Dream => "dream",
        }
    }

    /// Parse a flow identifier from a URL segment.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "tarot" => Ok(Self::Tarot),
            "astro" => Ok(Self::Astro),
            "dream" => Ok(Self::Dream),
            other => Err(CoreError::NotFound {
                entity: "Reading flow",
                id: other.to_string(),
            }),
        }
    }

    /// User-facing title of the flow.
    pub fn title(self) -> &'static str {
        match self {
            Self::Tarot => "Tarô Místico",
            Self::Astro => "Ecos Estelares",
            Self::Dream => "Intérprete Xamânico",
        }
    }
}

// ---------------------------------------------------------------------------
// Content units
// ---------------------------------------------------------------------------

/// A computed chart placement: one point's sign and house.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub sign: String,
    pub house: u8,
}

/// A full computed chart, keyed by point name ("Sol", "Lua", ...).
pub type ChartData = BTreeMap<String, Placement>;

// ---------------------------------------------------------------------------
// Shared fields
// ---------------------------------------------------------------------------

/// Fields every flow session carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCommon {
    pub step: WizardStep,
    pub user_name: Option<String>,
    /// Set only after the payment provider confirmed a paid record.
    pub payment_verified: bool,
    /// Generated at most once; presence short-circuits regeneration.
    pub final_result: Option<String>,
}

// ---------------------------------------------------------------------------
// Per-flow sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TarotSession {
    pub common: SessionCommon,
    pub spread: Option<String>,
    pub style: Option<String>,
    pub question: String,
    pub drawn: Vec<DrawnCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstroSession {
    pub common: SessionCommon,
    pub dob: Option<NaiveDate>,
    pub tob: Option<NaiveTime>,
    pub city: Option<String>,
    pub analysis: Option<String>,
    pub style: Option<String>,
    pub chart: ChartData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DreamSession {
    pub common: SessionCommon,
    pub dream_title: Option<String>,
    pub dream_description: Option<String>,
    pub style: Option<String>,
}

/// Default title when the dreamer leaves theirs blank.
pub const UNTITLED_DREAM: &str = "Sonho Sem Título";

// ---------------------------------------------------------------------------
// Sum type
// ---------------------------------------------------------------------------

/// One flow's wizard state. The variant tag is the flow namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum ReadingSession {
    Tarot(TarotSession),
    Astro(AstroSession),
    Dream(DreamSession),
}

impl ReadingSession {
    /// A fresh session for a flow, parked on the welcome step.
    pub fn new(kind: ReadingKind) -> Self {
        match kind {
            ReadingKind::Tarot => Self::Tarot(TarotSession::default()),
            ReadingKind::Astro => Self::Astro(AstroSession::default()),
            ReadingKind::Dream => Self::Dream(DreamSession::default()),
        }
    }

    pub fn kind(&self) -> ReadingKind {
        match self {
            Self::Tarot(_) => ReadingKind::Tarot,
            Self::Astro(_) => ReadingKind::Astro,
            Self::Dream(_) => ReadingKind::Dream,
        }
    }

    pub fn common(&self) -> &SessionCommon {
        match self {
            Self::Tarot(s) => &s.common,
            Self::Astro(s) => &s.common,
            Self::Dream(s) => &s.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut SessionCommon {
        match self {
            Self::Tarot(s) => &mut s.common,
            Self::Astro(s) => &mut s.common,
            Self::Dream(s) => &mut s.common,
        }
    }

    /// Display name with the original's fallback.
    pub fn display_name(&self) -> &str {
        self.common().user_name.as_deref().unwrap_or("Viajante")
    }

    /// Store the generated result, enforcing the compute-once invariant.
    pub fn store_result(&mut self, text: String) -> Result<(), CoreError> {
        let common = self.common_mut();
        if common.final_result.is_some() {
            return Err(CoreError::Conflict(
                "A reading result has already been generated for this session".to_string(),
            ));
        }
        common.final_result = Some(text);
        Ok(())
    }

    /// Clear every flow field plus the shared ones and return to welcome.
    pub fn reset(&mut self) {
        *self = Self::new(self.kind());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
