//! Output-length budget tiers.
//!
//! The generated text gets a word-count instruction plus a hard token
//! ceiling, both keyed on the number of content units in the reading. The
//! instruction tells the model to conclude naturally inside the budget; the
//! ceiling is the safety net if it does not.

use serde::{Deserialize, Serialize};

/// Length budget selected by content-unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthTier {
    /// 1 unit.
    Short,
    /// 2–3 units.
    Medium,
    /// 4–5 units.
    Long,
    /// More than 5 units (e.g. the ten-card Cruz Celta).
    Extended,
}

impl LengthTier {
    /// Select the tier for a reading with `units` content units.
    pub fn for_unit_count(units: usize) -> Self {
        match units {
            0 | 1 => Self::Short,
            2..=3 => Self::Medium,
            4..=5 => Self::Long,
            _ => Self::Extended,
        }
    }

    /// Word-count instruction embedded in the prompt.
    pub fn guideline(self) -> &'static str {
        match self {
            Self::Short => "entre 150 e 250 palavras.",
            Self::Medium => "entre 400 e 600 palavras.",
            Self::Long => "entre 700 e 800 palavras.",
            Self::Extended => "entre 900 e 1.200 palavras.",
        }
    }

    /// Hard output ceiling passed to the generation service.
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Short => 500,
            Self::Medium => 1000,
            Self::Long => 1300,
            Self::Extended => 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(LengthTier::for_unit_count(1), LengthTier::Short);
        assert_eq!(LengthTier::for_unit_count(2), LengthTier::Medium);
        assert_eq!(LengthTier::for_unit_count(3), LengthTier::Medium);
        assert_eq!(LengthTier::for_unit_count(4), LengthTier::Long);
        assert_eq!(LengthTier::for_unit_count(5), LengthTier::Long);
        assert_eq!(LengthTier::for_unit_count(6), LengthTier::Extended);
        assert_eq!(LengthTier::for_unit_count(10), LengthTier::Extended);
    }

    #[test]
    fn zero_units_uses_short_budget() {
        assert_eq!(LengthTier::for_unit_count(0), LengthTier::Short);
    }

    #[test]
    fn caps_grow_with_tier() {
        assert!(LengthTier::Short.max_tokens() < LengthTier::Medium.max_tokens());
        assert!(LengthTier::Medium.max_tokens() < LengthTier::Long.max_tokens());
        assert!(LengthTier::Long.max_tokens() < LengthTier::Extended.max_tokens());
    }

    #[test]
    fn three_card_spread_gets_medium_budget() {
        let tier = LengthTier::for_unit_count(3);
        assert_eq!(tier, LengthTier::Medium);
        assert_eq!(tier.max_tokens(), 1000);
        assert_eq!(tier.guideline(), "entre 400 e 600 palavras.");
    }
}
