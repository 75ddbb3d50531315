//! Tarot spread catalog.
//!
//! A spread is a named configuration: how many cards to draw and what each
//! position means. Position labels and card counts always agree; the
//! catalog is static data validated by tests.

use crate::error::CoreError;

/// A named card layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spread {
    pub name: &'static str,
    /// Ordered position labels; `positions.len()` is the card count.
    pub positions: &'static [&'static str],
}

impl Spread {
    /// Number of cards this spread draws.
    pub fn card_count(&self) -> usize {
        self.positions.len()
    }
}

/// All supported spreads.
pub const SPREADS: &[Spread] = &[
    Spread {
        name: "Conselho do Dia",
        positions: &["Seu Conselho"],
    },
    Spread {
        name: "Passado, Presente e Futuro",
        positions: &["O Passado", "O Presente", "O Futuro"],
    },
    Spread {
        name: "Tiragem Temática",
        positions: &["Contexto Atual", "O Desafio", "O Conselho"],
    },
    Spread {
        name: "Conselho Espiritual",
        positions: &["Lição a Aprender", "Energia a Integrar", "Bloqueio a Liberar"],
    },
    Spread {
        name: "Caminhos da Decisão",
        positions: &[
            "Caminho A: Situação",
            "Caminho A: Resultado",
            "Caminho B: Situação",
            "Caminho B: Resultado",
        ],
    },
    Spread {
        name: "Jornada do Autoconhecimento",
        positions: &[
            "Eu Exterior",
            "Eu Interior",
            "Meu Desafio",
            "Meu Potencial",
            "Equilíbrio",
        ],
    },
    Spread {
        name: "Cruz Celta",
        positions: &[
            "1. Situação Atual",
            "2. Obstáculo",
            "3. Base",
            "4. Passado",
            "5. Objetivo",
            "6. Futuro",
            "7. Atitude",
            "8. Ambiente",
            "9. Esperanças/Medos",
            "10. Resultado",
        ],
    },
];

/// Look up a spread by name.
pub fn find(name: &str) -> Result<&'static Spread, CoreError> {
    SPREADS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Spread",
            id: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_seven_spreads() {
        assert_eq!(SPREADS.len(), 7);
    }

    #[test]
    fn position_count_matches_card_count() {
        for spread in SPREADS {
            assert_eq!(
                spread.positions.len(),
                spread.card_count(),
                "spread '{}' positions/count mismatch",
                spread.name
            );
            assert!(!spread.positions.is_empty());
        }
    }

    #[test]
    fn three_card_spread_has_expected_labels() {
        let spread = find("Passado, Presente e Futuro").unwrap();
        assert_eq!(spread.card_count(), 3);
        assert_eq!(spread.positions, ["O Passado", "O Presente", "O Futuro"]);
    }

    #[test]
    fn celtic_cross_draws_ten() {
        assert_eq!(find("Cruz Celta").unwrap().card_count(), 10);
    }

    #[test]
    fn unknown_spread_is_not_found() {
        assert!(find("Tiragem Inexistente").is_err());
    }
}
