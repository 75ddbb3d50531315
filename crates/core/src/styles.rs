//! Reading-style catalogs.
//!
//! Each flow offers a fixed set of named styles shaping the voice of the
//! generated text. The labels travel through the payment metadata snapshot,
//! so membership is validated both on capture and on restore.

use crate::error::CoreError;
use crate::session::ReadingKind;

/// A selectable style: label plus the explanation shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub label: &'static str,
    pub explanation: &'static str,
}

pub const TAROT_STYLES: &[Style] = &[
    Style {
        label: "Mística e Inspiradora",
        explanation: "Conecta-se ao simbolismo profundo do tarô, enfatizando o mistério e a conexão com o invisível.",
    },
    Style {
        label: "Prática e Direta",
        explanation: "Mensagens objetivas e aplicáveis ao dia a dia, priorizando conselhos concretos e ações imediatas.",
    },
    Style {
        label: "Terapêutica e Reflexiva",
        explanation: "Explora as cartas como espelhos da mente e das emoções, promovendo autoconhecimento e acolhimento.",
    },
    Style {
        label: "Poética e Introspectiva",
        explanation: "Transforma a leitura em uma narrativa sensível e literária, com ricas metáforas e imagens.",
    },
];

pub const ASTRO_STYLES: &[Style] = &[
    Style {
        label: "Poeta Estelar",
        explanation: "Uma interpretação lírica e metafórica, focada na beleza e na magia do seu mapa astral.",
    },
    Style {
        label: "Sábio Ancestral",
        explanation: "Uma voz de sabedoria profunda e atemporal, conectando seu mapa a lições universais da alma.",
    },
    Style {
        label: "Conselheiro Pragmático",
        explanation: "Uma abordagem direta e prática, traduzindo os símbolos astrais em conselhos claros e acionáveis.",
    },
];

pub const DREAM_STYLES: &[Style] = &[
    Style {
        label: "Xamânico-Espiritual",
        explanation: "Foco em animais de poder, elementos da natureza e a jornada da alma, em conexão com a sabedoria ancestral.",
    },
    Style {
        label: "Psicológico-Junguiano",
        explanation: "Desvenda os arquétipos universais e o inconsciente coletivo presentes no sonho.",
    },
    Style {
        label: "Simbólico-Moderno",
        explanation: "Uma abordagem prática e contemporânea, conectando os símbolos do sonho ao dia a dia.",
    },
];

/// The style catalog for a given flow.
pub fn catalog(kind: ReadingKind) -> &'static [Style] {
    match kind {
        ReadingKind::Tarot => TAROT_STYLES,
        ReadingKind::Astro => ASTRO_STYLES,
        ReadingKind::Dream => DREAM_STYLES,
    }
}

/// Validate that a style label belongs to the flow's catalog.
pub fn find(kind: ReadingKind, label: &str) -> Result<&'static Style, CoreError> {
    catalog(kind)
        .iter()
        .find(|s| s.label == label)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Style",
            id: label.to_string(),
        })
}
