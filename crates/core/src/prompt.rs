//! Prompt assembly for the generation service.
//!
//! Each flow builds a [`GenerationPrompt`] from its validated session data:
//! a persona system message, a structured user message describing the
//! reading, and the sampling parameters. The word-count guideline and token
//! ceiling come from [`LengthTier`], keyed on the number of content units.

use std::fmt::Write as _;

use crate::analysis::Analysis;
use crate::deck::DrawnCard;
use crate::error::CoreError;
use crate::session::Placement;
use crate::spread::Spread;
use crate::styles::Style;
use crate::tier::LengthTier;

/// Question used when the querent leaves theirs blank.
pub const DEFAULT_QUESTION: &str = "Uma orientação geral para o meu momento presente.";

/// Sampling temperature for tarot and astrology readings.
pub const READING_TEMPERATURE: f64 = 0.75;

/// Sampling temperature and ceiling for dream interpretations.
pub const DREAM_TEMPERATURE: f64 = 0.8;
pub const DREAM_MAX_TOKENS: u32 = 1500;

/// A fully assembled request for the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

// ---------------------------------------------------------------------------
// Tarot
// ---------------------------------------------------------------------------

/// Build the tarot prompt. Fails if the drawn cards do not match the
/// spread's positions.
pub fn tarot_prompt(
    user_name: &str,
    spread: &Spread,
    drawn: &[DrawnCard],
    style: &Style,
    question: &str,
) -> Result<GenerationPrompt, CoreError> {
    if drawn.len() != spread.card_count() {
        return Err(CoreError::Internal(format!(
            "spread '{}' expects {} cards, got {}",
            spread.name,
            spread.card_count(),
            drawn.len()
        )));
    }

    let question = effective_question(question);
    let tier = LengthTier::for_unit_count(drawn.len());

    let system = format!(
        "Você é um tarólogo experiente e acolhedor, no estilo '{}'. {} \
         Escreva em português, em markdown, usando títulos '### ' para cada \
         seção e negrito para os nomes das cartas. Nunca mencione que é uma \
         inteligência artificial.",
        style.label, style.explanation
    );

    let mut user = format!(
        "Sua missão é interpretar a tiragem '{}' para {user_name}.\n\
         Pergunta do consulente: {question}\n\nCartas reveladas:\n",
        spread.name
    );
    for (position, card) in spread.positions.iter().zip(drawn) {
        let detail = card.card()?;
        let _ = writeln!(
            user,
            "- {position}: **{}** ({}) — palavras-chave: {}. Significado: {}",
            card.name,
            card.orientation(),
            detail.keywords.join(", "),
            card.meaning()?,
        );
    }
    let _ = write!(
        user,
        "\nTeça as cartas em uma narrativa única, posição a posição, e \
         encerre com um conselho prático. Extensão do texto: {}",
        tier.guideline()
    );

    Ok(GenerationPrompt {
        system,
        user,
        max_tokens: tier.max_tokens(),
        temperature: READING_TEMPERATURE,
    })
}

/// Blank questions fall back to a general guidance request.
pub fn effective_question(question: &str) -> &str {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        DEFAULT_QUESTION
    } else {
        trimmed
    }
}

// ---------------------------------------------------------------------------
// Astrology
// ---------------------------------------------------------------------------

/// Build the astrology prompt for a single focused analysis of one chart
/// point.
pub fn astro_prompt(
    user_name: &str,
    analysis: &Analysis,
    placement: &Placement,
    style: &Style,
) -> GenerationPrompt {
    let tier = LengthTier::for_unit_count(1);

    let system = format!(
        "Você é um astrólogo na voz do arquétipo '{}'. {} Escreva em \
         português, em markdown, usando títulos '### ' e negrito para os \
         pontos do mapa. Nunca mencione que é uma inteligência artificial.",
        style.label, style.explanation
    );

    let user = format!(
        "Sua missão é a análise '{}' para {user_name}.\n\
         Posição no mapa natal: **{}** em {} na casa {}.\n\
         Temas a tecer: {}.\n\n\
         Interprete a combinação de signo e casa como um retrato vivo, e \
         encerre com um convite à reflexão. Extensão do texto: {}",
        analysis.label,
        analysis.point,
        placement.sign,
        placement.house,
        analysis.keywords.join(", "),
        tier.guideline()
    );

    GenerationPrompt {
        system,
        user,
        max_tokens: tier.max_tokens(),
        temperature: READING_TEMPERATURE,
    }
}

// ---------------------------------------------------------------------------
// Dream
// ---------------------------------------------------------------------------

/// Build the dream-interpretation prompt.
pub fn dream_prompt(
    user_name: &str,
    dream_title: &str,
    dream_description: &str,
    style: &Style,
) -> GenerationPrompt {
    let system = format!(
        "Você é um intérprete de sonhos na tradição '{}'. {} Escreva em \
         português, em markdown, usando títulos '### ' e negrito para os \
         símbolos centrais. Nunca mencione que é uma inteligência artificial.",
        style.label, style.explanation
    );

    let user = format!(
        "Sua missão é interpretar o sonho de {user_name}.\n\
         Título do sonho: {dream_title}\n\
         Relato: {dream_description}\n\n\
         Identifique os símbolos centrais, interprete-os na tradição \
         escolhida e encerre com uma orientação para os próximos dias."
    );

    GenerationPrompt {
        system,
        user,
        max_tokens: DREAM_MAX_TOKENS,
        temperature: DREAM_TEMPERATURE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
