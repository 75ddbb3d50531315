//! Astrological analysis catalog.
//!
//! The astrology flow generates one focused interpretation per reading,
//! keyed on a chart point. Each catalog entry maps the user-facing label to
//! the chart point it reads.

use crate::error::CoreError;

/// One selectable analysis: the label shown to the user and the chart
/// point it interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analysis {
    pub label: &'static str,
    /// Chart point key ("Sol", "Lua", "Ascendente", ...).
    pub point: &'static str,
    pub keywords: &'static [&'static str],
    pub explanation: &'static str,
}

pub const ANALYSES: &[Analysis] = &[
    Analysis {
        label: "A Chama da Sua Alma (Análise do Sol)",
        point: "Sol",
        keywords: &["essência", "propósito", "vitalidade", "autoexpressão"],
        explanation: "Revela seu propósito central, sua essência vital e onde sua alma anseia por brilhar.",
    },
    Analysis {
        label: "O Oceano das Suas Emoções (Análise da Lua)",
        point: "Lua",
        keywords: &["emoções", "intuição", "segurança", "subconsciente"],
        explanation: "Explora seu mundo interior, suas necessidades emocionais e o que lhe traz segurança.",
    },
    Analysis {
        label: "Sua Máscara e Sua Missão (Análise do Ascendente)",
        point: "Ascendente",
        keywords: &["jornada", "personalidade", "primeira impressão"],
        explanation: "Descreve a energia que você projeta para o mundo e o caminho de evolução da sua jornada.",
    },
    Analysis {
        label: "O Ímã do Seu Coração (Análise de Vênus)",
        point: "Vênus",
        keywords: &["amor", "valores", "relacionamentos", "harmonia"],
        explanation: "Desvenda seus padrões de amor, o que você valoriza e como você atrai e expressa afeto.",
    },
    Analysis {
        label: "A Voz da Sua Mente (Análise de Mercúrio)",
        point: "Mercúrio",
        keywords: &["comunicação", "pensamento", "aprendizado", "intelecto"],
        explanation: "Mapeia seu estilo de comunicação, sua forma de pensar e como você aprende.",
    },
    Analysis {
        label: "O Guerreiro Interior (Análise de Marte)",
        point: "Marte",
        keywords: &["ação", "coragem", "desejo", "assertividade"],
        explanation: "Ilumina sua força de ação, como você persegue desejos e lida com conflitos.",
    },
];

/// The fixed set of chart points every computed chart must contain.
pub const CHART_POINTS: &[&str] = &["Sol", "Lua", "Ascendente", "Vênus", "Mercúrio", "Marte"];

/// Look up an analysis by its user-facing label.
pub fn find(label: &str) -> Result<&'static Analysis, CoreError> {
    ANALYSES
        .iter()
        .find(|a| a.label == label)
        .ok_or_else(|| CoreError::NotFound {
            entity: "Analysis",
            id: label.to_string(),
        })
}
