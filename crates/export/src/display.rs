//! Flatten a session into a render-target-neutral model.
//!
//! Rendering is read-only and must never panic on a partial session, so
//! every missing value falls back to a placeholder instead of erroring.

use arcana_core::markup::{self, DocBlock};
use arcana_core::session::ReadingSession;

/// Placeholder for values a partial session has not filled in.
const UNSET: &str = "—";

/// One content unit of the reading (a drawn card, a chart placement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitView {
    pub heading: String,
    pub detail: String,
}

/// Everything a render target needs to show a finished reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayModel {
    pub title: String,
    pub user_name: String,
    /// Label/value pairs describing the chosen configuration.
    pub config_lines: Vec<(String, String)>,
    pub units: Vec<UnitView>,
    /// The generated text, parsed into blocks.
    pub interpretation: Vec<DocBlock>,
}

/// Build the display model for a session. Missing configuration renders
/// as placeholders; a missing result renders as an empty interpretation.
pub fn render(session: &ReadingSession) -> DisplayModel {
    let mut config_lines = Vec::new();
    let mut units = Vec::new();

    match session {
        ReadingSession::Tarot(s) => {
            push(&mut config_lines, "Tiragem", s.spread.as_deref());
            push(&mut config_lines, "Estilo", s.style.as_deref());
            config_lines.push((
                "Pergunta".to_string(),
                arcana_core::prompt::effective_question(&s.question).to_string(),
            ));

            let positions: &[&str] = match s.spread.as_deref() {
                Some(name) => arcana_core::spread::find(name)
                    .map(|sp| sp.positions)
                    .unwrap_or(&[]),
                None => &[],
            };
            for (i, card) in s.drawn.iter().enumerate() {
                let heading = positions
                    .get(i)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| format!("Carta {}", i + 1));
                units.push(UnitView {
                    heading,
                    detail: format!("{} ({})", card.name, card.orientation()),
                });
            }
        }
        ReadingSession::Astro(s) => {
            config_lines.push((
                "Nascimento".to_string(),
                match (s.dob, s.tob) {
                    (Some(d), Some(t)) => {
                        format!("{} às {}", d.format("%d/%m/%Y"), t.format("%H:%M"))
                    }
                    (Some(d), None) => d.format("%d/%m/%Y").to_string(),
                    _ => UNSET.to_string(),
                },
            ));
            push(&mut config_lines, "Cidade", s.city.as_deref());
            push(&mut config_lines, "Análise", s.analysis.as_deref());
            push(&mut config_lines, "Estilo", s.style.as_deref());

            for (point, placement) in &s.chart {
                units.push(UnitView {
                    heading: point.clone(),
                    detail: format!("{} na casa {}", placement.sign, placement.house),
                });
            }
        }
        ReadingSession::Dream(s) => {
            push(&mut config_lines, "Sonho", s.dream_title.as_deref());
            push(&mut config_lines, "Estilo", s.style.as_deref());
        }
    }

    let interpretation = session
        .common()
        .final_result
        .as_deref()
        .map(markup::parse)
        .unwrap_or_default();

    DisplayModel {
        title: session.kind().title().to_string(),
        user_name: session.display_name().to_string(),
        config_lines,
        units,
        interpretation,
    }
}

fn push(lines: &mut Vec<(String, String)>, label: &str, value: Option<&str>) {
    lines.push((
        label.to_string(),
        value.unwrap_or(UNSET).to_string(),
    ));
}
