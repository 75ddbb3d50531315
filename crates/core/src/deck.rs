//! Static tarot card catalog and the draw model.
//!
//! The catalog ships the 22 major arcana. Card text is content data; the
//! logic that matters here is the draw: N unique cards without replacement,
//! each with an independent 50/50 orientation flag.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One card definition in the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub name: &'static str,
    pub number: u8,
    pub keywords: &'static [&'static str],
    pub upright: &'static str,
    pub reversed: &'static str,
}

/// A card drawn into a reading: a reference into the catalog plus the
/// orientation decided at draw time. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub name: String,
    pub reversed: bool,
}

impl DrawnCard {
    /// Resolve the static card definition. Drawn cards always originate
    /// from the catalog, so a miss is a corrupted session.
    pub fn card(&self) -> Result<&'static Card, CoreError> {
        DECK.iter()
            .find(|c| c.name == self.name)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Card",
                id: self.name.clone(),
            })
    }

    /// Orientation label as shown to the user.
    pub fn orientation(&self) -> &'static str {
        if self.reversed {
            "Invertida"
        } else {
            "Reta"
        }
    }

    /// Base meaning for the drawn orientation.
    pub fn meaning(&self) -> Result<&'static str, CoreError> {
        let card = self.card()?;
        Ok(if self.reversed {
            card.reversed
        } else {
            card.upright
        })
    }
}

/// Draw `n` unique cards without replacement using the thread RNG.
pub fn draw(n: usize) -> Result<Vec<DrawnCard>, CoreError> {
    draw_with(&mut rand::rng(), n)
}

/// Draw `n` unique cards without replacement from the catalog.
///
/// Requesting more cards than the catalog holds is a configuration error,
/// never a runtime retry.
pub fn draw_with<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<DrawnCard>, CoreError> {
    if n > DECK.len() {
        return Err(CoreError::Internal(format!(
            "Cannot draw {n} cards from a deck of {}",
            DECK.len()
        )));
    }

    let picked = rand::seq::index::sample(rng, DECK.len(), n);
    Ok(picked
        .iter()
        .map(|i| DrawnCard {
            name: DECK[i].name.to_string(),
            reversed: rng.random_bool(0.5),
        })
        .collect())
}

/// The major arcana.
pub const DECK: &[Card] = &[
    Card {
        name: "O Louco",
        number: 0,
        keywords: &["inocência", "novo começo", "espontaneidade", "fé"],
        upright: "Inocência pura, novos começos cheios de potencial, fé no desconhecido e a aventura da alma dando seu primeiro passo.",
        reversed: "Inconsequência, riscos desnecessários, medo de mudanças e resistência ao chamado da alma.",
    },
    Card {
        name: "O Mago",
        number: 1,
        keywords: &["manifestação", "poder pessoal", "foco", "alquimia"],
        upright: "Poder de manifestação através da vontade focada; ação consciente que transforma sonhos em realidade.",
        reversed: "Manipulação das energias para fins egoístas, ilusões e potencial desperdiçado por falta de foco.",
    },
    Card {
        name: "A Sacerdotisa",
        number: 2,
        keywords: &["intuição", "mistério", "sabedoria interior", "receptividade"],
        upright: "Intuição profunda que revela verdades ocultas; conhecimento que vem do silêncio interior.",
        reversed: "Desconexão com a intuição, segredos que confundem e racionalização excessiva que afasta da sabedoria.",
    },
    Card {
        name: "A Imperatriz",
        number: 3,
        keywords: &["criatividade", "abundância", "natureza", "fertilidade"],
        upright: "Criatividade que floresce em abundância; energia maternal que nutre o crescimento em todos os aspectos da vida.",
        reversed: "Bloqueio criativo, dependência emocional e escassez onde deveria haver abundância.",
    },
    Card {
        name: "O Imperador",
        number: 4,
        keywords: &["autoridade", "estrutura", "liderança", "ordem"],
        upright: "Autoridade natural baseada na sabedoria; estrutura e disciplina que constroem o futuro.",
        reversed: "Controle excessivo nascido do medo, rigidez e autoritarismo que aliena.",
    },
    Card {
        name: "O Hierofante",
        number: 5,
        keywords: &["tradição", "ensino", "orientação espiritual"],
        upright: "Sabedoria tradicional que orienta o crescimento; orientação espiritual através de mentores.",
        reversed: "Rebelião necessária contra dogmas limitantes; busca por caminhos espirituais alternativos.",
    },
    Card {
        name: "Os Amantes",
        number: 6,
        keywords: &["amor", "escolhas", "união", "harmonia"],
        upright: "Amor que une em harmonia; escolhas conscientes baseadas no coração e em valores profundos.",
        reversed: "Desarmonia nos relacionamentos e escolhas baseadas no medo ou na conveniência.",
    },
    Card {
        name: "A Carruagem",
        number: 7,
        keywords: &["determinação", "controle", "vitória", "direção"],
        upright: "Determinação inabalável que supera obstáculos; direção clara rumo aos objetivos.",
        reversed: "Perda de controle, falta de direção e energia dispersa em múltiplas frentes.",
    },
    Card {
        name: "A Força",
        number: 8,
        keywords: &["coragem interior", "compaixão", "autocontrole", "paciência"],
        upright: "Força interior que vence pela gentileza; coragem que nasce da compaixão e do autocontrole.",
        reversed: "Insegurança mascarada por agressividade e falta de autocontrole emocional.",
    },
    Card {
        name: "O Eremita",
        number: 9,
        keywords: &["introspecção", "sabedoria", "busca", "iluminação"],
        upright: "Introspecção profunda que revela verdades essenciais; orientação que vem do silêncio e da reflexão.",
        reversed: "Isolamento que vira fuga da realidade e solidão que gera amargura.",
    },
    Card {
        name: "A Roda da Fortuna",
        number: 10,
        keywords: &["destino", "ciclos", "mudança", "oportunidade"],
        upright: "Ciclos naturais trazendo novas oportunidades; mudanças que elevam a consciência.",
        reversed: "Resistência às mudanças necessárias e oportunidades perdidas por falta de percepção.",
    },
    Card {
        name: "A Justiça",
        number: 11,
        keywords: &["equilíbrio", "verdade", "causa e efeito", "integridade"],
        upright: "Equilíbrio entre dar e receber; decisões baseadas na integridade e verdade que liberta.",
        reversed: "Injustiça que gera desequilíbrio e decisões distorcidas por parcialidade.",
    },
    Card {
        name: "O Enforcado",
        number: 12,
        keywords: &["rendição", "perspectiva", "pausa", "entrega"],
        upright: "Rendição que abre novas perspectivas; pausa necessária para reflexão profunda.",
        reversed: "Resistência teimosa às mudanças e sacrifícios que não trazem crescimento.",
    },
    Card {
        name: "A Morte",
        number: 13,
        keywords: &["transformação", "fim de ciclo", "renascimento"],
        upright: "Transformação profunda; o fim necessário de um ciclo abrindo espaço para o renascimento.",
        reversed: "Medo da mudança que causa estagnação; apego a situações que já não servem.",
    },
    Card {
        name: "A Temperança",
        number: 14,
        keywords: &["equilíbrio", "moderação", "paciência", "propósito"],
        upright: "Equilíbrio e moderação que harmonizam os opostos; paciência alinhada ao propósito superior.",
        reversed: "Excesso e impaciência que sabotam o processo; desalinhamento com o propósito.",
    },
    Card {
        name: "O Diabo",
        number: 15,
        keywords: &["apego", "sombra", "vícios", "libertação"],
        upright: "Correntes autoimpostas, apegos e padrões que aprisionam pedindo consciência.",
        reversed: "Libertação das correntes; quebra de padrões destrutivos através da consciência.",
    },
    Card {
        name: "A Torre",
        number: 16,
        keywords: &["ruptura", "despertar", "mudança súbita"],
        upright: "Ruptura súbita de estruturas falsas; despertar que liberta ainda que doa.",
        reversed: "Medo das mudanças necessárias; adiamento de transformações inevitáveis.",
    },
    Card {
        name: "A Estrela",
        number: 17,
        keywords: &["esperança", "inspiração", "renovação", "fé"],
        upright: "Esperança renovada e inspiração; conexão com a orientação superior após a tempestade.",
        reversed: "Desespero que obscurece o futuro e desconexão com a própria fé.",
    },
    Card {
        name: "A Lua",
        number: 18,
        keywords: &["ilusão", "intuição", "medos", "subconsciente"],
        upright: "O território dos sonhos e do subconsciente; intuição que navega entre ilusões.",
        reversed: "Medos irreais que paralisam; clareza mental emergindo após a confusão.",
    },
    Card {
        name: "O Sol",
        number: 19,
        keywords: &["alegria", "vitalidade", "sucesso", "clareza"],
        upright: "Alegria, vitalidade e sucesso; clareza que ilumina o caminho e as conquistas.",
        reversed: "Pessimismo que obscurece oportunidades e baixa vitalidade que atrasa o progresso.",
    },
    Card {
        name: "O Julgamento",
        number: 20,
        keywords: &["renascimento", "chamado", "avaliação", "despertar"],
        upright: "O chamado superior ao renascimento; avaliação honesta que liberta do passado.",
        reversed: "Autocrítica destrutiva e culpa que mantêm presa a evolução.",
    },
    Card {
        name: "O Mundo",
        number: 21,
        keywords: &["realização", "integração", "conclusão", "plenitude"],
        upright: "Conclusão plena de um grande ciclo; integração das experiências e realização.",
        reversed: "Sensação de incompletude; atalhos que não levam à realização verdadeira.",
    },
];
