use serde::Serialize;

use crate::{
    domain::{Card, Keyword, Set, SetPrinting},
    legality::Legality,
};

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub unique_id: String,
    pub name: String,
    pub type_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<String>,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        Self {
            unique_id: card.unique_id.clone(),
            name: card.name.clone(),
            type_text: card.type_text.clone(),
            pitch: non_empty(&card.pitch),
            cost: non_empty(&card.cost),
            power: non_empty(&card.power),
            defense: non_empty(&card.defense),
        }
    }
}

impl CardSummary {
    /// One-line rendering for terminal output.
    pub fn line(&self) -> String {
        let mut line = self.name.clone();
        if let Some(pitch) = &self.pitch {
            line.push_str(&format!(" ({pitch})"));
        }
        if !self.type_text.is_empty() {
            line.push_str(&format!(" - {}", self.type_text));
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDetail {
    pub unique_id: String,
    pub name: String,
    pub type_text: String,
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub functional_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<String>,
}

impl From<&Card> for CardDetail {
    fn from(card: &Card) -> Self {
        Self {
            unique_id: card.unique_id.clone(),
            name: card.name.clone(),
            type_text: card.type_text.clone(),
            types: card.types.clone(),
            class: card.class().map(str::to_string),
            functional_text: card.functional_text_plain.clone(),
            color: non_empty(&card.color),
            pitch: non_empty(&card.pitch),
            cost: non_empty(&card.cost),
            power: non_empty(&card.power),
            defense: non_empty(&card.defense),
            health: non_empty(&card.health),
            intelligence: non_empty(&card.intelligence),
            keywords: card.card_keywords.clone(),
            traits: card.traits.clone(),
            image_url: card.image_url().map(str::to_string),
            sets: card.set_codes().into_iter().map(str::to_string).collect(),
        }
    }
}

impl CardDetail {
    /// Multi-line rendering for terminal output.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{} [{}]", self.name, self.unique_id)];
        if !self.type_text.is_empty() {
            lines.push(self.type_text.clone());
        }

        let stats: Vec<String> = [
            ("pitch", &self.pitch),
            ("cost", &self.cost),
            ("power", &self.power),
            ("defense", &self.defense),
            ("health", &self.health),
            ("intelligence", &self.intelligence),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            value.as_ref().map(|v| format!("{label} {v}"))
        })
        .collect();
        if !stats.is_empty() {
            lines.push(stats.join(", "));
        }

        if !self.keywords.is_empty() {
            lines.push(format!("keywords: {}", self.keywords.join(", ")));
        }
        if !self.sets.is_empty() {
            lines.push(format!("sets: {}", self.sets.join(", ")));
        }
        if !self.functional_text.is_empty() {
            lines.push(String::new());
            lines.push(self.functional_text.clone());
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegalityReport {
    pub card_id: String,
    pub card_name: String,
    pub legalities: Vec<Legality>,
}

impl From<&Card> for LegalityReport {
    fn from(card: &Card) -> Self {
        Self {
            card_id: card.unique_id.clone(),
            card_name: card.name.clone(),
            legalities: card.legalities(),
        }
    }
}

impl LegalityReport {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{} [{}]", self.card_name, self.card_id)];
        for l in &self.legalities {
            let mut notes = Vec::new();
            if l.living_legend {
                notes.push("living legend");
            }
            if l.banned {
                notes.push("banned");
            }
            if l.suspended {
                notes.push("suspended");
            }
            if l.restricted {
                notes.push("restricted");
            }
            let status = if l.legal { "legal" } else { "not legal" };
            let suffix = if notes.is_empty() {
                String::new()
            } else {
                format!(" ({})", notes.join(", "))
            };
            lines.push(format!(
                "  {:<22} {status}{suffix}",
                l.format.display_name()
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetSummary {
    pub id: String,
    pub name: String,
}

impl From<&Set> for SetSummary {
    fn from(set: &Set) -> Self {
        Self {
            id: set.id.clone(),
            name: set.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetDetail {
    pub id: String,
    pub name: String,
    pub printings: Vec<SetPrinting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<CardSummary>>,
}

impl SetDetail {
    pub fn new(set: &Set, cards: Option<&[&Card]>) -> Self {
        let cards: Option<Vec<CardSummary>> =
            cards.map(|cards| cards.iter().map(|&c| c.into()).collect());
        Self {
            id: set.id.clone(),
            name: set.name.clone(),
            printings: set.printings.clone(),
            card_count: cards.as_ref().map(Vec::len),
            cards,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordView {
    pub name: String,
    pub description: String,
}

impl From<&Keyword> for KeywordView {
    fn from(keyword: &Keyword) -> Self {
        Self {
            name: keyword.name.clone(),
            description: keyword.description_plain.clone(),
        }
    }
}
