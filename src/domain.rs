use serde::{Deserialize, Deserializer, Serialize};

use crate::legality::LegalityFlags;

/// Type tags that name a class. A card's class is the first of its type
/// tags found in this list.
pub const CLASSES: &[&str] = &[
    "Generic",
    "Warrior",
    "Brute",
    "Guardian",
    "Ninja",
    "Mechanologist",
    "Ranger",
    "Runeblade",
    "Wizard",
    "Illusionist",
    "Elemental",
    "Light",
    "Shadow",
    "Ice",
    "Lightning",
    "Earth",
    "Mystic",
    "Assassin",
    "Shapeshifter",
    "Bard",
    "Adjudicator",
    "Necromancer",
    "Draconic",
    "Royal",
];

/// Decodes `null` as the field's zero value, the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns `true` if `tag` is one of the enumerated class tags.
pub fn is_class(tag: &str) -> bool {
    CLASSES.contains(&tag)
}

/// A unique card. Pitch variants of the same card are separate records
/// sharing a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pitch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cost: String,
    #[serde(deserialize_with = "null_as_default")]
    pub power: String,
    #[serde(deserialize_with = "null_as_default")]
    pub defense: String,
    #[serde(deserialize_with = "null_as_default")]
    pub health: String,
    #[serde(deserialize_with = "null_as_default")]
    pub intelligence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub arcane: String,
    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub traits: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub card_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub abilities_and_effects: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ability_and_effect_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub granted_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub removed_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub interacts_with_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub functional_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub functional_text_plain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub type_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub played_horizontally: bool,
    #[serde(flatten)]
    pub legality_flags: LegalityFlags,
    #[serde(deserialize_with = "null_as_default")]
    pub referenced_cards: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cards_referenced_by: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub printings: Vec<Printing>,
}

impl Card {
    /// The card's class: its first type tag that is a class.
    ///
    /// Cards with more than one class-like tag (e.g. `Light Warrior`)
    /// resolve to whichever tag comes first.
    pub fn class(&self) -> Option<&str> {
        self.types
            .iter()
            .map(String::as_str)
            .find(|tag| is_class(tag))
    }

    /// Every class-like type tag on the card, in tag order.
    pub fn class_tags(&self) -> Vec<&str> {
        self.types
            .iter()
            .map(String::as_str)
            .filter(|tag| is_class(tag))
            .collect()
    }

    /// Returns `true` if any type tag equals `type_name`, ignoring case.
    pub fn has_type(&self, type_name: &str) -> bool {
        let wanted = type_name.to_lowercase();
        self.types.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Returns `true` if any card keyword contains `keyword`, ignoring case.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        let wanted = keyword.to_lowercase();
        self.card_keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&wanted))
    }

    /// Returns `true` if any printing belongs to the set `code`
    /// (case-insensitive).
    pub fn in_set(&self, code: &str) -> bool {
        let wanted = code.to_uppercase();
        self.printings
            .iter()
            .any(|p| p.set_id.to_uppercase() == wanted)
    }

    /// Distinct set codes across all printings, in first-printing order.
    pub fn set_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for printing in &self.printings {
            if !codes.contains(&printing.set_id.as_str()) {
                codes.push(&printing.set_id);
            }
        }
        codes
    }

    /// Image of the first printing, if it has one.
    pub fn image_url(&self) -> Option<&str> {
        self.printings.first()?.image_url.as_deref()
    }
}

/// One set/edition/artwork instance of a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Printing {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub set_printing_unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub set_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub edition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub foiling: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rarity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expansion_slot: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub artists: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub art_variations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub flavor_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub flavor_text_plain: String,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub image_rotation_degrees: i32,
    pub tcgplayer_product_id: Option<String>,
    pub tcgplayer_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "null_as_default")]
    pub double_sided_card_info: Vec<DoubleSidedInfo>,
}

/// Link from a printing to the other face of a double-sided card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleSidedInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub other_face_unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_front: bool,
    #[serde(rename = "is_DFC")]
    #[serde(deserialize_with = "null_as_default")]
    pub is_dfc: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Set {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    /// Set code, e.g. `WTR`.
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub printings: Vec<SetPrinting>,
}

/// Edition and release metadata for a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetPrinting {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub edition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub start_card_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub end_card_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub initial_release_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub out_of_print: bool,
    pub card_database: Option<String>,
    pub product_page: Option<String>,
    pub collectors_center: Option<String>,
    pub card_gallery: Option<String>,
    pub release_notes: Option<String>,
    pub set_logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyword {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description_plain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ability {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// An entry of the card type reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardType {
    #[serde(deserialize_with = "null_as_default")]
    pub unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with_types(types: &[&str]) -> Card {
        Card {
            name: "Test".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn class_is_first_class_tag() {
        let card = card_with_types(&["Ninja", "Action", "Attack"]);
        assert_eq!(card.class(), Some("Ninja"));
    }

    #[test]
    fn class_skips_non_class_tags() {
        let card = card_with_types(&["Action", "Attack", "Brute"]);
        assert_eq!(card.class(), Some("Brute"));
    }

    #[test]
    fn hybrid_cards_take_first_class_tag() {
        let card = card_with_types(&["Light", "Warrior", "Hero"]);
        assert_eq!(card.class(), Some("Light"));
        assert_eq!(card.class_tags(), vec!["Light", "Warrior"]);
    }

    #[test]
    fn no_class_tag() {
        let card = card_with_types(&["Token", "Aura"]);
        assert_eq!(card.class(), None);
        assert!(card.class_tags().is_empty());
    }

    #[test]
    fn type_and_keyword_checks_ignore_case() {
        let card = Card {
            card_keywords: vec!["Go again".to_string()],
            ..card_with_types(&["Ninja", "Action", "Attack"])
        };
        assert!(card.has_type("attack"));
        assert!(!card.has_type("Att"));
        assert!(card.has_keyword("GO AGAIN"));
        assert!(card.has_keyword("go"));
        assert!(!card.has_keyword("dominate"));
    }

    #[test]
    fn checks_fold_non_ascii_tags() {
        let card = Card {
            card_keywords: vec!["Ärger".to_string()],
            printings: vec![Printing {
                set_id: "Öde".to_string(),
                ..Default::default()
            }],
            ..card_with_types(&["Ätherwesen"])
        };
        assert!(card.has_type("ätherwesen"));
        assert!(card.has_keyword("ärg"));
        assert!(card.in_set("öde"));
    }

    #[test]
    fn set_codes_are_distinct() {
        let printing = |set: &str| Printing {
            set_id: set.to_string(),
            ..Default::default()
        };
        let card = Card {
            printings: vec![printing("WTR"), printing("WTR"), printing("CRU")],
            ..Default::default()
        };
        assert_eq!(card.set_codes(), vec!["WTR", "CRU"]);
        assert!(card.in_set("cru"));
        assert!(!card.in_set("ARC"));
    }

    #[test]
    fn decodes_partial_records() {
        let card: Card = serde_json::from_str(
            r#"{"unique_id":"abc","name":"Snatch","types":["Generic"],"blitz_legal":true}"#,
        )
        .unwrap();
        assert_eq!(card.name, "Snatch");
        assert!(card.pitch.is_empty());
        assert!(card.printings.is_empty());
        assert!(card.legality_flags.blitz_legal);
        assert!(!card.legality_flags.cc_legal);
    }

    #[test]
    fn null_fields_decode_as_zero_values() {
        let card: Card = serde_json::from_str(
            r#"{"unique_id":"c1","name":"Snatch","pitch":null,"types":null,"blitz_legal":null,"printings":[{"set_id":"WTR","artists":null}]}"#,
        )
        .unwrap();
        assert_eq!(card.name, "Snatch");
        assert!(card.pitch.is_empty());
        assert!(card.types.is_empty());
        assert!(!card.legality_flags.blitz_legal);
        assert!(card.printings[0].artists.is_empty());
    }

    #[test]
    fn decodes_double_sided_info() {
        let printing: Printing = serde_json::from_str(
            r#"{"set_id":"MON","image_url":null,"double_sided_card_info":[{"other_face_unique_id":"x","is_front":true,"is_DFC":true}]}"#,
        )
        .unwrap();
        assert_eq!(printing.image_url, None);
        assert!(printing.double_sided_card_info[0].is_dfc);
    }
}
