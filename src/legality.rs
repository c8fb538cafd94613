use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Card, null_as_default};

/// A supported play format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Blitz,
    Cc,
    Commoner,
    Ll,
    SilverAge,
    Upf,
}

impl Format {
    /// All formats, in display order.
    pub const ALL: [Format; 6] = [
        Format::Blitz,
        Format::Cc,
        Format::Commoner,
        Format::Ll,
        Format::SilverAge,
        Format::Upf,
    ];

    /// The short token used on the wire (`blitz`, `cc`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Blitz => "blitz",
            Format::Cc => "cc",
            Format::Commoner => "commoner",
            Format::Ll => "ll",
            Format::SilverAge => "silver_age",
            Format::Upf => "upf",
        }
    }

    /// Human readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Format::Blitz => "Blitz",
            Format::Cc => "Classic Constructed",
            Format::Commoner => "Commoner",
            Format::Ll => "Living Legend",
            Format::SilverAge => "Silver Age",
            Format::Upf => "Universal Play Format",
        }
    }

    /// Parse a user-supplied token, mapping anything unrecognised to
    /// `None` ("no constraint").
    pub fn parse_lenient(token: &str) -> Option<Format> {
        token.parse().ok()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blitz" => Ok(Format::Blitz),
            "cc" | "classic_constructed" | "classic-constructed" => {
                Ok(Format::Cc)
            }
            "commoner" => Ok(Format::Commoner),
            "ll" | "living_legend" | "living-legend" => Ok(Format::Ll),
            "silver_age" | "silver-age" | "silverage" => Ok(Format::SilverAge),
            "upf" => Ok(Format::Upf),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A card's normalised status in one format. Flags that have no meaning
/// in the format are `false`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct Legality {
    pub format: Format,
    pub legal: bool,
    pub living_legend: bool,
    pub banned: bool,
    pub suspended: bool,
    pub restricted: bool,
}

impl Legality {
    fn new(format: Format) -> Self {
        Self {
            format,
            legal: false,
            living_legend: false,
            banned: false,
            suspended: false,
            restricted: false,
        }
    }
}

/// Raw legality fields of a card, flattened into [`Card`] on decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalityFlags {
    #[serde(deserialize_with = "null_as_default")]
    pub blitz_legal: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cc_legal: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub commoner_legal: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ll_legal: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub silver_age_legal: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub blitz_living_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blitz_living_legend_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cc_living_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_living_legend_start: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub blitz_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blitz_banned_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cc_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_banned_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub commoner_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commoner_banned_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub ll_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ll_banned_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub silver_age_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silver_age_banned_start: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub upf_banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upf_banned_start: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub blitz_suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blitz_suspended_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blitz_suspended_end: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cc_suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_suspended_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc_suspended_end: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub commoner_suspended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commoner_suspended_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commoner_suspended_end: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub ll_restricted: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ll_restricted_affects_full_cycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ll_restricted_start: Option<String>,
}

impl LegalityFlags {
    /// Derive the legality record for `format`.
    ///
    /// | Format | legal iff |
    /// |---|---|
    /// | Blitz, CC | legal, not banned, not suspended, not living legend |
    /// | Commoner | legal, not banned, not suspended |
    /// | LL | legal, not banned, not restricted |
    /// | Silver Age | legal, not banned |
    /// | UPF | not banned (no base-legal flag exists) |
    pub fn resolve(&self, format: Format) -> Legality {
        let mut out = Legality::new(format);
        match format {
            Format::Blitz => {
                out.living_legend = self.blitz_living_legend;
                out.banned = self.blitz_banned;
                out.suspended = self.blitz_suspended;
                out.legal = self.blitz_legal
                    && !out.banned
                    && !out.suspended
                    && !out.living_legend;
            }
            Format::Cc => {
                out.living_legend = self.cc_living_legend;
                out.banned = self.cc_banned;
                out.suspended = self.cc_suspended;
                out.legal = self.cc_legal
                    && !out.banned
                    && !out.suspended
                    && !out.living_legend;
            }
            Format::Commoner => {
                out.banned = self.commoner_banned;
                out.suspended = self.commoner_suspended;
                out.legal = self.commoner_legal && !out.banned && !out.suspended;
            }
            Format::Ll => {
                out.banned = self.ll_banned;
                out.restricted = self.ll_restricted;
                out.legal = self.ll_legal && !out.banned && !out.restricted;
            }
            Format::SilverAge => {
                out.banned = self.silver_age_banned;
                out.legal = self.silver_age_legal && !out.banned;
            }
            Format::Upf => {
                out.banned = self.upf_banned;
                out.legal = !out.banned;
            }
        }
        out
    }
}

impl Card {
    /// Legality of this card in `format`.
    pub fn legality(&self, format: Format) -> Legality {
        self.legality_flags.resolve(format)
    }

    /// Legality in every format, in [`Format::ALL`] order.
    pub fn legalities(&self) -> Vec<Legality> {
        Format::ALL.iter().map(|&f| self.legality(f)).collect()
    }

    pub fn is_legal_in(&self, format: Format) -> bool {
        self.legality(format).legal
    }
}
