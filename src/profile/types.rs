//! Profile document types.
//!
//! Field names serialize exactly as the persisted `aetheria_profile` document
//! spells them (`worldDiscovery`, `hairColor`, ...), so a document written by
//! any earlier build of the profile manager loads unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_CURRENCY: u64 = 1500;
pub const DEFAULT_HAIR_COLOR: &str = "#6366f1";
pub const DEFAULT_SKIN_TONE: &str = "#fecaca";
pub const MIN_NAME_CHARS: usize = 3;
pub const SEED_CHRONICLE_ID: &str = "init";
pub const SEED_CHRONICLE_TEXT: &str = "Identity synchronized. Welcome to Aetheria.";
/// Currency needed per level to fill the season progress bar.
pub const SEASON_CURRENCY_PER_LEVEL: u64 = 1000;

// ============================================================================
// Specialties
// ============================================================================

/// The fixed set of specialties offered at onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialty {
    Vanguard,
    Architect,
    Envoy,
}

impl Specialty {
    pub const ALL: [Specialty; 3] = [Specialty::Vanguard, Specialty::Architect, Specialty::Envoy];

    pub fn label(&self) -> &'static str {
        match self {
            Specialty::Vanguard => "Vanguard",
            Specialty::Architect => "Architect",
            Specialty::Envoy => "Envoy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Specialty::Vanguard => "Frontline operations specialist.",
            Specialty::Architect => "World-building and tech masters.",
            Specialty::Envoy => "Trade and social community leaders.",
        }
    }

    /// Starting skill template copied into the profile at onboarding.
    pub fn skill_template(&self) -> Skills {
        match self {
            Specialty::Vanguard => Skills { agility: 15, combat: 25, creativity: 5, social: 5 },
            Specialty::Architect => Skills { agility: 5, combat: 5, creativity: 30, social: 10 },
            Specialty::Envoy => Skills { agility: 10, combat: 5, creativity: 10, social: 25 },
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Specialty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Specialty::ALL
            .into_iter()
            .find(|sp| sp.label() == s)
            .ok_or_else(|| format!("unknown specialty '{}'", s))
    }
}

// ============================================================================
// Avatar components
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub agility: u32,
    pub combat: u32,
    pub creativity: u32,
    pub social: u32,
}

impl Skills {
    /// Skills in document order, paired with their field names.
    pub fn entries(&self) -> [(&'static str, u32); 4] {
        [
            ("agility", self.agility),
            ("combat", self.combat),
            ("creativity", self.creativity),
            ("social", self.social),
        ]
    }

    /// Highest skill; ties resolve to the earliest in document order.
    pub fn top(&self) -> (&'static str, u32) {
        let entries = self.entries();
        let mut best = entries[0];
        for entry in &entries[1..] {
            if entry.1 > best.1 {
                best = *entry;
            }
        }
        best
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub hair_color: String,
    pub skin_tone: String,
    pub outfit: String,
}

impl Appearance {
    pub fn for_specialty(specialty: Specialty) -> Self {
        Self {
            hair_color: DEFAULT_HAIR_COLOR.to_string(),
            skin_tone: DEFAULT_SKIN_TONE.to_string(),
            outfit: specialty.label().to_string(),
        }
    }

    pub fn get(&self, field: AppearanceField) -> &str {
        match field {
            AppearanceField::HairColor => &self.hair_color,
            AppearanceField::SkinTone => &self.skin_tone,
            AppearanceField::Outfit => &self.outfit,
        }
    }

    pub(crate) fn set(&mut self, field: AppearanceField, value: String) {
        match field {
            AppearanceField::HairColor => self.hair_color = value,
            AppearanceField::SkinTone => self.skin_tone = value,
            AppearanceField::Outfit => self.outfit = value,
        }
    }
}

/// Independently replaceable appearance slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppearanceField {
    HairColor,
    SkinTone,
    Outfit,
}

impl AppearanceField {
    pub fn key(&self) -> &'static str {
        match self {
            AppearanceField::HairColor => "hairColor",
            AppearanceField::SkinTone => "skinTone",
            AppearanceField::Outfit => "outfit",
        }
    }
}

impl FromStr for AppearanceField {
    type Err = String;

    /// Accepts the document key (`hairColor`) or a CLI-friendly spelling (`hair-color`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "haircolor" | "hair" => Ok(AppearanceField::HairColor),
            "skintone" | "skin" => Ok(AppearanceField::SkinTone),
            "outfit" => Ok(AppearanceField::Outfit),
            _ => Err(format!("unknown appearance field '{}'", s)),
        }
    }
}

// ============================================================================
// Chronicle entries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Achievement,
    Discovery,
    Purchase,
    Social,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::Achievement => "achievement",
            ActivityKind::Discovery => "discovery",
            ActivityKind::Purchase => "purchase",
            ActivityKind::Social => "social",
        };
        f.write_str(s)
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "achievement" => Ok(ActivityKind::Achievement),
            "discovery" => Ok(ActivityKind::Discovery),
            "purchase" => Ok(ActivityKind::Purchase),
            "social" => Ok(ActivityKind::Social),
            _ => Err(format!("unknown activity type '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub text: String,
}

// ============================================================================
// Market items
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(s)
    }
}

/// Catalog entry; copied by value into the inventory on purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub category: String,
    pub rarity: Rarity,
    pub color: String,
}

// ============================================================================
// Profile document
// ============================================================================

/// The single persisted aggregate describing one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarState {
    pub name: String,
    pub level: u32,
    pub currency: u64,
    pub specialty: String,
    pub appearance: Appearance,
    pub skills: Skills,
    pub inventory: Vec<MarketItem>,
    /// District id -> epoch millis of the latest visit.
    pub world_discovery: BTreeMap<String, i64>,
    /// Newest first.
    pub chronicles: Vec<ActivityEntry>,
}

impl AvatarState {
    /// Fresh profile as produced by onboarding, before the seed chronicle entry.
    pub fn new(name: &str, specialty: Specialty) -> Self {
        Self {
            name: name.to_string(),
            level: STARTING_LEVEL,
            currency: STARTING_CURRENCY,
            specialty: specialty.label().to_string(),
            appearance: Appearance::for_specialty(specialty),
            skills: specialty.skill_template(),
            inventory: Vec::new(),
            world_discovery: BTreeMap::new(),
            chronicles: Vec::new(),
        }
    }

    pub fn top_skill(&self) -> (&'static str, u32) {
        self.skills.top()
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|item| item.id == item_id)
    }

    pub fn owned_count(&self, item_id: &str) -> usize {
        self.inventory.iter().filter(|item| item.id == item_id).count()
    }

    pub fn can_afford(&self, item: &MarketItem) -> bool {
        self.currency >= item.price
    }

    /// `None` means the district was never visited.
    pub fn last_visit(&self, district_id: &str) -> Option<i64> {
        self.world_discovery.get(district_id).copied()
    }

    /// Dashboard season bar: balance against `level * 1000`, capped at 100.
    pub fn season_progress_percent(&self) -> u8 {
        let target = u64::from(self.level.max(1)) * SEASON_CURRENCY_PER_LEVEL;
        let pct = self.currency.saturating_mul(100) / target;
        pct.min(100) as u8
    }

    pub fn briefing_snapshot(&self) -> BriefingSnapshot {
        BriefingSnapshot {
            name: self.name.clone(),
            level: self.level,
            skills: self.skills,
            currency: self.currency,
        }
    }
}

/// The subset of a profile handed to the advice boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingSnapshot {
    pub name: String,
    pub level: u32,
    pub skills: Skills,
    pub currency: u64,
}
