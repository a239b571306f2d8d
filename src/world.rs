//! Static world reference data: the market catalog, the district list and
//! the customization presets offered by the identity screen.
//!
//! Everything here is read-only; the profile store only ever receives copies.

use crate::profile::types::{MarketItem, Rarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistrictKind {
    Urban,
    Natural,
    Future,
    Fantasy,
}

/// A visit target on the world map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct District {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: DistrictKind,
    pub description: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

const DISTRICTS: [District; 4] = [
    District {
        id: "u1",
        name: "Neo-Oasis",
        kind: DistrictKind::Urban,
        description: "The pulsing heart of Aetheria. High-rise skyscrapers and neon markets.",
        color: "indigo",
        icon: "🏙️",
    },
    District {
        id: "n1",
        name: "Emerald Wilds",
        kind: DistrictKind::Natural,
        description: "Vibrant forests with gravity-defying waterfalls and mythical flora.",
        color: "emerald",
        icon: "🌲",
    },
    District {
        id: "f1",
        name: "Zenith Prime",
        kind: DistrictKind::Future,
        description: "A station at the edge of the atmosphere. Experimental physics and zero-G.",
        color: "purple",
        icon: "🚀",
    },
    District {
        id: "m1",
        name: "Mythos Reach",
        kind: DistrictKind::Fantasy,
        description: "Floating islands, ancient ruins, and magic-infused landscapes.",
        color: "amber",
        icon: "🏰",
    },
];

// (id, name, price, category, rarity, color)
const CATALOG: [(&str, &str, u64, &str, Rarity, &str); 6] = [
    ("i1", "Glitch Cloak", 1200, "Cosmetic", Rarity::Legendary, "purple"),
    ("i2", "Anti-Grav Wings", 850, "Aura", Rarity::Epic, "indigo"),
    ("i3", "Void Walkers", 400, "Trail", Rarity::Rare, "blue"),
    ("i4", "Neon Blade", 2500, "Tool", Rarity::Legendary, "red"),
    ("i5", "Cyber Pet", 1800, "Pet", Rarity::Epic, "emerald"),
    ("i6", "Prism Visor", 150, "Head", Rarity::Common, "slate"),
];

pub const OUTFIT_PRESETS: [&str; 4] = ["Cyber Runner", "Zenith Plate", "Spiritweaver", "Wasteland Scav"];

pub const HAIR_COLOR_PRESETS: [&str; 6] = ["#6366f1", "#10b981", "#f59e0b", "#ef4444", "#ec4899", "#f8fafc"];

pub fn districts() -> &'static [District] {
    &DISTRICTS
}

pub fn find_district(id: &str) -> Option<&'static District> {
    DISTRICTS.iter().find(|d| d.id == id)
}

/// Purchasable items in display order.
pub fn catalog() -> Vec<MarketItem> {
    CATALOG
        .iter()
        .map(|(id, name, price, category, rarity, color)| MarketItem {
            id: id.to_string(),
            name: name.to_string(),
            price: *price,
            category: category.to_string(),
            rarity: *rarity,
            color: color.to_string(),
        })
        .collect()
}

pub fn find_item(id: &str) -> Option<MarketItem> {
    catalog().into_iter().find(|item| item.id == id)
}
