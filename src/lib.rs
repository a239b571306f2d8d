//! # Aetheria - persistent player profile manager
//!
//! Aetheria keeps a single player's avatar profile for a virtual-world
//! dashboard: identity, appearance, skills, currency, inventory, district
//! discovery and a capped activity chronicle. The profile is persisted as one
//! JSON document in a key-value slot and survives restarts.
//!
//! ## Features
//!
//! - **Profile store**: onboarding, renaming, appearance edits, district visits
//!   and market purchases, each applied atomically against the durable slot.
//! - **Chronicle**: newest-first activity log capped at 50 entries.
//! - **Import/export**: the whole profile as a JSON document, validated on import.
//! - **Slot backends**: a JSON file (locked, atomically replaced) or a sled tree.
//! - **Advice**: optional daily briefings and creative suggestions from a
//!   text-generation service, degrading to local fallback text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aetheria::config::Config;
//! use aetheria::world;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("config.toml").await?;
//!     let mut store = config.profile.open_store()?;
//!
//!     if !store.is_active() {
//!         store.complete_onboarding("Pathfinder01", "Vanguard")?;
//!     }
//!     if let Some(item) = world::find_item("i6") {
//!         let balance = store.purchase(&item)?;
//!         println!("balance: {}", balance);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`profile`] - profile types, the store, slots and clocks
//! - [`world`] - static districts, market catalog and appearance presets
//! - [`advice`] - briefing and creative advice boundary
//! - [`config`] - TOML configuration
//! - [`validation`] - name and document validation
//! - [`logutil`] - log-safe previews of user text

pub mod advice;
pub mod config;
pub mod logutil;
pub mod profile;
pub mod validation;
pub mod world;
