//! The profile store: sole owner of the active [`AvatarState`].
//!
//! Every mutation clones the current state, applies the change to the clone,
//! writes the clone to the slot and only then swaps it in. A failed check or a
//! failed write therefore leaves both the in-memory and the durable copy at the
//! previous state.

use log::{debug, info, warn};

use super::chronicle::{self, purchase_text, visit_text};
use super::clock::{Clock, SystemClock};
use super::errors::ProfileError;
use super::slot::ProfileSlot;
use super::types::{
    ActivityEntry, ActivityKind, AppearanceField, AvatarState, MarketItem, Specialty,
    SEED_CHRONICLE_ID, SEED_CHRONICLE_TEXT,
};
use crate::logutil::preview;
use crate::validation::{
    export_filename, parse_profile_document, validate_avatar, validate_display_name,
    validate_onboarding_name, MAX_DOCUMENT_BYTES,
};

/// How much `import_raw` trusts a document that parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Shape and business rules (level, specialty, chronicle cap and order...).
    #[default]
    Strict,
    /// Shape only; any document that deserializes replaces the profile.
    Permissive,
}

/// Builder so callers and tests can swap the clock and import policy.
pub struct ProfileStoreBuilder {
    slot: Box<dyn ProfileSlot>,
    clock: Box<dyn Clock>,
    import_policy: ImportPolicy,
}

impl ProfileStoreBuilder {
    pub fn new(slot: impl ProfileSlot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
            clock: Box::new(SystemClock),
            import_policy: ImportPolicy::default(),
        }
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn open(self) -> Result<ProfileStore, ProfileError> {
        ProfileStore::open_with(self.slot, self.clock, self.import_policy)
    }
}

pub struct ProfileStore {
    slot: Box<dyn ProfileSlot>,
    clock: Box<dyn Clock>,
    import_policy: ImportPolicy,
    active: Option<AvatarState>,
}

impl ProfileStore {
    /// Open the store over `slot` with the wall clock and strict imports.
    pub fn open(slot: impl ProfileSlot + 'static) -> Result<Self, ProfileError> {
        ProfileStoreBuilder::new(slot).open()
    }

    fn open_with(
        slot: Box<dyn ProfileSlot>,
        clock: Box<dyn Clock>,
        import_policy: ImportPolicy,
    ) -> Result<Self, ProfileError> {
        let active = match slot.read()? {
            None => {
                debug!("no saved profile in {}", slot.describe());
                None
            }
            Some(text) => match parse_profile_document(&text, MAX_DOCUMENT_BYTES) {
                Ok(state) => {
                    info!("restored profile '{}' from {}", preview(&state.name), slot.describe());
                    Some(state)
                }
                Err(e) => {
                    warn!(
                        "saved profile in {} is unreadable ({}); starting without a profile",
                        slot.describe(),
                        e
                    );
                    None
                }
            },
        };
        Ok(Self {
            slot,
            clock,
            import_policy,
            active,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Read-only view of the active profile.
    pub fn profile(&self) -> Option<&AvatarState> {
        self.active.as_ref()
    }

    /// Owned copy of the active profile for callers that outlive the borrow.
    pub fn snapshot(&self) -> Option<AvatarState> {
        self.active.clone()
    }

    pub fn import_policy(&self) -> ImportPolicy {
        self.import_policy
    }

    pub fn slot_description(&self) -> String {
        self.slot.describe()
    }

    /// Create the profile. This is the only way into the active mode.
    pub fn complete_onboarding(
        &mut self,
        name: &str,
        specialty: &str,
    ) -> Result<&AvatarState, ProfileError> {
        if self.active.is_some() {
            return Err(ProfileError::AlreadyOnboarded);
        }
        validate_onboarding_name(name).map_err(|e| ProfileError::InvalidInput(e.to_string()))?;
        let specialty: Specialty = specialty.parse().map_err(ProfileError::InvalidInput)?;

        let mut state = AvatarState::new(name, specialty);
        state.chronicles.push(ActivityEntry {
            id: SEED_CHRONICLE_ID.to_string(),
            timestamp: self.clock.now_millis(),
            kind: ActivityKind::Social,
            text: SEED_CHRONICLE_TEXT.to_string(),
        });
        self.commit(state)?;
        info!("onboarded '{}' as {}", preview(name), specialty);
        self.active.as_ref().ok_or(ProfileError::NoActiveProfile)
    }

    pub fn rename(&mut self, new_name: &str) -> Result<(), ProfileError> {
        validate_display_name(new_name).map_err(|e| ProfileError::InvalidInput(e.to_string()))?;
        self.apply(|state, _| {
            state.name = new_name.to_string();
            Ok(())
        })?;
        debug!("renamed profile to '{}'", preview(new_name));
        Ok(())
    }

    pub fn set_appearance(&mut self, field: AppearanceField, value: &str) -> Result<(), ProfileError> {
        self.apply(|state, _| {
            state.appearance.set(field, value.to_string());
            Ok(())
        })?;
        debug!("appearance {} = '{}'", field.key(), preview(value));
        Ok(())
    }

    /// Record a visit. Repeat visits refresh the timestamp and still add a
    /// chronicle entry.
    pub fn visit_district(&mut self, district_id: &str, district_name: &str) -> Result<(), ProfileError> {
        if district_id.is_empty() {
            return Err(ProfileError::InvalidInput("district id cannot be empty".into()));
        }
        self.apply(|state, clock| {
            let now = clock.now_millis();
            state.world_discovery.insert(district_id.to_string(), now);
            chronicle::prepend(
                &mut state.chronicles,
                chronicle::new_entry(ActivityKind::Discovery, visit_text(district_name), now),
            );
            Ok(())
        })?;
        debug!("visited district {}", district_id);
        Ok(())
    }

    /// Buy `item`, returning the remaining balance. Balance check and debit
    /// are computed from the same state read.
    pub fn purchase(&mut self, item: &MarketItem) -> Result<u64, ProfileError> {
        let remaining = self.apply(|state, clock| {
            let remaining = state.currency.checked_sub(item.price).ok_or(
                ProfileError::InsufficientFunds {
                    balance: state.currency,
                    price: item.price,
                },
            )?;
            state.currency = remaining;
            state.inventory.push(item.clone());
            chronicle::prepend(
                &mut state.chronicles,
                chronicle::new_entry(ActivityKind::Purchase, purchase_text(&item.name), clock.now_millis()),
            );
            Ok(remaining)
        });
        match &remaining {
            Ok(balance) => debug!("purchased {} for {}; balance {}", item.id, item.price, balance),
            Err(e) => debug!("purchase of {} rejected: {}", item.id, e),
        }
        remaining
    }

    /// Append a free-form chronicle entry.
    pub fn record(&mut self, kind: ActivityKind, text: &str) -> Result<(), ProfileError> {
        if text.trim().is_empty() {
            return Err(ProfileError::InvalidInput("chronicle text cannot be empty".into()));
        }
        self.apply(|state, clock| {
            chronicle::prepend(
                &mut state.chronicles,
                chronicle::new_entry(kind, text, clock.now_millis()),
            );
            Ok(())
        })
    }

    /// Replace the whole profile with a parsed document. No field-level merge.
    pub fn import_raw(&mut self, document: &str) -> Result<(), ProfileError> {
        if self.active.is_none() {
            return Err(ProfileError::NoActiveProfile);
        }
        let candidate = parse_profile_document(document, MAX_DOCUMENT_BYTES).map_err(|e| {
            debug!("import rejected: {} in {}", e, preview(document));
            ProfileError::MalformedData(e.to_string())
        })?;
        if self.import_policy == ImportPolicy::Strict {
            validate_avatar(&candidate).map_err(|problems| ProfileError::MalformedData(problems.join("; ")))?;
        }
        let name = candidate.name.clone();
        self.commit(candidate)?;
        info!("imported profile document for '{}'", preview(&name));
        Ok(())
    }

    /// Pretty JSON of the active profile; feeds back into `import_raw` unchanged.
    pub fn export_raw(&self) -> Result<String, ProfileError> {
        let state = self.active.as_ref().ok_or(ProfileError::NoActiveProfile)?;
        Ok(serde_json::to_string_pretty(state)?)
    }

    /// Suggested download name for [`export_raw`](Self::export_raw) output.
    pub fn export_filename(&self) -> Option<String> {
        self.active.as_ref().map(|state| export_filename(&state.name))
    }

    /// Erase the slot and forget the in-memory profile.
    pub fn reset_profile(&mut self) -> Result<(), ProfileError> {
        self.slot.erase()?;
        if let Some(old) = self.active.take() {
            info!("reset profile '{}'", preview(&old.name));
        }
        Ok(())
    }

    fn apply<R>(
        &mut self,
        change: impl FnOnce(&mut AvatarState, &dyn Clock) -> Result<R, ProfileError>,
    ) -> Result<R, ProfileError> {
        let mut next = self.active.clone().ok_or(ProfileError::NoActiveProfile)?;
        let out = change(&mut next, self.clock.as_ref())?;
        self.commit(next)?;
        Ok(out)
    }

    fn commit(&mut self, next: AvatarState) -> Result<(), ProfileError> {
        let document = serde_json::to_string(&next)?;
        self.slot.write(&document)?;
        self.active = Some(next);
        Ok(())
    }
}
