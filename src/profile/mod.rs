//! Player profile: the persisted avatar document and the store that owns it.
//!
//! The store holds at most one [`AvatarState`]. With no profile only
//! onboarding is allowed; `reset_profile` is the only way back out.

pub mod chronicle;
pub mod clock;
pub mod errors;
pub mod shared;
pub mod slot;
pub mod store;
pub mod types;

pub use chronicle::CHRONICLE_CAP;
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::ProfileError;
pub use shared::SharedProfileStore;
pub use slot::{FileSlot, MemorySlot, ProfileSlot, SledSlot, DEFAULT_SLOT_KEY};
pub use store::{ImportPolicy, ProfileStore, ProfileStoreBuilder};
pub use types::*;
