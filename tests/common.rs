//! Shared fixtures for the profile integration tests.

use aetheria::profile::{ManualClock, MemorySlot, ProfileStore, ProfileStoreBuilder};

/// First timestamp handed out by [`test_clock`].
pub const CLOCK_START: i64 = 1_700_000_000_000;

/// Clock that advances one millisecond per reading.
pub fn test_clock() -> ManualClock {
    ManualClock::starting_at(CLOCK_START, 1)
}

/// Empty store over an in-memory slot, plus a handle to inspect the slot.
pub fn empty_store() -> (ProfileStore, MemorySlot) {
    let slot = MemorySlot::new();
    let store = ProfileStoreBuilder::new(slot.clone())
        .clock(test_clock())
        .open()
        .expect("open memory store");
    (store, slot)
}

/// Store with a freshly onboarded Vanguard named `Pathfinder01`.
#[allow(dead_code)]
pub fn onboarded_store() -> (ProfileStore, MemorySlot) {
    let (mut store, slot) = empty_store();
    store
        .complete_onboarding("Pathfinder01", "Vanguard")
        .expect("onboarding");
    (store, slot)
}
