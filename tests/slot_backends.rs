//! Persistence across restarts and failure behaviour of the slot backends.
mod common;

use aetheria::profile::{
    FileSlot, MemorySlot, ProfileError, ProfileSlot, ProfileStore, ProfileStoreBuilder, SledSlot,
    DEFAULT_SLOT_KEY,
};
use aetheria::world::find_item;
use common::test_clock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_file_slot_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let saved = {
        let slot = FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap();
        let mut store = ProfileStoreBuilder::new(slot).clock(test_clock()).open().unwrap();
        store.complete_onboarding("Pathfinder01", "Envoy").unwrap();
        store.visit_district("m1", "Mythos Reach").unwrap();
        store.purchase(&find_item("i3").unwrap()).unwrap();
        store.snapshot().unwrap()
    };

    let reopened = ProfileStore::open(FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), saved);
    assert!(tmp.path().join("aetheria_profile.json").exists());
}

#[test]
fn test_sled_slot_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("sled");
    let saved = {
        let slot = SledSlot::open(&db_path, DEFAULT_SLOT_KEY).unwrap();
        let mut store = ProfileStoreBuilder::new(slot).clock(test_clock()).open().unwrap();
        store.complete_onboarding("Pathfinder01", "Architect").unwrap();
        store.rename("Nova").unwrap();
        store.snapshot().unwrap()
    };

    let mut reopened = ProfileStore::open(SledSlot::open(&db_path, DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert_eq!(reopened.snapshot().unwrap(), saved);

    reopened.reset_profile().unwrap();
    drop(reopened);
    let after_reset = ProfileStore::open(SledSlot::open(&db_path, DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert!(!after_reset.is_active());
}

#[test]
fn test_reset_removes_file() {
    let tmp = TempDir::new().unwrap();
    let slot = FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap();
    let path = slot.path().to_path_buf();
    let mut store = ProfileStore::open(slot).unwrap();
    store.complete_onboarding("Pathfinder01", "Vanguard").unwrap();
    assert!(path.exists());

    store.reset_profile().unwrap();
    assert!(!path.exists());
    let reopened = ProfileStore::open(FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert!(!reopened.is_active());
}

#[test]
fn test_corrupt_document_loads_as_no_profile() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("aetheria_profile.json"), "{\"name\": \"trunc").unwrap();

    let mut store = ProfileStore::open(FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert!(!store.is_active());

    // Onboarding overwrites the unreadable document
    store.complete_onboarding("Pathfinder01", "Vanguard").unwrap();
    let reopened = ProfileStore::open(FileSlot::open(tmp.path(), DEFAULT_SLOT_KEY).unwrap()).unwrap();
    assert_eq!(reopened.profile().unwrap().name, "Pathfinder01");
}

#[test]
fn test_corrupt_memory_document_loads_as_no_profile() {
    let store = ProfileStore::open(MemorySlot::with_document("[]")).unwrap();
    assert!(!store.is_active());
}

/// Slot whose writes can be switched to fail.
#[derive(Clone)]
struct FlakySlot {
    inner: MemorySlot,
    failing: Arc<AtomicBool>,
}

impl ProfileSlot for FlakySlot {
    fn read(&self) -> Result<Option<String>, ProfileError> {
        self.inner.read()
    }

    fn write(&mut self, document: &str) -> Result<(), ProfileError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProfileError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.write(document)
    }

    fn erase(&mut self) -> Result<(), ProfileError> {
        self.inner.erase()
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

#[test]
fn test_failed_write_leaves_state_untouched() {
    let slot = FlakySlot {
        inner: MemorySlot::new(),
        failing: Arc::new(AtomicBool::new(false)),
    };
    let mut store = ProfileStoreBuilder::new(slot.clone()).clock(test_clock()).open().unwrap();
    store.complete_onboarding("Pathfinder01", "Vanguard").unwrap();
    let before = store.snapshot().unwrap();
    let persisted = slot.inner.contents();

    slot.failing.store(true, Ordering::SeqCst);
    let err = store.purchase(&find_item("i6").unwrap()).unwrap_err();
    assert!(matches!(err, ProfileError::Io(_)));
    assert!(!err.is_recoverable());
    assert!(store.visit_district("u1", "Neo-Oasis").is_err());

    assert_eq!(store.snapshot().unwrap(), before);
    assert_eq!(slot.inner.contents(), persisted);

    slot.failing.store(false, Ordering::SeqCst);
    assert_eq!(store.purchase(&find_item("i6").unwrap()).unwrap(), 1350);
}

#[test]
fn test_failed_onboarding_write_stays_inactive() {
    let slot = FlakySlot {
        inner: MemorySlot::new(),
        failing: Arc::new(AtomicBool::new(true)),
    };
    let mut store = ProfileStore::open(slot.clone()).unwrap();
    assert!(store.complete_onboarding("Pathfinder01", "Vanguard").is_err());
    assert!(!store.is_active());
    assert!(slot.inner.contents().is_none());
}
