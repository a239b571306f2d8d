//! District visits and the capped chronicle.
mod common;

use aetheria::profile::{ActivityKind, ProfileError, CHRONICLE_CAP};
use aetheria::world::districts;
use common::{onboarded_store, CLOCK_START};

#[test]
fn test_sixty_visits_keep_latest_fifty() {
    let (mut store, _) = onboarded_store();
    for i in 0..60 {
        store
            .visit_district(&format!("d{}", i), &format!("Sector {}", i))
            .unwrap();
    }

    let profile = store.profile().unwrap();
    assert_eq!(profile.chronicles.len(), CHRONICLE_CAP);
    assert_eq!(
        profile.chronicles[0].text,
        "You successfully entered the Sector 59 district."
    );
    assert_eq!(
        profile.chronicles[CHRONICLE_CAP - 1].text,
        "You successfully entered the Sector 10 district."
    );
    assert!(profile.chronicles.iter().all(|e| e.kind == ActivityKind::Discovery));
    assert!(profile
        .chronicles
        .windows(2)
        .all(|pair| pair[0].timestamp > pair[1].timestamp));
    // Discovery map is not capped
    assert_eq!(profile.world_discovery.len(), 60);
}

#[test]
fn test_revisit_refreshes_timestamp_and_logs_twice() {
    let (mut store, _) = onboarded_store();
    store.visit_district("d1", "Neo-Oasis").unwrap();
    let first = store.profile().unwrap().last_visit("d1").unwrap();
    store.visit_district("d1", "Neo-Oasis").unwrap();
    let second = store.profile().unwrap().last_visit("d1").unwrap();

    assert_eq!(first, CLOCK_START + 1);
    assert_eq!(second, CLOCK_START + 2);

    let profile = store.profile().unwrap();
    assert_eq!(profile.world_discovery.len(), 1);
    assert_eq!(profile.chronicles.len(), 3);
    assert_eq!(profile.chronicles[0].timestamp, second);
    assert_eq!(profile.chronicles[1].timestamp, first);
    assert_ne!(profile.chronicles[0].id, profile.chronicles[1].id);
}

#[test]
fn test_visiting_world_districts() {
    let (mut store, _) = onboarded_store();
    for district in districts() {
        store.visit_district(district.id, district.name).unwrap();
    }
    let profile = store.profile().unwrap();
    assert_eq!(profile.world_discovery.len(), districts().len());
    assert!(profile.last_visit("u1").is_some());
    assert!(profile.last_visit("x9").is_none());
}

#[test]
fn test_empty_district_id_rejected() {
    let (mut store, slot) = onboarded_store();
    assert!(matches!(
        store.visit_district("", "Nowhere"),
        Err(ProfileError::InvalidInput(_))
    ));
    assert_eq!(slot.write_count(), 1);
}
