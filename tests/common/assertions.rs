#![allow(dead_code)]

use thermostat_store::model::{EntryFields, ScheduleEntry};
use thermostat_store::storage::ScheduleStore;
use tracing::info;

pub fn assert_entries(store: &ScheduleStore, expected: &[ScheduleEntry]) {
    info!("Asserting {} entries", expected.len());
    let actual = store.get_all().expect("get_all");
    assert_eq!(actual, expected);
}

pub fn assert_entry(store: &ScheduleStore, id: i64, expected: &EntryFields) {
    info!("Asserting entry {} fields", id);
    let entry = store
        .get(id)
        .expect("get")
        .unwrap_or_else(|| panic!("entry {id} missing"));
    assert_eq!(entry.id, id);
    assert_eq!(&entry.fields(), expected);
}
