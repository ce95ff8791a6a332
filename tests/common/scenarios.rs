#![allow(dead_code)]

use super::*;
use thermostat_store::model::{EntryFields, ScheduleEntry};

pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn fields(i: usize) -> EntryFields {
    EntryFields::new(
        DAYS[i % DAYS.len()],
        format!("{:02}:00", i % 24),
        format!("{}", 18 + i % 6),
    )
}

pub fn scenario_week(count: usize) -> (ScheduleStore, Vec<ScheduleEntry>) {
    let store = test_store();
    let mut entries = Vec::new();
    for i in 0..count {
        let fields = fields(i);
        let id = store.add(&fields).unwrap().expect("insert ignored");
        entries.push(fields.with_id(id));
    }
    (store, entries)
}
