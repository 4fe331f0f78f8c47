//! End-to-end flow: neighbor-table file -> ArpProvider -> controller -> store.
//!
//! Drives the controller against a real file on disk, rewriting the table
//! between ticks the way the kernel would as a device comes and goes.

use chrono::{DateTime, Duration, Utc};
use nethome_core::{
    ArpProvider, ControllerConfig, EventStore, EventWrite, IdentityMap, PresenceController, Result,
    TickOutcome,
};
use std::path::{Path, PathBuf};

const HEADER: &str = "IP address       HW type     Flags       HW address            Mask     Device";

#[derive(Debug, Default)]
struct MemoryStore {
    events: Vec<(String, EventWrite)>,
    next_id: u64,
}

impl EventStore for MemoryStore {
    fn create(&mut self, event: &EventWrite) -> Result<String> {
        self.next_id += 1;
        let id = format!("evt-{}", self.next_id);
        self.events.push((id.clone(), event.clone()));
        Ok(id)
    }

    fn update(&mut self, event_id: &str, event: &EventWrite) -> Result<String> {
        self.events.push((event_id.to_string(), event.clone()));
        Ok(event_id.to_string())
    }
}

fn write_table(path: &Path, laptop_flags: &str) {
    let content = format!(
        "{HEADER}\n\
         10.10.10.1      0x1         0x2         00:01:02:03:04:01     *        br0\n\
         10.10.10.23     0x1         {laptop_flags}         00:01:02:aa:bb:cc     *        br0\n"
    );
    std::fs::write(path, content).expect("write neighbor table");
}

fn setup(dir: &Path) -> (PathBuf, PresenceController<ArpProvider, MemoryStore>) {
    let table = dir.join("arp");
    let mut identities = IdentityMap::new();
    identities.insert("00:01:02:aa:bb:cc", "laptop");
    let provider = ArpProvider::new(&table, identities);
    let config = ControllerConfig {
        event_title: "Present".to_string(),
        event_color_id: "11".to_string(),
        grace_threshold: 0,
    };
    let controller = PresenceController::new(
        provider,
        MemoryStore::default(),
        config,
        Box::new(|sample: &[String]| !sample.is_empty()),
    );
    (table, controller)
}

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("parse")
        .with_timezone(&Utc)
}

#[test]
fn device_arrival_extension_and_departure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (table, mut controller) = setup(dir.path());
    let t0 = at("2026-02-14T08:00:00Z");

    // Device reachable: first tick opens the event.
    write_table(&table, "0x2");
    assert_eq!(controller.tick_at(t0).expect("tick"), TickOutcome::Created);
    let started_at = controller.active().expect("active").started_at;
    assert_eq!(started_at, t0);

    // Still reachable a minute later: end time moves, start does not.
    assert_eq!(
        controller.tick_at(t0 + Duration::minutes(1)).expect("tick"),
        TickOutcome::Extended
    );
    assert_eq!(controller.active().expect("active").started_at, t0);

    // Entry goes stale: one miss is within grace, the second drops the event.
    write_table(&table, "0x0");
    assert_eq!(
        controller.tick_at(t0 + Duration::minutes(2)).expect("tick"),
        TickOutcome::Graced {
            consecutive_misses: 1
        }
    );
    assert_eq!(
        controller.tick_at(t0 + Duration::minutes(3)).expect("tick"),
        TickOutcome::Ended
    );
    assert!(controller.active().is_none());

    // Device returns: a fresh event with a fresh start time.
    write_table(&table, "0x2");
    assert_eq!(
        controller.tick_at(t0 + Duration::minutes(4)).expect("tick"),
        TickOutcome::Created
    );
    assert_eq!(
        controller.active().expect("active").started_at,
        t0 + Duration::minutes(4)
    );
}

#[test]
fn unreadable_table_surfaces_without_ending_the_event() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (table, mut controller) = setup(dir.path());
    let t0 = at("2026-02-14T08:00:00Z");

    write_table(&table, "0x2");
    controller.tick_at(t0).expect("create");

    std::fs::remove_file(&table).expect("remove table");
    assert!(controller.tick_at(t0 + Duration::minutes(1)).is_err());
    assert!(controller.active().is_some());
    assert_eq!(controller.grace_counter(), 0);

    write_table(&table, "0x2");
    assert_eq!(
        controller.tick_at(t0 + Duration::minutes(2)).expect("tick"),
        TickOutcome::Extended
    );
}
