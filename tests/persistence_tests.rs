mod common;

use common::{cement_run, clock_at, date, setup_storage};
use fleet_core::{
    core::services::TripService,
    ledger::{Expenses, Ledger},
    storage::{ledger_warnings, StorageBackend},
};

#[test]
fn a_working_ledger_survives_the_round_trip() {
    let storage = setup_storage();
    let mut ledger = Ledger::new("Sharma Transport");
    let id = TripService::create(&mut ledger, cement_run()).unwrap();
    TripService::start(&mut ledger, id, &clock_at(2024, 1, 1)).unwrap();
    TripService::record_expenses(
        &mut ledger,
        id,
        Expenses {
            diesel: 2800.0,
            ..Expenses::default()
        },
        date(2024, 1, 5),
    )
    .unwrap();

    storage.save(&ledger, "sharma").expect("save ledger");
    let loaded = storage.load("sharma").expect("load ledger");

    let trip = loaded.trip(id).expect("trip survives reload");
    assert_eq!(trip.profit, 3700.0);
    assert_eq!(trip.total_expenses, 2800.0);
    assert_eq!(loaded.vehicles.len(), 1);
    assert_eq!(loaded.drivers.len(), 1);
    assert!(ledger_warnings(&loaded).is_empty());
}

#[test]
fn saving_twice_keeps_a_backup_of_the_previous_file() {
    let storage = setup_storage();
    let mut ledger = Ledger::new("Fleet");
    storage.save(&ledger, "fleet").unwrap();

    TripService::create(&mut ledger, cement_run()).unwrap();
    storage.save(&ledger, "fleet").unwrap();

    let backups = storage.list_backups("fleet").expect("list backups");
    assert_eq!(backups.len(), 1);
}

#[test]
fn restore_brings_back_the_snapshot() {
    let storage = setup_storage();
    let mut ledger = Ledger::new("Fleet");
    storage.save(&ledger, "fleet").unwrap();
    storage
        .backup(&ledger, "fleet", Some("before season"))
        .unwrap();

    TripService::create(&mut ledger, cement_run()).unwrap();
    storage.save(&ledger, "fleet").unwrap();

    let backups = storage.list_backups("fleet").unwrap();
    let snapshot_name = backups
        .iter()
        .find(|name| name.contains("before-season"))
        .expect("labelled snapshot present");
    let restored = storage.restore("fleet", snapshot_name).unwrap();
    assert_eq!(restored.trip_count(), 0);
}

#[test]
fn list_ledgers_reports_saved_names() {
    let storage = setup_storage();
    storage.save(&Ledger::new("One"), "Sharma Transport").unwrap();
    storage.save(&Ledger::new("Two"), "side business").unwrap();

    let names = storage.list_ledgers().unwrap();
    assert_eq!(names, vec!["sharma_transport", "side_business"]);
}

#[test]
fn unknown_ledger_load_fails() {
    let storage = setup_storage();
    assert!(storage.load("missing").is_err());
}
