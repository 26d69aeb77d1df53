// Copyright (c) 2024 Botho Foundation
//
//! Ledger Integration Tests
//!
//! Drives the contract end to end against an LMDB-backed store:
//! - Seeding and point queries
//! - Tolerance decisions against the stored predecessor
//! - Range scans in key order
//! - Persistence across reopen
//! - The CLI command layer on a throwaway config

use std::fs;

use tempfile::TempDir;

use sensor_ledger::{
    commands,
    config::{ledger_db_path_from_config, Config},
    report::FaultReport,
    Contract, LedgerEntry, LedgerStore, LmdbStore, Response, SensorRecord,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn open_contract(dir: &TempDir) -> Contract<LmdbStore> {
    let store = LmdbStore::open(dir.path()).expect("Failed to open ledger");
    Contract::new(store)
}

fn seeded_contract(dir: &TempDir) -> Contract<LmdbStore> {
    let contract = open_contract(dir);
    assert!(contract.invoke("initLedger", &[]).is_ok());
    contract
}

fn record_at(contract: &Contract<LmdbStore>, key: &str) -> SensorRecord {
    let response = contract.invoke("queryTemp", &args(&[key]));
    serde_json::from_slice(response.payload().expect("query failed")).expect("not a record")
}

// ============================================================================
// Contract over LMDB
// ============================================================================

#[test]
fn test_seed_writes_placeholder() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    let response = contract.invoke("queryTemp", &args(&["TEMP0"]));
    assert_eq!(
        response.payload().unwrap(),
        br#"{"temp":"0","peer0":"none","peer1":"none","peer2":"none","resp":"none"}"#
    );
}

#[test]
fn test_first_reading_is_accepted_without_comparison() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    let response = contract.invoke("createTemp", &args(&["TEMP1", "0.5", "accept", "accept"]));
    assert_eq!(response, Response::empty());

    let record = record_at(&contract, "TEMP1");
    assert_eq!(record.temperature, "0.5");
    assert_eq!(record.local_decision, "accept");
    assert_eq!(record.outcome, "successful");
}

#[test]
fn test_tolerance_against_stored_predecessor() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    contract.invoke("createTemp", &args(&["TEMP1", "20.0", "accept", "accept"]));

    // Exactly at the tolerance boundary
    contract.invoke("createTemp", &args(&["TEMP2", "21.1", "accept", "accept"]));
    let record = record_at(&contract, "TEMP2");
    assert_eq!(record.local_decision, "accept");
    assert_eq!(record.outcome, "successful");

    // Just past it, compared to TEMP2 rather than TEMP1
    contract.invoke("createTemp", &args(&["TEMP3", "22.3", "reject", "accept"]));
    let record = record_at(&contract, "TEMP3");
    assert_eq!(record.local_decision, "reject");
    assert_eq!(record.outcome, "unsuccessful-peer2");

    // Peers disagree with an accepted reading
    contract.invoke("createTemp", &args(&["TEMP4", "22.0", "reject", "reject"]));
    let record = record_at(&contract, "TEMP4");
    assert_eq!(record.local_decision, "accept");
    assert_eq!(record.outcome, "unsuccessful-peer0");
}

#[test]
fn test_missing_predecessor_leaves_ledger_unchanged() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    let response = contract.invoke("createTemp", &args(&["TEMP7", "20.0", "accept", "accept"]));
    assert!(!response.is_ok());
    assert_eq!(contract.invoke("queryTemp", &args(&["TEMP7"])), Response::empty());
    assert_eq!(contract.store().len().unwrap(), 1);
}

#[test]
fn test_query_missing_key_returns_empty_payload() {
    let dir = TempDir::new().unwrap();
    let contract = open_contract(&dir);

    let response = contract.invoke("queryTemp", &args(&["TEMP5"]));
    assert_eq!(response, Response::empty());
}

#[test]
fn test_query_empty_key_returns_empty_payload() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    let response = contract.invoke("queryTemp", &args(&[""]));
    assert_eq!(response, Response::empty());
    assert_eq!(contract.query_record("").unwrap(), None);
}

#[test]
fn test_query_all_in_key_order() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    contract.invoke("createTemp", &args(&["TEMP1", "0.5", "accept", "accept"]));

    let response = contract.invoke("queryAllTemps", &args(&[""]));
    let entries: Vec<LedgerEntry> = serde_json::from_slice(response.payload().unwrap()).unwrap();
    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["TEMP0", "TEMP1"]);
    assert_eq!(entries[1].record.temperature, "0.5");
}

#[test]
fn test_query_all_is_lexicographic() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    for (n, temperature) in (1..=12).zip(["20.0"; 12]) {
        let key = format!("TEMP{n}");
        let response = contract.invoke("createTemp", &args(&[&key, temperature, "accept", "accept"]));
        assert!(response.is_ok(), "{key}: {response:?}");
    }

    let keys: Vec<String> = contract
        .query_all()
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    assert_eq!(keys[..5], ["TEMP0", "TEMP1", "TEMP10", "TEMP11", "TEMP12"]);
    assert_eq!(keys.len(), 13);
}

#[test]
fn test_ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let contract = seeded_contract(&dir);
        contract.invoke("createTemp", &args(&["TEMP1", "18.5", "accept", "reject"]));
    }

    let contract = open_contract(&dir);
    let record = record_at(&contract, "TEMP1");
    assert_eq!(record.outcome, "unsuccessful-peer2");
    assert_eq!(contract.query_all().unwrap().len(), 2);
}

// ============================================================================
// Command layer
// ============================================================================

#[test]
fn test_commands_on_fresh_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("node").join("config.toml");

    commands::init::run(&config_path, false).unwrap();
    assert!(Config::exists(&config_path));
    assert!(ledger_db_path_from_config(&config_path).join("ledger.mdb").exists());

    // A second init would overwrite the seed
    assert!(commands::init::run(&config_path, false).is_err());
    commands::init::run(&config_path, true).unwrap();

    commands::create::run(&config_path, "1", "20.0", "accept", "accept").unwrap();
    commands::create::run(&config_path, "2", "30.0", "accept", "accept").unwrap();
    commands::invoke::run(&config_path, "queryTemp", &args(&["TEMP2"])).unwrap();
    assert!(commands::invoke::run(&config_path, "burnTemp", &[]).is_err());
    commands::query::run(&config_path, "2").unwrap();
    commands::query::run_all(&config_path).unwrap();
    commands::status::run(&config_path).unwrap();

    let report_path = dir.path().join("results").join("faults.txt");
    commands::report::run(&config_path, Some(&report_path)).unwrap();
    assert_eq!(
        fs::read_to_string(&report_path).unwrap(),
        "Found 1 faults out of 2 records"
    );
}

#[test]
fn test_commands_require_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");

    let err = commands::status::run(&config_path).unwrap_err();
    assert!(err.to_string().contains("sensor-ledger init"));
}

#[test]
fn test_status_reports_unreadable_seed() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    commands::init::run(&config_path, false).unwrap();

    {
        let store = LmdbStore::open(&ledger_db_path_from_config(&config_path)).unwrap();
        store.put("TEMP0", b"not a record").unwrap();
    }

    let err = commands::status::run(&config_path).unwrap_err();
    assert!(err.to_string().contains("seed record"), "{err:#}");
}

#[test]
fn test_report_over_stored_entries() {
    let dir = TempDir::new().unwrap();
    let contract = seeded_contract(&dir);

    contract.invoke("createTemp", &args(&["TEMP1", "20.0", "accept", "accept"]));
    contract.invoke("createTemp", &args(&["TEMP2", "20.5", "reject", "accept"]));
    contract.invoke("createTemp", &args(&["TEMP3", "25.0", "reject", "reject"]));

    let entries = contract.query_all().unwrap();
    let report = FaultReport::from_entries(&entries, "TEMP0");
    assert_eq!(report.records, 3);
    assert_eq!(report.faults, 1);
    assert_eq!(report.peer1, 1);
}
