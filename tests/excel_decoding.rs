#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use roster_ingest::ingestion::IngestionOptions;
use roster_ingest::ingestion::excel::{decode_workbook_bytes, decode_workbook_from_path};
use roster_ingest::store::IngestionStore;
use roster_ingest::types::{CellValue, EntityKind};
use rust_xlsxwriter::{Workbook, Worksheet};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("roster-ingest-{name}-{nanos}.xlsx"))
}

const CLIENT_HEADERS: [&str; 6] = [
    "ClientID",
    "ClientName",
    "PriorityLevel",
    "RequestedTaskIDs",
    "GroupTag",
    "AttributesJSON",
];

const WORKER_HEADERS: [&str; 7] = [
    "WorkerID",
    "WorkerName",
    "Skills",
    "AvailableSlots",
    "MaxLoadPerPhase",
    "WorkerGroup",
    "QualificationLevel",
];

fn write_headers(ws: &mut Worksheet, headers: &[&str]) {
    for (col, h) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *h).unwrap();
    }
}

fn add_clients_sheet(wb: &mut Workbook, name: &str, priority: f64, attributes: &str) {
    let ws = wb.add_worksheet();
    ws.set_name(name).unwrap();
    write_headers(ws, &CLIENT_HEADERS);
    ws.write_string(1, 0, "C1").unwrap();
    ws.write_string(1, 1, "Acme").unwrap();
    ws.write_number(1, 2, priority).unwrap();
    ws.write_string(1, 3, "T1;T2").unwrap();
    ws.write_string(1, 4, "VIP").unwrap();
    ws.write_string(1, 5, attributes).unwrap();
}

fn add_workers_sheet(wb: &mut Workbook) {
    let ws = wb.add_worksheet();
    ws.set_name("Workers").unwrap();
    write_headers(ws, &WORKER_HEADERS);
    ws.write_string(1, 0, "W1").unwrap();
    ws.write_string(1, 1, "Ann").unwrap();
    ws.write_string(1, 2, "rust,sql").unwrap();
    ws.write_string(1, 3, "[1,2]").unwrap();
    ws.write_number(1, 4, 2).unwrap();
    ws.write_string(1, 5, "GroupA").unwrap();
    ws.write_string(1, 6, "4").unwrap();
}

fn save(wb: &mut Workbook, name: &str) -> PathBuf {
    let path = tmp_file(name);
    wb.save(&path).unwrap();
    path
}

#[test]
fn decode_workbook_keeps_sheet_order_and_cell_types() {
    let mut wb = Workbook::new();
    add_clients_sheet(&mut wb, "Clients", 3.0, "{}");
    add_workers_sheet(&mut wb);
    let path = save(&mut wb, "decode");

    let sheets = decode_workbook_from_path(&path).unwrap();
    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].name, "Clients");
    assert_eq!(sheets[1].name, "Workers");
    assert_eq!(sheets[0].rows.len(), 1);
    assert_eq!(sheets[0].rows[0].get("PriorityLevel"), Some(&CellValue::Number(3.0)));
    assert_eq!(
        sheets[1].rows[0].get("QualificationLevel"),
        Some(&CellValue::Text("4".to_string()))
    );

    let _ = std::fs::remove_file(&path);
}

#[test]
fn decode_workbook_bytes_matches_path_decoding() {
    let mut wb = Workbook::new();
    add_workers_sheet(&mut wb);
    let buf = wb.save_to_buffer().unwrap();

    let sheets = decode_workbook_bytes(&buf).unwrap();
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].rows[0].get("MaxLoadPerPhase"), Some(&CellValue::Number(2.0)));
}

#[test]
fn repeated_workbook_header_keeps_first_column() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Workers").unwrap();
    write_headers(ws, &["WorkerID", "WorkerID"]);
    ws.write_string(1, 0, "W1").unwrap();
    ws.write_string(1, 1, "W2").unwrap();
    let buf = wb.save_to_buffer().unwrap();

    let sheets = decode_workbook_bytes(&buf).unwrap();
    let row = &sheets[0].rows[0];
    assert_eq!(row.get("WorkerID"), Some(&CellValue::Text("W1".to_string())));
    assert_eq!(row.get("WorkerID_1"), Some(&CellValue::Text("W2".to_string())));
}

#[test]
fn empty_sheet_yields_no_rows() {
    let mut wb = Workbook::new();
    wb.add_worksheet().set_name("Tasks").unwrap();
    let buf = wb.save_to_buffer().unwrap();

    let sheets = decode_workbook_bytes(&buf).unwrap();
    assert_eq!(sheets.len(), 1);
    assert!(sheets[0].rows.is_empty());
}

#[test]
fn workbook_client_row_is_ingested() {
    let mut wb = Workbook::new();
    add_clients_sheet(&mut wb, "Clients", 3.0, "{}");
    let buf = wb.save_to_buffer().unwrap();

    let mut store = IngestionStore::new();
    store
        .ingest_bytes("upload.xlsx", &buf, &IngestionOptions::default())
        .unwrap();

    let records = store.records(EntityKind::Client);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].as_client().unwrap().priority_level, 3.0);
    assert!(store.last_pass_errors().is_empty());
}

#[test]
fn workbook_range_and_json_violations_are_indexed() {
    let mut wb = Workbook::new();
    add_clients_sheet(&mut wb, "Clients", 9.0, "not-json");
    let buf = wb.save_to_buffer().unwrap();

    let mut store = IngestionStore::new();
    store
        .ingest_bytes("upload.xlsx", &buf, &IngestionOptions::default())
        .unwrap();

    assert!(store.records(EntityKind::Client).is_empty());
    let msg = &store.last_pass_errors()[&0];
    assert!(msg.contains("must be between 1 and 5"));
    assert!(msg.contains("must be valid JSON"));
}

#[test]
fn two_sheet_workbook_last_sheet_sets_last_pass_errors() {
    let mut wb = Workbook::new();
    add_clients_sheet(&mut wb, "Clients", 9.0, "{}");
    add_workers_sheet(&mut wb);
    let path = save(&mut wb, "two-sheets");

    let mut store = IngestionStore::new();
    let report = store.ingest_path(&path, &IngestionOptions::default()).unwrap();

    assert_eq!(report.validated.len(), 2);
    assert!(store.last_pass_errors().is_empty());
    assert_eq!(store.records(EntityKind::Worker).len(), 1);
    assert_eq!(store.errors(EntityKind::Client).unwrap().len(), 1);

    let _ = std::fs::remove_file(&path);
}
