use roster_ingest::ingestion::csv::{
    decode_csv_bytes, decode_csv_from_path, decode_csv_from_reader,
};
use roster_ingest::types::CellValue;

#[test]
fn decode_csv_from_path_names_sheet_after_file() {
    let sheet = decode_csv_from_path("tests/fixtures/clients.csv").unwrap();
    assert_eq!(sheet.name, "clients.csv");
    assert_eq!(sheet.rows.len(), 4);
    assert_eq!(sheet.rows[0].get("ClientID"), Some(&CellValue::Text("C1".to_string())));
    assert_eq!(
        sheet.rows[1].get("AttributesJSON"),
        Some(&CellValue::Text(r#"{"region":"EU"}"#.to_string()))
    );
}

#[test]
fn decode_csv_keeps_cells_as_text() {
    let sheet = decode_csv_bytes("workers.csv", b"WorkerID,MaxLoadPerPhase\nW1,2\n").unwrap();
    assert_eq!(sheet.rows[0].get("MaxLoadPerPhase"), Some(&CellValue::Text("2".to_string())));
}

#[test]
fn decode_csv_omits_blank_cells_and_blank_rows() {
    let input = "a,b,c\n1,,3\n,,\n4,5,6\n";
    let sheet = decode_csv_bytes("x.csv", input.as_bytes()).unwrap();
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].len(), 2);
    assert!(sheet.rows[0].get("b").is_none());
    assert_eq!(sheet.rows[1].get("b"), Some(&CellValue::Text("5".to_string())));
}

#[test]
fn decode_csv_ignores_columns_without_header() {
    let input = "a,,c\n1,2,3\n";
    let sheet = decode_csv_bytes("x.csv", input.as_bytes()).unwrap();
    let headers: Vec<&str> = sheet.rows[0].iter().map(|(h, _)| h).collect();
    assert_eq!(headers, vec!["a", "c"]);
}

#[test]
fn decode_csv_tolerates_ragged_rows() {
    let input = "a,b,c\n1\n4,5,6,7\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());
    let sheet = decode_csv_from_reader(&mut rdr, "x.csv").unwrap();
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0].len(), 1);
    assert_eq!(sheet.rows[1].len(), 3);
}

#[test]
fn empty_csv_is_an_empty_sheet() {
    let sheet = decode_csv_bytes("tasks.csv", b"").unwrap();
    assert!(sheet.rows.is_empty());

    let header_only = decode_csv_bytes("tasks.csv", b"TaskID,TaskName\n").unwrap();
    assert!(header_only.rows.is_empty());
}

#[test]
fn decode_csv_from_missing_path_is_an_error() {
    let err = decode_csv_from_path("tests/fixtures/does_not_exist.csv").unwrap_err();
    assert!(err.to_string().contains("csv error"));
}

#[test]
fn decode_csv_keeps_first_of_repeated_headers() {
    let input = "ClientID,ClientName,ClientID\nC1,Acme,C9\n";
    let sheet = decode_csv_bytes("clients.csv", input.as_bytes()).unwrap();
    let row = &sheet.rows[0];
    assert_eq!(row.get("ClientID"), Some(&CellValue::Text("C1".to_string())));
    assert_eq!(row.get("ClientID_1"), Some(&CellValue::Text("C9".to_string())));
    let headers: Vec<&str> = row.iter().map(|(h, _)| h).collect();
    assert_eq!(headers, vec!["ClientID", "ClientName", "ClientID_1"]);
}
