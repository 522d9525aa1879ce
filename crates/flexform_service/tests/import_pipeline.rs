use std::io::Write;

use flexform_core::crypto::KeyManager;
use flexform_service::import::ImportOptions;
use flexform_service::FlexFormService;
use flexform_store::SubmissionStore;

const SAMPLE_CSV: &str = "\
ID,Short Description,Contact / Organizer,Where (building/room #/lab)?,When did the event occur?
1,Spill in hallway,ops@example.com,NYA Building 4,01OCT25
2,Coolant leak,jane@example.com,Annex,not-a-date
3,Routine check,,Central Laboratory,02OCT25
";

fn dry_service() -> FlexFormService {
    // The store is never contacted during a dry run; any address will do.
    let store = SubmissionStore::new("http://localhost:1", "test-key", "form_submissions")
        .expect("store client");
    FlexFormService::new(store, KeyManager::from_passphrase("test passphrase"))
}

#[tokio::test]
async fn dry_run_reports_counts_without_uploading() {
    let mut file = tempfile::NamedTempFile::new().expect("temp csv");
    file.write_all(SAMPLE_CSV.as_bytes()).expect("write csv");

    let service = dry_service();
    let options = ImportOptions {
        dry_run: true,
        batch_size: 2,
        ..ImportOptions::default()
    };

    let mut batches_seen = 0usize;
    let summary = service
        .import_csv(file.path(), &options, |_| batches_seen += 1)
        .await
        .expect("import runs");

    // 3 rows, one bad date, one missing contact: everything imports,
    // nothing errors, exactly one warning for the date.
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.processed_records, 3);
    assert_eq!(summary.errors, 0);
    assert!(summary.warnings >= 1);
    // Two contacts contained an '@'; the empty one set nothing.
    assert_eq!(summary.encrypted_fields, 2);
    // Batch size 2 over 3 rows: two progress callbacks.
    assert_eq!(batches_seen, 2);
}

#[test]
fn mapped_records_match_the_sheet() {
    use flexform_core::models::FieldValue;
    use flexform_service::column_map::target_for;
    use flexform_service::import::{map_row, RowContext};

    let keys = KeyManager::from_passphrase("test passphrase");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(SAMPLE_CSV.as_bytes());
    let targets: Vec<Option<&'static str>> =
        reader.headers().unwrap().iter().map(target_for).collect();
    let ctx = RowContext {
        batch_id: uuid::Uuid::new_v4(),
        created_by: "import@flexform.local",
        keys: &keys,
    };

    let records: Vec<_> = reader
        .records()
        .enumerate()
        .filter_map(|(index, row)| map_row(&targets, &row.unwrap(), index + 2, &ctx).unwrap())
        .map(|mapped| mapped.record)
        .collect();

    assert_eq!(records.len(), 3);
    // Row 2 carried the unparseable date.
    assert_eq!(records[1].fields["event_date"], FieldValue::Null);
    // Row 3 had no contact, so nothing was encrypted for it.
    assert!(!records[2]
        .fields
        .contains_key("contact_organizer_encrypted"));
    assert!(records[0]
        .fields
        .contains_key("contact_organizer_encrypted"));
    // Departments follow the location classifier.
    assert_eq!(records[0].department, "NYA");
    assert_eq!(records[1].department, "general");
    assert_eq!(records[2].department, "LAB");
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let service = dry_service();
    let options = ImportOptions {
        dry_run: true,
        ..ImportOptions::default()
    };
    let result = service
        .import_csv(std::path::Path::new("./no-such-file.csv"), &options, |_| {})
        .await;
    assert!(result.is_err());
}
