use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use uuid::Uuid;

use flexform_core::classify::{classify_department, classify_sensitivity};
use flexform_core::crypto::{lookup_hash, KeyManager};
use flexform_core::dates;
use flexform_core::models::{FieldValue, SubmissionRecord};
use flexform_core::Error as CoreError;

use crate::column_map::{target_for, CONTACT_FIELD, DATE_FIELDS};
use crate::FlexFormService;

// ---------------------------------------------------------------------------
// The import pipeline: stream legacy spreadsheet rows, map columns, fix
// dates, classify, protect the contact field, hash, tag, upload. Partial
// failure is the default assumption -- upload what you can, report what you
// couldn't. Nothing here rolls back.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Rows per upload batch. Purely a memory/progress knob; batch
    /// boundaries carry no transactional meaning.
    pub batch_size: usize,
    /// Run the full pipeline but skip the store inserts.
    pub dry_run: bool,
    /// Optional pause between batches, matching the pacing the hosted store
    /// was originally fed at.
    pub batch_delay: Option<Duration>,
    pub created_by: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            batch_size: 100,
            dry_run: false,
            batch_delay: None,
            created_by: "import@flexform.local".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub total_records: usize,
    pub processed_records: usize,
    pub encrypted_fields: usize,
    pub warnings: usize,
    pub errors: usize,
}

#[derive(Debug, Clone)]
pub struct ImportProgress {
    pub batch_index: usize,
    pub rows_seen: usize,
    pub rows_processed: usize,
}

/// One mapped row ready for upload, with the counters it contributed.
#[derive(Debug)]
pub struct MappedRow {
    pub record: SubmissionRecord,
    pub warnings: usize,
    pub encrypted: bool,
}

pub struct RowContext<'a> {
    pub batch_id: Uuid,
    pub created_by: &'a str,
    pub keys: &'a KeyManager,
}

/// Runs the per-row pipeline. Returns `Ok(None)` for a fully-empty row,
/// which the importer silently skips.
pub fn map_row(
    targets: &[Option<&'static str>],
    row: &csv::StringRecord,
    line: usize,
    ctx: &RowContext<'_>,
) -> std::result::Result<Option<MappedRow>, CoreError> {
    let mut record = SubmissionRecord::new(ctx.created_by);
    let mut warnings = 0usize;

    // (a) fixed column map; unmapped columns dropped.
    for (index, target) in targets.iter().enumerate() {
        let Some(target) = target else { continue };
        let value = row.get(index).unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        record
            .fields
            .insert(target.to_string(), FieldValue::Text(value.to_string()));
    }

    if record.fields.is_empty() {
        return Ok(None);
    }

    // (b) date normalization: bad dates become null and count a warning.
    for date_field in DATE_FIELDS {
        let raw = match record.fields.get(date_field) {
            Some(FieldValue::Text(raw)) => raw.clone(),
            _ => continue,
        };
        match dates::normalize(&raw) {
            Some(date) => {
                record
                    .fields
                    .insert(date_field.to_string(), FieldValue::Date(date));
            }
            None => {
                record
                    .fields
                    .insert(date_field.to_string(), FieldValue::Null);
                warnings += 1;
            }
        }
    }

    // (c) department from the location string, `general` fallback.
    let location = record
        .fields
        .get("location")
        .and_then(FieldValue::as_str)
        .unwrap_or("");
    record.department = classify_department(location).to_string();

    // (d) contact values that look like email go through the key manager;
    // the plaintext never leaves under an unsuffixed name.
    let mut encrypted = false;
    let contact = record
        .fields
        .get(CONTACT_FIELD)
        .and_then(FieldValue::as_str)
        .map(str::to_string);
    if let Some(contact) = contact {
        if contact.contains('@') {
            let blob = ctx.keys.encrypt(&contact).map_err(|err| CoreError::ImportRow {
                line,
                reason: err.to_string(),
            })?;
            record.fields.remove(CONTACT_FIELD);
            record.fields.insert(
                format!("{CONTACT_FIELD}{}", flexform_core::ENCRYPTED_SUFFIX),
                FieldValue::Text(blob),
            );
            record.fields.insert(
                format!("{CONTACT_FIELD}{}", flexform_core::HASH_SUFFIX),
                FieldValue::Text(lookup_hash(&contact)),
            );
            encrypted = true;
        }
    }

    // (e) sensitivity scan over the serialized record.
    let serialized = serde_json::to_string(&record.fields).unwrap_or_default();
    record.security_classification = classify_sensitivity(&serialized).to_string();

    // (f) integrity hash over the key-sorted field set.
    record.seal();

    // (g) batch tag and a single-entry audit trail.
    record.import_batch = Some(ctx.batch_id);
    record.push_audit("imported", ctx.created_by);

    Ok(Some(MappedRow {
        record,
        warnings,
        encrypted,
    }))
}

impl FlexFormService {
    /// Imports a legacy CSV export. Each run re-reads from the start and
    /// gets a fresh batch id; a failed row or a failed insert bumps the
    /// error counter and the run keeps going.
    pub async fn import_csv(
        &self,
        path: &Path,
        options: &ImportOptions,
        mut on_progress: impl FnMut(&ImportProgress),
    ) -> Result<ImportSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;

        let targets: Vec<Option<&'static str>> = reader
            .headers()
            .context("Input file has no header row")?
            .iter()
            .map(target_for)
            .collect();

        let batch_id = Uuid::new_v4();
        let ctx = RowContext {
            batch_id,
            created_by: &options.created_by,
            keys: &self.keys,
        };

        let mut summary = ImportSummary::default();
        let mut batch: Vec<SubmissionRecord> = Vec::with_capacity(options.batch_size);
        let mut batch_index = 0usize;

        for (index, row) in reader.records().enumerate() {
            // Header occupies line 1.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    tracing::warn!(line, %err, "Skipping unreadable row");
                    summary.total_records += 1;
                    summary.errors += 1;
                    continue;
                }
            };

            summary.total_records += 1;
            match map_row(&targets, &row, line, &ctx) {
                Ok(Some(mapped)) => {
                    summary.warnings += mapped.warnings;
                    if mapped.encrypted {
                        summary.encrypted_fields += 1;
                    }
                    batch.push(mapped.record);
                }
                Ok(None) => {
                    // Fully-empty row: not data, not an error.
                    summary.total_records -= 1;
                }
                Err(err) => {
                    tracing::warn!(line, %err, "Row rejected");
                    summary.errors += 1;
                }
            }

            if batch.len() >= options.batch_size {
                batch_index += 1;
                self.flush_batch(&mut batch, options, &mut summary).await;
                on_progress(&ImportProgress {
                    batch_index,
                    rows_seen: summary.total_records,
                    rows_processed: summary.processed_records,
                });
                if let Some(delay) = options.batch_delay {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        if !batch.is_empty() {
            batch_index += 1;
            self.flush_batch(&mut batch, options, &mut summary).await;
            on_progress(&ImportProgress {
                batch_index,
                rows_seen: summary.total_records,
                rows_processed: summary.processed_records,
            });
        }

        Ok(summary)
    }

    /// Uploads one batch row by row. A failed insert counts an error and
    /// moves on; earlier batches stay committed no matter what happens here.
    async fn flush_batch(
        &self,
        batch: &mut Vec<SubmissionRecord>,
        options: &ImportOptions,
        summary: &mut ImportSummary,
    ) {
        for record in batch.drain(..) {
            if options.dry_run {
                summary.processed_records += 1;
                continue;
            }
            match self.store.insert(&record).await {
                Ok(_) => summary.processed_records += 1,
                Err(err) => {
                    tracing::warn!(%err, "Insert failed; continuing with next record");
                    summary.errors += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with_keys(keys: &KeyManager) -> RowContext<'_> {
        RowContext {
            batch_id: Uuid::new_v4(),
            created_by: "import@flexform.local",
            keys,
        }
    }

    fn record_from(headers: &[&str], cells: &[&str], keys: &KeyManager) -> Option<MappedRow> {
        let targets: Vec<Option<&'static str>> = headers.iter().map(|h| target_for(h)).collect();
        let row = csv::StringRecord::from(cells.to_vec());
        map_row(&targets, &row, 2, &ctx_with_keys(keys)).unwrap()
    }

    #[test]
    fn contact_with_at_sign_is_encrypted_and_hashed() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "Contact / Organizer"],
            &["Spill", "ops@example.com"],
            &keys,
        )
        .unwrap();

        assert!(mapped.encrypted);
        let fields = &mapped.record.fields;
        assert!(!fields.contains_key("contact_organizer"));
        assert!(fields.contains_key("contact_organizer_encrypted"));
        assert_eq!(
            fields.get("contact_organizer_hash"),
            Some(&FieldValue::Text(lookup_hash("ops@example.com")))
        );

        // The blob must decrypt back to the original under the same keys.
        let blob = fields["contact_organizer_encrypted"].as_str().unwrap();
        assert_eq!(keys.decrypt(blob).unwrap(), "ops@example.com");
    }

    #[test]
    fn non_email_contact_stays_plaintext() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "Contact / Organizer"],
            &["Spill", "front desk ext. 4411"],
            &keys,
        )
        .unwrap();

        assert!(!mapped.encrypted);
        assert!(mapped.record.fields.contains_key("contact_organizer"));
    }

    #[test]
    fn bad_dates_become_null_with_a_warning() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "When did the event occur?"],
            &["Leak", "not-a-date"],
            &keys,
        )
        .unwrap();

        assert_eq!(mapped.warnings, 1);
        assert_eq!(mapped.record.fields["event_date"], FieldValue::Null);
    }

    #[test]
    fn departments_classify_from_location() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "Where (building/room #/lab)?"],
            &["Spill", "NYA Building 4"],
            &keys,
        )
        .unwrap();
        assert_eq!(mapped.record.department, "NYA");

        let fallback = record_from(
            &["Short Description", "Where (building/room #/lab)?"],
            &["Spill", "Annex"],
            &keys,
        )
        .unwrap();
        assert_eq!(fallback.record.department, "general");
    }

    #[test]
    fn rows_are_sealed_and_tagged() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(&["Short Description"], &["Spill"], &keys).unwrap();

        assert!(mapped.record.data_hash.is_some());
        assert!(mapped.record.import_batch.is_some());
        assert_eq!(mapped.record.audit_log.len(), 1);
        assert_eq!(mapped.record.audit_log[0].action, "imported");
    }

    #[test]
    fn fully_empty_rows_are_skipped() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "Contact / Organizer"],
            &["", "  "],
            &keys,
        );
        assert!(mapped.is_none());
    }

    #[test]
    fn unmapped_columns_are_dropped() {
        let keys = KeyManager::from_passphrase("test");
        let mapped = record_from(
            &["Short Description", "Scratch Notes"],
            &["Spill", "ignore me"],
            &keys,
        )
        .unwrap();
        assert!(!mapped
            .record
            .fields
            .keys()
            .any(|key| key.contains("scratch")));
        assert_eq!(mapped.record.fields.len(), 1);
    }
}
