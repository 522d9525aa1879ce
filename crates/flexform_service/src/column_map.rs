// ---------------------------------------------------------------------------
// Legacy spreadsheet header -> target field name. Columns absent from this
// table are dropped on import; the sheet carries plenty of scratch columns
// nobody asked to keep.
// ---------------------------------------------------------------------------

pub const LEGACY_COLUMN_MAP: [(&str, &str); 9] = [
    ("ID", "legacy_id"),
    ("Short Description", "short_description"),
    ("Contact / Organizer", "contact_organizer"),
    ("Where (building/room #/lab)?", "location"),
    ("When did the event occur?", "event_date"),
    ("When was the event detected?", "detected_date"),
    ("Expected Results", "expected_results"),
    ("Based on process conf., Gemba 100% effective", "process_confidence"),
    ("Outcome of Gemba", "gemba_outcome"),
];

/// Target field names that normalize through the date pipeline.
pub const DATE_FIELDS: [&str; 2] = ["event_date", "detected_date"];

/// The field routed through the key manager when it looks like an email.
pub const CONTACT_FIELD: &str = "contact_organizer";

pub fn target_for(header: &str) -> Option<&'static str> {
    LEGACY_COLUMN_MAP
        .iter()
        .find(|(legacy, _)| *legacy == header.trim())
        .map(|(_, target)| *target)
}
