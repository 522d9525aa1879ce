/// Ordered keyword -> department pairs. First case-insensitive substring
/// match wins; rows whose location matches nothing land in `general`.
/// The order matters: more specific site names come before generic ones.
const DEPARTMENT_KEYWORDS: [(&str, &str); 9] = [
    ("nya", "NYA"),
    ("headquarters", "HQ"),
    ("hq", "HQ"),
    ("laboratory", "LAB"),
    ("lab", "LAB"),
    ("warehouse", "LOGISTICS"),
    ("dock", "LOGISTICS"),
    ("field", "FIELD"),
    ("remote", "FIELD"),
];

pub const DEFAULT_DEPARTMENT: &str = "general";

/// Sensitivity labels attached to a record for display/compliance only.
pub const CLASSIFICATION_CONFIDENTIAL: &str = "confidential";
pub const CLASSIFICATION_INTERNAL: &str = "internal";

/// Maps a free-text location string to its coarse access-partition label.
pub fn classify_department(location: &str) -> &'static str {
    let lowered = location.to_lowercase();
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, department)| *department)
        .unwrap_or(DEFAULT_DEPARTMENT)
}

/// Keyword scan over a serialized record. `confidential`/`sensitive`
/// anywhere promotes the record; PII markers (an `@` or the word "email")
/// classify as internal, which is also the default -- the legacy portal
/// never distinguished the two and dashboards depend on that, so the
/// redundancy stays.
pub fn classify_sensitivity(serialized: &str) -> &'static str {
    let lowered = serialized.to_lowercase();
    if lowered.contains("confidential") || lowered.contains("sensitive") {
        return CLASSIFICATION_CONFIDENTIAL;
    }
    if lowered.contains('@') || lowered.contains("email") {
        return CLASSIFICATION_INTERNAL;
    }
    CLASSIFICATION_INTERNAL
}
