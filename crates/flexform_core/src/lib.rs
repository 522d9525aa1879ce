pub mod classify;
pub mod crypto;
pub mod dates;
pub mod error;
pub mod form;
pub mod models;

pub use error::{Error, FieldViolation, Result};

/// Suffixes that mark a field as holding protected material rather than a
/// plain value. No code path may write a contact-like value under a name
/// lacking one of these.
pub const ENCRYPTED_SUFFIX: &str = "_encrypted";
pub const HASH_SUFFIX: &str = "_hash";

/// Whether a column name is safe to show in dashboards and exports.
pub fn is_exportable_column(name: &str) -> bool {
    !name.contains("encrypted") && !name.contains("hash") && name != "audit_log"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_columns_are_not_exportable() {
        assert!(!is_exportable_column("contact_organizer_encrypted"));
        assert!(!is_exportable_column("contact_organizer_hash"));
        assert!(!is_exportable_column("data_hash"));
        assert!(!is_exportable_column("audit_log"));
    }

    #[test]
    fn ordinary_columns_are_exportable() {
        assert!(is_exportable_column("short_description"));
        assert!(is_exportable_column("department"));
        assert!(is_exportable_column("created_at"));
    }
}
