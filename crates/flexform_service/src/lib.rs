pub mod column_map;
pub mod export;
pub mod import;

use flexform_core::crypto::KeyManager;
use flexform_store::SubmissionStore;

/// Orchestration layer: owns the store client and the key manager, and runs
/// the import and export flows the CLI and the API surface drive.
pub struct FlexFormService {
    pub store: SubmissionStore,
    pub keys: KeyManager,
}

impl FlexFormService {
    pub fn new(store: SubmissionStore, keys: KeyManager) -> Self {
        Self { store, keys }
    }
}
