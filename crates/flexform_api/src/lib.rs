pub mod handlers;
pub mod routes;

use flexform_store::SubmissionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SubmissionStore,
}
