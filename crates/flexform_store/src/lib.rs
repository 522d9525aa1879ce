pub mod client;
pub mod error;
pub mod filter;
pub mod local;

pub use client::SubmissionStore;
pub use error::{Result, StoreError};
pub use filter::Filter;
pub use local::{DraftStore, KeyValueStore, MemoryStore, TemplateStore};
