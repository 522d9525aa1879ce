pub mod field;
pub mod record;
pub mod schema;

pub use field::{FieldDescriptor, FieldType, FieldValue};
pub use record::{AuditEntry, SubmissionRecord};
pub use schema::FormSchema;
