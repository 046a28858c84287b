mod audit;
mod config;
mod error;
mod http;
mod item;
mod pdf;
mod persist;
mod schema;
mod store;

pub use audit::{AuditEntry, AuditLog};
pub use config::Config;
pub use error::StoreError;
pub use http::{router, serve, AppState};
pub use item::{Collection, Item};
pub use pdf::fixed_document;
pub use persist::{JsonDocument, StorageError};
pub use schema::{validate, FieldKind, ValidationError};
pub use store::{Filter, RecordStore};
