//! Record store collaborator.
//!
//! Jobs, workstations, and configuration live in an external tabular
//! store. This module defines the interface the crate consumes, the
//! boundary parsing that turns raw records into domain types, and an
//! in-memory implementation.
//!
//! The store is assumed at-least-eventually consistent. Reads happen
//! before an estimate is computed and writes after; nothing in the
//! computation touches the store.

pub mod fields;
mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::{Direction, Fields, Query, Record, Sort};

use crate::error::StoreError;

/// A tabular record store.
pub trait RecordStore {
    /// Reads every record of a collection, sorted as the query asks.
    fn select_records(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    /// Writes the named fields of one record. Other fields are untouched.
    fn update_record(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn select_records(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        (**self).select_records(collection, query)
    }

    fn update_record(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        (**self).update_record(collection, id, fields)
    }
}
