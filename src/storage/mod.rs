//! SQLite storage layer for memestore.
//!
//! Provides:
//! - Schema initialization and connection pragmas
//! - The closed table set and structured row conditions
//! - Upsert batch preparation
//! - The [`Store`] facade used by the CLI

pub mod batch;
pub mod cell;
pub mod condition;
pub mod error;
pub mod schema;
pub mod store;
pub mod table;

pub use cell::{Cell, TableData};
pub use condition::{CompareOp, Condition, ConditionError};
pub use error::{ErrorKind, StoreError};
pub use store::Store;
pub use table::Table;
