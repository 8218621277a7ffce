//! Error types and result types for fake store construction and typed access.
//!
//! The CRUD operations themselves never fail: absence is reported as `None`,
//! an empty vector or `false`. Errors only come from loading fixtures and from
//! converting entities to and from typed records. Use [`FakeStoreResult<T>`]
//! as the return type for those fallible paths.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur while building or reading a fake store.
#[derive(Error, Debug)]
pub enum FakeStoreError {
    /// Serialization/deserialization error when converting between formats (BSON, JSON, typed records).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The baseline dataset or schema fixture does not have the expected shape.
    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
    /// A value could not be represented as an entity (e.g. a record that does not serialize to a document).
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
}

/// A specialized `Result` type for fallible fake store operations.
pub type FakeStoreResult<T> = Result<T, FakeStoreError>;

impl From<BsonError> for FakeStoreError {
    fn from(err: BsonError) -> Self {
        FakeStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for FakeStoreError {
    fn from(err: SerdeJsonError) -> Self {
        FakeStoreError::Serialization(err.to_string())
    }
}
