use crate::model::{EntityTypeId, ForeignKeyId, TableName};
use std::fmt;
use thiserror::Error as ThisError;


///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct an error carrying one shared-table detail.
    ///
    /// `TableNotShared` is API misuse; every other variant is a model or data
    /// defect and classifies as an invariant violation.
    pub(crate) fn shared_table(origin: ErrorOrigin, err: SharedTableError) -> Self {
        let class = match err {
            SharedTableError::TableNotShared { .. } => ErrorClass::Unsupported,
            _ => ErrorClass::InvariantViolation,
        };

        Self {
            class,
            origin,
            message: err.to_string(),
            detail: Some(ErrorDetail::SharedTable(err)),
        }
    }

    /// Construct a model-origin invariant violation for an internal lookup miss.
    pub(crate) fn model_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Model,
            message.into(),
        )
    }

    /// Structured shared-table detail, if this error carries one.
    #[must_use]
    pub const fn shared_table_error(&self) -> Option<&SharedTableError> {
        match &self.detail {
            Some(ErrorDetail::SharedTable(err)) => Some(err),
            _ => None,
        }
    }

    /// Structured model-construction detail, if this error carries one.
    #[must_use]
    pub const fn model_error(&self) -> Option<&ModelError> {
        match &self.detail {
            Some(ErrorDetail::Model(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_multiple_dependents(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::SharedTable(
                SharedTableError::MultipleDependents { .. }
            ))
        )
    }

    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::SharedTable(
                SharedTableError::CyclicPrincipalChain { .. }
                    | SharedTableError::CyclicDependentChain { .. }
            ))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ModelError> for InternalError {
    fn from(err: ModelError) -> Self {
        Self {
            class: ErrorClass::InvariantViolation,
            origin: ErrorOrigin::Model,
            message: err.to_string(),
            detail: Some(ErrorDetail::Model(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    SharedTable(SharedTableError),
    #[error("{0}")]
    Model(ModelError),
}

///
/// SharedTableError
///
/// Row-resolution failures. Each one reflects a model or change-set defect
/// for a single shared row and aborts the surrounding persistence operation.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SharedTableError {
    #[error(
        "multiple dependents for shared row: table={table} principal={entity_type} foreign_key={foreign_key} count={count}"
    )]
    MultipleDependents {
        table: TableName,
        entity_type: String,
        foreign_key: String,
        count: usize,
    },

    #[error("cyclic principal chain in shared table {table} at entity type {entity_type}")]
    CyclicPrincipalChain { table: TableName, entity_type: String },

    #[error("cyclic dependent chain in shared table {table} at entity type {entity_type}")]
    CyclicDependentChain { table: TableName, entity_type: String },

    #[error("shared row chain in table {table} exceeds max depth {max_depth}")]
    ChainTooDeep { table: TableName, max_depth: usize },

    #[error("table {table} is not shared")]
    TableNotShared { table: TableName },
}

///
/// ModelError
///
/// Model construction failures (builder or configuration).
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("{kind} name is empty")]
    EmptyName { kind: &'static str },

    #[error("duplicate entity type '{name}'")]
    DuplicateEntityType { name: String },

    #[error("unknown entity type '{name}'")]
    UnknownEntityType { name: String },

    #[error("unknown entity type id {id}")]
    UnknownEntityTypeId { id: EntityTypeId },

    #[error("unknown foreign key id {id}")]
    UnknownForeignKeyId { id: ForeignKeyId },

    #[error("duplicate foreign key '{name}'")]
    DuplicateForeignKey { name: String },

    #[error("duplicate table {table}")]
    DuplicateTable { table: TableName },

    #[error("entity type '{name}' is mapped to both {first} and {second}")]
    EntityTypeMappedTwice {
        name: String,
        first: TableName,
        second: TableName,
    },

    #[error("entity type '{name}' is part of a base type cycle")]
    BaseTypeCycle { name: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Model,
    Resolve,
    Enumerate,
    Cache,
    Registry,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Model => "model",
            Self::Resolve => "resolve",
            Self::Enumerate => "enumerate",
            Self::Cache => "cache",
            Self::Registry => "registry",
        };
        write!(f, "{label}")
    }
}
