// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::StoreError;
use roster_domain::DomainError;

/// The entity a validation or lookup error is attached to.
///
/// Validation failures are reported against the offending sub-entity
/// so the caller can re-render the right part of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorEntity {
    /// A person record.
    Person,
    /// A group record.
    Group,
    /// A role record.
    Role,
    /// An invoice record.
    Invoice,
    /// An invoice list record.
    InvoiceList,
}

impl ErrorEntity {
    /// Converts this entity tag to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Group => "group",
            Self::Role => "role",
            Self::Invoice => "invoice",
            Self::InvoiceList => "invoice_list",
        }
    }
}

impl std::fmt::Display for ErrorEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the engine layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated; the error is attached to the
    /// offending entity. Recoverable: the caller re-renders input.
    Validation {
        /// The entity the error belongs to.
        entity: ErrorEntity,
        /// The underlying domain error.
        error: DomainError,
    },
    /// A lower-level invariant blocked a deletion. The operation
    /// aborts for this entity only.
    DestroyVetoed {
        /// Human-readable reason for the veto.
        reason: String,
    },
    /// A referenced entity does not exist.
    NotFound {
        /// The entity that was looked up.
        entity: ErrorEntity,
        /// The id that was not found.
        id: i64,
    },
    /// The storage layer failed.
    Store(StoreError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { entity, error } => {
                write!(f, "Validation failed on {entity}: {error}")
            }
            Self::DestroyVetoed { reason } => {
                write!(f, "Destroy vetoed: {reason}")
            }
            Self::NotFound { entity, id } => {
                write!(f, "{entity} {id} not found")
            }
            Self::Store(err) => write!(f, "Storage failure: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Vetoed { reason } => Self::DestroyVetoed { reason },
            other => Self::Store(other),
        }
    }
}
