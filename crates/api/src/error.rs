// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! These are distinct from domain/core errors and represent the API
//! contract. Engine errors translate into this taxonomy with the
//! offending entity and field preserved, so a caller can re-render the
//! right part of its input.

use thiserror::Error;

use roster::{CoreError, StoreError};
use roster_domain::DomainError;
use roster_persistence::PersistenceError;

/// API-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// A validation rule rejected the request.
    #[error("Validation failed on {entity}.{field}: {message}")]
    ValidationFailed {
        /// The entity the error is attached to.
        entity: String,
        /// The offending input field.
        field: String,
        /// A human-readable description.
        message: String,
    },

    /// A lower-level invariant blocked a deletion.
    #[error("Destroy vetoed: {reason}")]
    DestroyVetoed {
        /// The reason the deletion was blocked.
        reason: String,
    },

    /// The actor may not perform this action.
    #[error("Access denied: {action}")]
    AccessDenied {
        /// The action that was attempted.
        action: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The type of entity.
        entity: String,
        /// The id that was looked up.
        id: i64,
    },

    /// The storage layer failed.
    #[error("Storage failure: {message}")]
    StorageFailed {
        /// A description of the failure.
        message: String,
    },
}

/// Names the input field a domain error is attached to.
const fn field_of(error: &DomainError) -> &'static str {
    match error {
        DomainError::InvalidGroupKind(_)
        | DomainError::InvalidRoleKind(_)
        | DomainError::MissingRoleKind
        | DomainError::RoleKindNotAllowed { .. } => "kind",
        DomainError::InvalidRoleStatus(_) => "status",
        DomainError::InvalidPaymentState(_) => "state",
        DomainError::InvalidDateOrder { .. } => "end_on",
        DomainError::InvalidName(_) => "name",
        DomainError::UnknownFeeSchedule(_) => "fixed_fee",
        DomainError::InvalidRecipientId(_) => "recipient_ids",
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { entity, error } => Self::ValidationFailed {
                entity: entity.to_string(),
                field: field_of(&error).to_string(),
                message: error.to_string(),
            },
            CoreError::DestroyVetoed { reason } => Self::DestroyVetoed { reason },
            CoreError::NotFound { entity, id } => Self::NotFound {
                entity: entity.to_string(),
                id,
            },
            CoreError::Store(store_err) => match store_err {
                StoreError::NotFound { entity, id } => Self::NotFound {
                    entity: entity.to_string(),
                    id,
                },
                StoreError::Vetoed { reason } => Self::DestroyVetoed { reason },
                other => Self::StorageFailed {
                    message: other.to_string(),
                },
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::StorageFailed {
            message: err.to_string(),
        }
    }
}
