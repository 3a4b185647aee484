// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage seams between the engines and the persistence adapter.
//!
//! The engines never touch Diesel; they talk to these traits. The
//! `roster-persistence` crate provides the SQLite implementation, and
//! the engine tests use in-memory fakes.

use crate::error::ErrorEntity;
use roster_domain::{
    AddRequest, Group, Invoice, InvoiceList, Person, Role, RoleKind, Subscription,
};
use time::Date;

/// Errors reported by a storage implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced entity does not exist.
    NotFound {
        /// The entity that was looked up.
        entity: ErrorEntity,
        /// The id that was not found.
        id: i64,
    },
    /// The entity failed storage-level validation and was not saved.
    Validation {
        /// The entity that failed.
        entity: ErrorEntity,
        /// Human-readable description.
        message: String,
    },
    /// A lower-level invariant vetoed a deletion.
    Vetoed {
        /// Human-readable reason.
        reason: String,
    },
    /// The storage backend failed.
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Validation { entity, message } => {
                write!(f, "Validation failed on {entity}: {message}")
            }
            Self::Vetoed { reason } => write!(f, "Deletion vetoed: {reason}"),
            Self::Backend(msg) => write!(f, "Backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage operations the role transition engine depends on.
pub trait RoleStore {
    /// Looks up a person by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such person exists.
    fn find_person(&mut self, person_id: i64) -> Result<Person, StoreError>;

    /// Looks up a group by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such group exists.
    fn find_group(&mut self, group_id: i64) -> Result<Group, StoreError>;

    /// Looks up a role by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such role exists.
    fn find_role(&mut self, role_id: i64) -> Result<Role, StoreError>;

    /// Returns a person's active roles.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn active_roles_of_person(&mut self, person_id: i64) -> Result<Vec<Role>, StoreError>;

    /// Inserts a new role and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or validation rejects the
    /// role.
    fn insert_role(&mut self, role: &Role) -> Result<i64, StoreError>;

    /// Updates an existing role in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the role does not exist or the update fails.
    fn update_role(&mut self, role: &Role) -> Result<(), StoreError>;

    /// Terminates a role: sets its end date and marks it `Terminated`,
    /// keeping the row.
    ///
    /// # Errors
    ///
    /// Returns an error if the role does not exist or the update fails.
    fn terminate_role(&mut self, role_id: i64, end_on: Date) -> Result<(), StoreError>;

    /// Hard-deletes a role, leaving no trace.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Vetoed` if a lower-level invariant blocks
    /// the deletion.
    fn delete_role(&mut self, role_id: i64) -> Result<(), StoreError>;

    /// Updates a person's primary group pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the person does not exist or the update
    /// fails.
    fn set_primary_group(
        &mut self,
        person_id: i64,
        group_id: Option<i64>,
    ) -> Result<(), StoreError>;

    /// Finds a pending add request for (person, body group), if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn find_add_request(
        &mut self,
        person_id: i64,
        body_group_id: i64,
    ) -> Result<Option<AddRequest>, StoreError>;

    /// Inserts a new add request and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert_add_request(&mut self, request: &AddRequest) -> Result<i64, StoreError>;
}

/// Storage operations the invoice batch generator depends on.
pub trait InvoiceStore {
    /// Persists an invoice together with its items in one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice cannot be saved; the batch
    /// records the failure and continues with the next recipient.
    fn save_invoice(&mut self, invoice: &Invoice) -> Result<i64, StoreError>;

    /// Persists an invoice list with its aggregate counters, inserting
    /// or updating as needed, and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be saved.
    fn save_invoice_list(&mut self, list: &InvoiceList) -> Result<i64, StoreError>;

    /// Returns the enclosing layer of a group.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the group or its layer does
    /// not exist.
    fn layer_of_group(&mut self, group_id: i64) -> Result<Group, StoreError>;

    /// Counts people holding an active role of the given kind within a
    /// layer's subtree on the given day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_active_roles(
        &mut self,
        layer_group_id: i64,
        kind: RoleKind,
        day: Date,
    ) -> Result<i64, StoreError>;
}

/// Recipient resolution collaborator.
pub trait RecipientSource {
    /// Returns the subscriptions attached to a mailing list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn subscriptions_of(
        &mut self,
        mailing_list_id: i64,
    ) -> Result<Vec<Subscription>, StoreError>;

    /// Returns the ids of people holding one of the given role kinds
    /// within a group's subtree on the given day.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn people_with_role_kinds(
        &mut self,
        group_id: i64,
        kinds: &[RoleKind],
        day: Date,
    ) -> Result<Vec<i64>, StoreError>;

    /// Returns the ids of people holding any current role in a group.
    ///
    /// The underlying role-to-person relation is not distinct; the
    /// engine deduplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn people_of_group(&mut self, group_id: i64, day: Date) -> Result<Vec<i64>, StoreError>;
}

/// Deferred-work submission interface.
///
/// Implementations guarantee at-least-once eventual execution of the
/// submitted payload; the consumer runs the identical batch procedure.
pub trait JobQueue {
    /// Enqueues a serialized batch-create payload and returns the job
    /// id.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be enqueued.
    fn enqueue(&mut self, kind: &str, payload_json: &str) -> Result<i64, StoreError>;
}
